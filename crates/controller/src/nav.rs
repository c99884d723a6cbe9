//! Grid routing over the belief map.
//!
//! Uniform-cost search with an optional Manhattan heuristic, over
//! whatever the belief map currently holds. Edge costs come from a
//! caller-supplied function returning `None` for impassable moves, so
//! hazard penalties and item preferences stay out of the search itself.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use arena_core::Coordinate;

use crate::belief::BeliefMap;
use crate::config::{weapon_value, ControllerConfig};
use arena_core::{ItemKind, WeaponClass};

/// Cost of moving onto an adjacent cell, or `None` if the move is illegal.
pub type EdgeCost<'a> = dyn Fn(Coordinate, Coordinate) -> Option<u32> + 'a;

/// Outcome of a routing query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// The cell to step onto next. Equals the start when no progress is
    /// possible or the goal is already reached.
    pub next_step: Coordinate,
    /// Whether the goal itself was reached by the search.
    pub reachable: bool,
    /// Full path from the first step to the destination actually routed
    /// to (the goal, or the closest reachable alternative). Empty when
    /// already at the goal or when nowhere is reachable.
    pub path: Vec<Coordinate>,
}

impl Route {
    fn stay(at: Coordinate, reachable: bool) -> Self {
        Self {
            next_step: at,
            reachable,
            path: Vec::new(),
        }
    }
}

/// Shortest-path search over the belief map.
///
/// `heuristic: true` adds the Manhattan distance to the goal as a
/// priority term. With edge costs of at least one unit per step the
/// heuristic never overestimates, so both modes return minimal-cost
/// paths; the heuristic merely expands fewer cells.
#[derive(Clone, Copy, Debug)]
pub struct PathFinder {
    pub heuristic: bool,
}

impl Default for PathFinder {
    fn default() -> Self {
        Self { heuristic: true }
    }
}

impl PathFinder {
    /// Routes from `from` toward `to`.
    ///
    /// If the goal is unreachable, routes to the reachable cell with the
    /// smallest Manhattan distance to the goal instead and reports
    /// `reachable: false`. Ties between equal-cost frontier entries are
    /// broken by insertion order, which makes the result independent of
    /// hash state or allocation order.
    pub fn route(
        &self,
        map: &BeliefMap,
        from: Coordinate,
        to: Coordinate,
        cost: &EdgeCost<'_>,
    ) -> Route {
        if from == to {
            return Route::stay(to, true);
        }

        let mut dist: BTreeMap<Coordinate, u64> = BTreeMap::new();
        let mut parent: BTreeMap<Coordinate, Coordinate> = BTreeMap::new();
        let mut frontier: BinaryHeap<Reverse<(u64, u64, Coordinate)>> = BinaryHeap::new();
        let mut sequence: u64 = 0;

        dist.insert(from, 0);
        frontier.push(Reverse((self.priority(0, from, to), sequence, from)));

        // Best fallback seen so far: (manhattan-to-goal, cost, cell).
        let mut closest = (from.manhattan_distance(to), 0u64, from);

        while let Some(Reverse((_, _, current))) = frontier.pop() {
            let current_cost = dist[&current];
            if current == to {
                return Route {
                    next_step: first_step(&parent, from, to),
                    reachable: true,
                    path: unwind(&parent, from, to),
                };
            }

            let gap = current.manhattan_distance(to);
            if (gap, current_cost) < (closest.0, closest.1) {
                closest = (gap, current_cost, current);
            }

            for neighbor in map.neighbors4(current) {
                let Some(edge) = cost(current, neighbor) else {
                    continue;
                };
                let candidate = current_cost + u64::from(edge);
                if dist.get(&neighbor).is_none_or(|&known| candidate < known) {
                    dist.insert(neighbor, candidate);
                    parent.insert(neighbor, current);
                    sequence += 1;
                    frontier.push(Reverse((
                        self.priority(candidate, neighbor, to),
                        sequence,
                        neighbor,
                    )));
                }
            }
        }

        // Goal never reached: head for the closest cell we did reach.
        let (_, _, alternative) = closest;
        if alternative == from {
            return Route::stay(from, false);
        }
        Route {
            next_step: first_step(&parent, from, alternative),
            reachable: false,
            path: unwind(&parent, from, alternative),
        }
    }

    fn priority(&self, cost: u64, cell: Coordinate, goal: Coordinate) -> u64 {
        if self.heuristic {
            cost + u64::from(cell.manhattan_distance(goal))
        } else {
            cost
        }
    }
}

fn unwind(parent: &BTreeMap<Coordinate, Coordinate>, from: Coordinate, to: Coordinate) -> Vec<Coordinate> {
    let mut path = vec![to];
    let mut cursor = to;
    while let Some(&previous) = parent.get(&cursor) {
        if previous == from {
            break;
        }
        path.push(previous);
        cursor = previous;
    }
    path.reverse();
    path
}

fn first_step(parent: &BTreeMap<Coordinate, Coordinate>, from: Coordinate, to: Coordinate) -> Coordinate {
    let mut cursor = to;
    while let Some(&previous) = parent.get(&cursor) {
        if previous == from {
            return cursor;
        }
        cursor = previous;
    }
    from
}

/// Standard edge-cost function for agent movement.
///
/// Adjacency and passability gate the move; hazards and inferior ground
/// weapons add penalties on top of the base step cost. A cell holding a
/// potion is discounted to the minimum cost of one unit, which keeps the
/// unit-per-step heuristic admissible.
pub fn travel_cost<'a>(
    map: &'a BeliefMap,
    config: &'a ControllerConfig,
    held: WeaponClass,
) -> impl Fn(Coordinate, Coordinate) -> Option<u32> + 'a {
    move |from: Coordinate, to: Coordinate| {
        if from.manhattan_distance(to) != 1 {
            return None;
        }
        let tile = map.get(to).ok()?;
        match tile.terrain.kind() {
            None if !config.allow_unknown => return None,
            None => {}
            Some(kind) if !kind.is_passable() => return None,
            Some(_) => {}
        }
        if tile.occupant.is_some() {
            return None;
        }

        let mut cost = config.base_step_cost;
        match tile.loot {
            Some(ItemKind::Potion) => cost = 1,
            Some(ItemKind::Weapon(ground)) => {
                if weapon_value(ground) < weapon_value(held) {
                    cost = cost.saturating_add(config.worse_weapon_penalty);
                }
            }
            None => {}
        }
        if tile.hazards.contains(arena_core::HazardSet::MIST) {
            cost = cost.saturating_add(config.mist_penalty);
        }
        if tile.hazards.contains(arena_core::HazardSet::FIRE) {
            cost = cost.saturating_add(config.fire_penalty);
        }
        Some(cost)
    }
}
