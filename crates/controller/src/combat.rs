//! Target selection and engagement evaluation.
//!
//! An enemy is worth engaging when the estimated win chance clears the
//! configured threshold. The estimate folds together distance, relative
//! health, and a weapon matchup table; enemies hiding in forest or
//! standing next to advancing mist are never engaged.

use arena_core::{ActorId, Coordinate, Facing, HazardSet, WeaponClass, WeaponGeometry};

use crate::belief::BeliefMap;
use crate::config::ControllerConfig;

/// A favorable engagement produced by [`find_target`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Engagement {
    pub target: ActorId,
    pub position: Coordinate,
    /// Estimated win chance in `[0, 1]`-ish units; already above the
    /// configured threshold.
    pub chance: f64,
}

/// Empirical win chance of `ours` against `theirs`, all else equal.
pub fn matchup_chance(ours: WeaponClass, theirs: WeaponClass) -> f64 {
    use WeaponClass::*;
    match (ours, theirs) {
        (Knife, Bow) => 0.67,
        (Knife, Sword) => 0.1,
        (Knife, Axe) => 0.01,
        (Knife, Knife) => 0.5,
        (Knife, Amulet) => 0.75,
        (Knife, Scroll) => 0.9,

        (Sword, Bow) => 0.8,
        (Sword, Knife) => 0.9,
        (Sword, Sword) => 0.5,
        (Sword, Axe) => 0.33,
        (Sword, Amulet) => 0.95,
        (Sword, Scroll) => 0.99,

        (Axe, Bow) => 0.95,
        (Axe, Knife) => 0.99,
        (Axe, Sword) => 0.67,
        (Axe, Axe) => 0.5,
        (Axe, Amulet) => 0.95,
        (Axe, Scroll) => 0.99,

        (Bow, Bow) => 0.5,
        (Bow, Knife) => 0.33,
        (Bow, Sword) => 0.2,
        (Bow, Axe) => 0.05,
        (Bow, Amulet) => 0.9,
        (Bow, Scroll) => 0.99,

        (Amulet, Bow) => 0.1,
        (Amulet, Knife) => 0.25,
        (Amulet, Sword) => 0.05,
        (Amulet, Axe) => 0.05,
        (Amulet, Amulet) => 0.5,
        (Amulet, Scroll) => 0.99,

        (Scroll, Bow) => 0.01,
        (Scroll, Knife) => 0.1,
        (Scroll, Sword) => 0.01,
        (Scroll, Axe) => 0.01,
        (Scroll, Amulet) => 0.01,
        (Scroll, Scroll) => 0.5,
    }
}

fn concealed_in_forest(map: &BeliefMap, cell: Coordinate) -> bool {
    map.get(cell)
        .ok()
        .and_then(|tile| tile.terrain.kind())
        .is_some_and(|kind| kind.conceals())
}

/// Whether any cell of the 3x3 block around `cell` carries mist.
fn mist_adjacent(map: &BeliefMap, cell: Coordinate) -> bool {
    std::iter::once(cell)
        .chain(cell.ring8())
        .any(|around| {
            map.get(around)
                .is_ok_and(|tile| tile.hazards.contains(HazardSet::MIST))
        })
}

/// Estimated chance of winning a fight against `enemy` from `distance`.
fn evaluate(
    distance: u32,
    our_health: u32,
    enemy_health: u32,
    ours: WeaponClass,
    theirs: WeaponClass,
    config: &ControllerConfig,
) -> f64 {
    let horizon = config.combat_max_distance.max(1);
    let closeness = f64::from(horizon.saturating_sub(distance).saturating_add(1))
        / f64::from(horizon);
    let closeness = closeness.max(0.01);
    let vigor = f64::from(our_health.max(1)) / f64::from(enemy_health.max(1));
    closeness * vigor * matchup_chance(ours, theirs)
}

/// The most favorable tracked enemy, if any clears the engagement bar.
///
/// Enemies beyond the engagement range, concealed in forest, or standing
/// in or next to mist are excluded before evaluation. Among the rest the
/// highest evaluation wins, with actor-id order breaking exact ties.
pub fn find_target(
    map: &BeliefMap,
    self_position: Coordinate,
    self_id: ActorId,
    held: WeaponClass,
    health: u32,
    config: &ControllerConfig,
) -> Option<Engagement> {
    let mut best: Option<Engagement> = None;

    for (&id, tracked) in map.actors() {
        if id == self_id {
            continue;
        }
        let distance = self_position.manhattan_distance(tracked.position);
        if distance > config.engagement_range {
            continue;
        }
        if concealed_in_forest(map, tracked.position) {
            tracing::debug!(actor = %id, "skipping forest-concealed enemy");
            continue;
        }
        if mist_adjacent(map, tracked.position) {
            tracing::debug!(actor = %id, "skipping enemy at the mist front");
            continue;
        }

        let chance = evaluate(distance, health, tracked.health, held, tracked.weapon, config);
        if chance <= config.engage_threshold {
            continue;
        }
        if best.is_none_or(|top| chance > top.chance) {
            best = Some(Engagement {
                target: id,
                position: tracked.position,
                chance,
            });
        }
    }

    if let Some(engagement) = best {
        tracing::debug!(
            target = %engagement.target,
            chance = engagement.chance,
            "favorable engagement found"
        );
    }
    best
}

/// Whether an attack with `held` from `position` facing `facing` reaches
/// `target`.
pub fn can_hit(
    weaponry: &dyn WeaponGeometry,
    held: WeaponClass,
    position: Coordinate,
    facing: Facing,
    map: &BeliefMap,
    target: Coordinate,
) -> bool {
    weaponry
        .threatened_cells(held, position, facing, map.bounds())
        .contains(&target)
}
