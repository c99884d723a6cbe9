//! Incrementally maintained knowledge of the arena.
//!
//! The belief map is the controller's memory: static terrain seeded once
//! per match, plus everything observed since — hazards, loot, last-known
//! enemy positions — with a staleness counter per cell. It is exclusively
//! owned by one controller instance and rebuilt from scratch each match.

use std::collections::{BTreeMap, BTreeSet};

use arrayvec::ArrayVec;

use arena_core::{
    ActorId, ArenaBounds, BoundsError, Coordinate, Facing, HazardSet, ItemKind,
    ObservationWindow, StaticArenaLayout, TerrainKind, WeaponClass,
};

/// Terrain as the controller believes it to be.
///
/// `Unknown` is a first-class state, not a sentinel: never-observed cells
/// carry it explicitly and the pathfinder refuses them unless configured
/// otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerrainBelief {
    Unknown,
    Known(TerrainKind),
}

impl TerrainBelief {
    /// Whether the cell is believed steppable. Unknown terrain is not.
    pub fn is_passable(self) -> bool {
        matches!(self, TerrainBelief::Known(kind) if kind.is_passable())
    }

    pub fn kind(self) -> Option<TerrainKind> {
        match self {
            TerrainBelief::Unknown => None,
            TerrainBelief::Known(kind) => Some(kind),
        }
    }
}

/// Everything the controller believes about one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileKnowledge {
    pub terrain: TerrainBelief,
    pub hazards: HazardSet,
    pub occupant: Option<ActorId>,
    pub loot: Option<ItemKind>,
    /// Ticks since the cell was last directly observed.
    pub staleness: u32,
}

impl TileKnowledge {
    /// Staleness of a cell that has never been in any observation window.
    pub const NEVER_SEEN: u32 = u32::MAX;

    const UNKNOWN: Self = Self {
        terrain: TerrainBelief::Unknown,
        hazards: HazardSet::empty(),
        occupant: None,
        loot: None,
        staleness: Self::NEVER_SEEN,
    };

    pub fn ever_observed(&self) -> bool {
        self.staleness != Self::NEVER_SEEN
    }
}

/// Last-known state of a tracked actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackedActor {
    pub position: Coordinate,
    pub facing: Facing,
    pub weapon: WeaponClass,
    pub health: u32,
    /// Belief-map tick at which the actor was last directly observed.
    pub last_seen: u64,
}

/// Per-match arena knowledge with derived lookup indices.
#[derive(Clone, Debug)]
pub struct BeliefMap {
    bounds: ArenaBounds,
    tiles: Vec<TileKnowledge>,
    tick: u64,
    staleness_ceiling: u32,
    occupant_ttl: u64,

    // Derived indices, kept consistent with `tiles` by `update`.
    hazard_cells: BTreeSet<Coordinate>,
    loot_cells: BTreeSet<Coordinate>,
    actors: BTreeMap<ActorId, TrackedActor>,
    shrine: Option<Coordinate>,
}

impl BeliefMap {
    /// An empty belief: all terrain unknown, nothing tracked.
    pub fn new(bounds: ArenaBounds, staleness_ceiling: u32, occupant_ttl: u64) -> Self {
        Self {
            bounds,
            tiles: vec![TileKnowledge::UNKNOWN; bounds.cell_count()],
            tick: 0,
            staleness_ceiling,
            occupant_ttl,
            hazard_cells: BTreeSet::new(),
            loot_cells: BTreeSet::new(),
            actors: BTreeMap::new(),
            shrine: None,
        }
    }

    /// Seeds terrain (and initial ground items) from the static layout.
    ///
    /// Hazards and occupants start empty; staleness stays infinite because
    /// no cell has been directly observed yet.
    pub fn seed(layout: &StaticArenaLayout, staleness_ceiling: u32, occupant_ttl: u64) -> Self {
        let mut map = Self::new(layout.bounds, staleness_ceiling, occupant_ttl);
        for (coordinate, kind) in &layout.terrain {
            let Some(index) = map.bounds.index(*coordinate) else {
                continue;
            };
            map.tiles[index].terrain = TerrainBelief::Known(*kind);
            if *kind == TerrainKind::Shrine {
                map.shrine = Some(*coordinate);
            }
        }
        for (coordinate, item) in &layout.initial_items {
            if let Some(index) = map.bounds.index(*coordinate) {
                map.tiles[index].loot = Some(*item);
                map.loot_cells.insert(*coordinate);
            }
        }
        map
    }

    pub fn bounds(&self) -> ArenaBounds {
        self.bounds
    }

    /// Belief-map time: number of `update` calls since match start.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Tile knowledge for an in-bounds coordinate.
    pub fn get(&self, coordinate: Coordinate) -> Result<&TileKnowledge, BoundsError> {
        self.bounds
            .index(coordinate)
            .map(|index| &self.tiles[index])
            .ok_or(BoundsError {
                coordinate,
                bounds: self.bounds,
            })
    }

    fn tile_mut(&mut self, coordinate: Coordinate) -> Option<&mut TileKnowledge> {
        self.bounds
            .index(coordinate)
            .map(|index| &mut self.tiles[index])
    }

    /// The four axis-adjacent cells, filtered to arena bounds.
    pub fn neighbors4(&self, coordinate: Coordinate) -> ArrayVec<Coordinate, 4> {
        Facing::ALL
            .into_iter()
            .map(|facing| facing.step_from(coordinate))
            .filter(|cell| self.bounds.contains(*cell))
            .collect()
    }

    /// Whether a cell can be stepped onto per current belief.
    pub fn is_steppable(&self, coordinate: Coordinate, allow_unknown: bool) -> bool {
        match self.get(coordinate) {
            Err(_) => false,
            Ok(tile) => match tile.terrain {
                TerrainBelief::Unknown => allow_unknown,
                TerrainBelief::Known(kind) => kind.is_passable(),
            },
        }
    }

    /// Ingests one observation window.
    ///
    /// Observed cells are overwritten wholesale and their staleness reset
    /// to zero; every other cell ages by one tick (saturating at the
    /// configured ceiling). `self_id` is the observing agent, which is
    /// deliberately not tracked as an occupant of its own cell.
    pub fn update(&mut self, window: &ObservationWindow, self_id: ActorId) {
        self.tick += 1;
        let tick = self.tick;

        // Age every cell first; observed cells are reset below. Cells that
        // were never seen keep their infinite staleness.
        for tile in &mut self.tiles {
            if tile.staleness != TileKnowledge::NEVER_SEEN {
                tile.staleness = tile.staleness.saturating_add(1).min(self.staleness_ceiling);
            }
        }

        for (&coordinate, observation) in &window.tiles {
            let Some(index) = self.bounds.index(coordinate) else {
                tracing::debug!(%coordinate, "ignoring out-of-bounds observation");
                continue;
            };

            // Occupant tracking: move the record before overwriting the tile.
            let seen_occupant = observation.occupant.filter(|actor| actor.id != self_id);
            if let Some(actor) = seen_occupant {
                if let Some(tracked) = self.actors.get(&actor.id) {
                    let old_position = tracked.position;
                    if old_position != coordinate {
                        if let Some(old_tile) = self.tile_mut(old_position) {
                            if old_tile.occupant == Some(actor.id) {
                                old_tile.occupant = None;
                            }
                        }
                    }
                }
                self.actors.insert(
                    actor.id,
                    TrackedActor {
                        position: coordinate,
                        facing: actor.facing,
                        weapon: actor.weapon,
                        health: actor.health,
                        last_seen: tick,
                    },
                );
            }

            let tile = &mut self.tiles[index];
            tile.terrain = TerrainBelief::Known(observation.terrain);
            tile.hazards = observation.hazards;
            tile.loot = observation.loot;
            tile.occupant = seen_occupant.map(|actor| actor.id);
            tile.staleness = 0;

            if observation.hazards.is_empty() {
                self.hazard_cells.remove(&coordinate);
            } else {
                self.hazard_cells.insert(coordinate);
            }
            if observation.loot.is_some() {
                self.loot_cells.insert(coordinate);
            } else {
                self.loot_cells.remove(&coordinate);
            }
            if observation.terrain == TerrainKind::Shrine {
                self.shrine = Some(coordinate);
            }
        }

        self.forget_stale_actors();
    }

    /// Drops actors not re-observed within the TTL and clears the stale
    /// occupant marker left on their last-known cell.
    fn forget_stale_actors(&mut self) {
        let tick = self.tick;
        let ttl = self.occupant_ttl;
        let forgotten: Vec<(ActorId, Coordinate)> = self
            .actors
            .iter()
            .filter(|(_, tracked)| tick.saturating_sub(tracked.last_seen) > ttl)
            .map(|(id, tracked)| (*id, tracked.position))
            .collect();

        for (id, position) in forgotten {
            tracing::debug!(actor = %id, %position, "forgetting actor not seen within ttl");
            self.actors.remove(&id);
            if let Some(tile) = self.tile_mut(position) {
                if tile.occupant == Some(id) {
                    tile.occupant = None;
                }
            }
        }
    }

    // ----------------------------------------------------------------------
    // Derived index accessors
    // ----------------------------------------------------------------------

    pub fn hazard_cells(&self) -> &BTreeSet<Coordinate> {
        &self.hazard_cells
    }

    pub fn loot_cells(&self) -> &BTreeSet<Coordinate> {
        &self.loot_cells
    }

    pub fn actors(&self) -> &BTreeMap<ActorId, TrackedActor> {
        &self.actors
    }

    pub fn shrine(&self) -> Option<Coordinate> {
        self.shrine
    }

    /// Loot item at a cell, if any is believed to be there.
    pub fn loot_at(&self, coordinate: Coordinate) -> Option<ItemKind> {
        self.get(coordinate).ok().and_then(|tile| tile.loot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{ActorObservation, TileObservation};

    fn open_layout(width: u32, height: u32) -> StaticArenaLayout {
        let bounds = ArenaBounds::new(width, height);
        StaticArenaLayout {
            name: "test".to_owned(),
            bounds,
            terrain: bounds.iter().map(|c| (c, TerrainKind::Open)).collect(),
            initial_items: BTreeMap::new(),
        }
    }

    fn seeded(width: u32, height: u32) -> BeliefMap {
        BeliefMap::seed(&open_layout(width, height), 100, 4)
    }

    fn enemy(id: u32) -> ActorObservation {
        ActorObservation {
            id: ActorId(id),
            facing: Facing::North,
            weapon: WeaponClass::Sword,
            health: 10,
        }
    }

    const ME: ActorId = ActorId(0);

    #[test]
    fn get_rejects_out_of_bounds() {
        let map = seeded(4, 4);
        assert!(map.get(Coordinate::new(0, 0)).is_ok());
        let err = map.get(Coordinate::new(4, 0)).unwrap_err();
        assert_eq!(err.coordinate, Coordinate::new(4, 0));
    }

    #[test]
    fn seeded_cells_are_known_but_never_observed() {
        let map = seeded(3, 3);
        let tile = map.get(Coordinate::new(1, 1)).unwrap();
        assert_eq!(tile.terrain, TerrainBelief::Known(TerrainKind::Open));
        assert!(!tile.ever_observed());
        assert_eq!(tile.staleness, TileKnowledge::NEVER_SEEN);
    }

    #[test]
    fn empty_update_is_a_pure_aging_step() {
        let mut map = seeded(3, 3);
        let cell = Coordinate::new(1, 1);
        map.update(
            &ObservationWindow::new(cell)
                .with_tile(cell, TileObservation::terrain(TerrainKind::Open)),
            ME,
        );
        let before = *map.get(cell).unwrap();
        assert_eq!(before.staleness, 0);

        map.update(&ObservationWindow::new(cell), ME);

        let after = map.get(cell).unwrap();
        assert_eq!(after.terrain, before.terrain);
        assert_eq!(after.hazards, before.hazards);
        assert_eq!(after.loot, before.loot);
        assert_eq!(after.staleness, 1);

        // Never-observed cells stay at infinite staleness.
        let unseen = map.get(Coordinate::new(0, 0)).unwrap();
        assert_eq!(unseen.staleness, TileKnowledge::NEVER_SEEN);
    }

    #[test]
    fn staleness_saturates_at_the_ceiling() {
        let mut map = BeliefMap::seed(&open_layout(2, 2), 3, 4);
        let cell = Coordinate::new(0, 0);
        map.update(
            &ObservationWindow::new(cell)
                .with_tile(cell, TileObservation::terrain(TerrainKind::Open)),
            ME,
        );
        for _ in 0..10 {
            map.update(&ObservationWindow::new(cell), ME);
        }
        assert_eq!(map.get(cell).unwrap().staleness, 3);
    }

    #[test]
    fn staleness_is_zero_exactly_for_the_latest_window() {
        let mut map = seeded(3, 3);
        let a = Coordinate::new(0, 0);
        let b = Coordinate::new(2, 2);
        map.update(
            &ObservationWindow::new(a)
                .with_tile(a, TileObservation::terrain(TerrainKind::Open)),
            ME,
        );
        map.update(
            &ObservationWindow::new(b)
                .with_tile(b, TileObservation::terrain(TerrainKind::Open)),
            ME,
        );
        assert_eq!(map.get(b).unwrap().staleness, 0);
        assert_eq!(map.get(a).unwrap().staleness, 1);
    }

    #[test]
    fn occupant_moves_clear_the_previous_cell() {
        let mut map = seeded(5, 5);
        let first = Coordinate::new(1, 1);
        let second = Coordinate::new(2, 1);

        map.update(
            &ObservationWindow::new(Coordinate::new(0, 0)).with_tile(
                first,
                TileObservation::terrain(TerrainKind::Open).with_occupant(enemy(7)),
            ),
            ME,
        );
        assert_eq!(map.get(first).unwrap().occupant, Some(ActorId(7)));

        map.update(
            &ObservationWindow::new(Coordinate::new(0, 0)).with_tile(
                second,
                TileObservation::terrain(TerrainKind::Open).with_occupant(enemy(7)),
            ),
            ME,
        );
        assert_eq!(map.get(first).unwrap().occupant, None);
        assert_eq!(map.get(second).unwrap().occupant, Some(ActorId(7)));
        assert_eq!(map.actors().len(), 1);
        assert_eq!(map.actors()[&ActorId(7)].position, second);
    }

    #[test]
    fn actors_are_forgotten_after_the_ttl() {
        let mut map = seeded(5, 5);
        let cell = Coordinate::new(2, 2);
        map.update(
            &ObservationWindow::new(Coordinate::new(0, 0)).with_tile(
                cell,
                TileObservation::terrain(TerrainKind::Open).with_occupant(enemy(9)),
            ),
            ME,
        );
        assert!(map.actors().contains_key(&ActorId(9)));

        // Threshold is 4 ticks without re-observation; the fifth empty
        // update crosses it.
        for _ in 0..4 {
            map.update(&ObservationWindow::new(Coordinate::new(0, 0)), ME);
            assert!(map.actors().contains_key(&ActorId(9)));
        }
        map.update(&ObservationWindow::new(Coordinate::new(0, 0)), ME);
        assert!(!map.actors().contains_key(&ActorId(9)));
        assert_eq!(map.get(cell).unwrap().occupant, None);
    }

    #[test]
    fn own_actor_is_not_tracked() {
        let mut map = seeded(3, 3);
        let cell = Coordinate::new(1, 1);
        let me = ActorObservation {
            id: ME,
            facing: Facing::East,
            weapon: WeaponClass::Knife,
            health: 8,
        };
        map.update(
            &ObservationWindow::new(cell).with_tile(
                cell,
                TileObservation::terrain(TerrainKind::Open).with_occupant(me),
            ),
            ME,
        );
        assert!(map.actors().is_empty());
        assert_eq!(map.get(cell).unwrap().occupant, None);
    }

    #[test]
    fn hazard_and_loot_indices_follow_observations() {
        let mut map = seeded(3, 3);
        let cell = Coordinate::new(1, 2);
        map.update(
            &ObservationWindow::new(Coordinate::new(0, 0)).with_tile(
                cell,
                TileObservation::terrain(TerrainKind::Open)
                    .with_hazards(HazardSet::MIST)
                    .with_loot(ItemKind::Potion),
            ),
            ME,
        );
        assert!(map.hazard_cells().contains(&cell));
        assert!(map.loot_cells().contains(&cell));

        map.update(
            &ObservationWindow::new(Coordinate::new(0, 0))
                .with_tile(cell, TileObservation::terrain(TerrainKind::Open)),
            ME,
        );
        assert!(!map.hazard_cells().contains(&cell));
        assert!(!map.loot_cells().contains(&cell));
    }

    #[test]
    fn neighbors4_is_clipped_to_bounds() {
        let map = seeded(3, 3);
        assert_eq!(map.neighbors4(Coordinate::new(0, 0)).len(), 2);
        assert_eq!(map.neighbors4(Coordinate::new(1, 1)).len(), 4);
    }

    #[test]
    fn shrine_is_indexed_when_observed() {
        let mut map = seeded(3, 3);
        assert_eq!(map.shrine(), None);
        let cell = Coordinate::new(2, 0);
        map.update(
            &ObservationWindow::new(Coordinate::new(0, 0))
                .with_tile(cell, TileObservation::terrain(TerrainKind::Shrine)),
            ME,
        );
        assert_eq!(map.shrine(), Some(cell));
    }
}
