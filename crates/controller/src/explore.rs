//! Sector-based exploration targeting.
//!
//! The arena is carved into 3x3 sectors keyed by their center cell. Each
//! sector remembers when it was last swept; exploration goals are the
//! centers of sectors that have gone longest without a visit, discounted
//! by travel distance. Sectors swallowed by hazards are retired outright.

use std::collections::{BTreeMap, BTreeSet};

use arena_core::{Coordinate, ObservationWindow, StaticArenaLayout};

use crate::config::ControllerConfig;

/// Center of the 3x3 sector containing `cell`.
pub fn sector_center(cell: Coordinate) -> Coordinate {
    Coordinate::new(
        cell.x - cell.x.rem_euclid(3) + 1,
        cell.y - cell.y.rem_euclid(3) + 1,
    )
}

#[derive(Clone, Debug, Default)]
struct SectorData {
    /// Tick of the last completed sweep; 0 means never swept.
    last_explored: u64,
    /// Cells of this sector seen since the last sweep completed.
    seen: BTreeSet<Coordinate>,
}

/// Exploration progress across the arena.
#[derive(Clone, Debug)]
pub struct ExplorationMap {
    sectors: BTreeMap<Coordinate, SectorData>,
}

/// Seeing this many distinct cells of a sector counts as sweeping it.
const SWEEP_THRESHOLD: usize = 3;

impl ExplorationMap {
    /// Builds the sector set from the static layout.
    ///
    /// Sectors with fewer than three passable cells are not worth a
    /// detour and are never targeted.
    pub fn load(layout: &StaticArenaLayout) -> Self {
        let mut passable_per_sector: BTreeMap<Coordinate, usize> = BTreeMap::new();
        for (coordinate, kind) in &layout.terrain {
            if kind.is_passable() {
                *passable_per_sector
                    .entry(sector_center(*coordinate))
                    .or_insert(0) += 1;
            }
        }
        let sectors = passable_per_sector
            .into_iter()
            .filter(|(_, passable)| *passable >= SWEEP_THRESHOLD)
            .map(|(center, _)| (center, SectorData::default()))
            .collect();
        Self { sectors }
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// Folds one observation window into sector progress.
    ///
    /// The sector the agent stands in counts as swept immediately. Any
    /// sector observed under mist is retired: the mist front only ever
    /// advances, so the sector will never be worth visiting again.
    pub fn update(&mut self, window: &ObservationWindow, tick: u64) {
        let mut retired: BTreeSet<Coordinate> = BTreeSet::new();
        for (&coordinate, observation) in &window.tiles {
            let center = sector_center(coordinate);
            if observation.hazards.contains(arena_core::HazardSet::MIST) {
                retired.insert(center);
                continue;
            }
            if let Some(sector) = self.sectors.get_mut(&center) {
                sector.seen.insert(coordinate);
                if sector.seen.len() >= SWEEP_THRESHOLD {
                    sector.last_explored = tick;
                    sector.seen.clear();
                }
            }
        }
        for center in retired {
            if self.sectors.remove(&center).is_some() {
                tracing::debug!(%center, "retiring misted sector");
            }
        }

        let own = sector_center(window.position);
        if let Some(sector) = self.sectors.get_mut(&own) {
            sector.last_explored = tick;
            sector.seen.clear();
        }
    }

    /// Picks the most attractive sector center to explore next.
    ///
    /// Priority grows exponentially with time since the last sweep and
    /// decays with distance. Strict comparison plus ordered iteration
    /// makes the choice deterministic.
    pub fn pick_target(
        &self,
        from: Coordinate,
        tick: u64,
        config: &ControllerConfig,
    ) -> Option<Coordinate> {
        let mut best: Option<(f64, Coordinate)> = None;
        for (&center, sector) in &self.sectors {
            let time_diff = tick
                .saturating_sub(sector.last_explored)
                .min(config.exploration_max_time_diff);
            let distance = from.manhattan_distance(center);
            let priority = config.exploration_time_factor.powi(time_diff as i32)
                * config
                    .exploration_distance_factor
                    .powi((distance / 3).max(1) as i32);
            if best.is_none_or(|(top, _)| priority > top) {
                best = Some((priority, center));
            }
        }
        best.map(|(_, center)| center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{HazardSet, TerrainKind, TileObservation};

    fn open_layout(width: u32, height: u32) -> StaticArenaLayout {
        let text = vec![".".repeat(width as usize); height as usize].join("\n");
        StaticArenaLayout::parse("explore-test", &text).unwrap()
    }

    #[test]
    fn sector_centers_tile_the_plane() {
        assert_eq!(sector_center(Coordinate::new(0, 0)), Coordinate::new(1, 1));
        assert_eq!(sector_center(Coordinate::new(2, 2)), Coordinate::new(1, 1));
        assert_eq!(sector_center(Coordinate::new(3, 0)), Coordinate::new(4, 1));
        assert_eq!(sector_center(Coordinate::new(5, 7)), Coordinate::new(4, 7));
    }

    #[test]
    fn load_skips_mostly_impassable_sectors() {
        // Left 3x3 sector fully open, right sector almost all wall.
        let layout = StaticArenaLayout::parse(
            "split",
            "...##\n...##\n...#.",
        )
        .unwrap();
        let map = ExplorationMap::load(&layout);
        assert_eq!(map.sector_count(), 1);
        assert!(map
            .pick_target(Coordinate::new(0, 0), 1, &ControllerConfig::default_preset())
            .is_some());
    }

    #[test]
    fn unswept_sectors_are_preferred_over_recently_swept_ones() {
        let layout = open_layout(9, 3);
        let mut map = ExplorationMap::load(&layout);
        assert_eq!(map.sector_count(), 3);
        let config = ControllerConfig::default_preset();

        // Stand in the left sector at tick 10; it is now freshly swept.
        map.update(&ObservationWindow::new(Coordinate::new(1, 1)), 10);
        let target = map.pick_target(Coordinate::new(1, 1), 11, &config).unwrap();
        assert_ne!(target, Coordinate::new(1, 1));
    }

    #[test]
    fn nearer_of_equally_stale_sectors_wins() {
        let layout = open_layout(15, 3);
        let map = ExplorationMap::load(&layout);
        let config = ControllerConfig::default_preset();
        // All sectors equally unswept: distance decides, and the agent's
        // own sector (distance 0, clamped to the same bucket as distance
        // 3) ties with the adjacent one; ordered iteration keeps it
        // stable.
        let target = map.pick_target(Coordinate::new(0, 1), 5, &config).unwrap();
        let again = map.pick_target(Coordinate::new(0, 1), 5, &config).unwrap();
        assert_eq!(target, again);
        assert!(target.x <= 4, "picked a far sector over a near one");
    }

    #[test]
    fn seeing_three_cells_sweeps_a_sector() {
        let layout = open_layout(6, 3);
        let mut map = ExplorationMap::load(&layout);
        let config = ControllerConfig::default_preset();

        // Observe three cells of the right sector from the left one.
        let window = ObservationWindow::new(Coordinate::new(1, 1))
            .with_tile(Coordinate::new(3, 0), TileObservation::terrain(TerrainKind::Open))
            .with_tile(Coordinate::new(4, 0), TileObservation::terrain(TerrainKind::Open))
            .with_tile(Coordinate::new(5, 0), TileObservation::terrain(TerrainKind::Open));
        map.update(&window, 7);

        // Both sectors are now freshly swept at tick 7; at tick 8 neither
        // dominates through time, so the pick is just the deterministic
        // nearest.
        let target = map.pick_target(Coordinate::new(1, 1), 8, &config).unwrap();
        assert_eq!(target, Coordinate::new(1, 1));
    }

    #[test]
    fn misted_sectors_are_retired() {
        let layout = open_layout(6, 3);
        let mut map = ExplorationMap::load(&layout);
        assert_eq!(map.sector_count(), 2);

        let window = ObservationWindow::new(Coordinate::new(1, 1)).with_tile(
            Coordinate::new(4, 1),
            TileObservation::terrain(TerrainKind::Open).with_hazards(HazardSet::MIST),
        );
        map.update(&window, 3);
        assert_eq!(map.sector_count(), 1);
        let target = map
            .pick_target(Coordinate::new(1, 1), 50, &ControllerConfig::default_preset())
            .unwrap();
        assert_eq!(target, Coordinate::new(1, 1));
    }
}
