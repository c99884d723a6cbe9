//! Danger classification around the agent.
//!
//! Two sources feed the threat picture: environmental hazards known to
//! the belief map, and the cells enemies could strike next tick. Every
//! threatened cell carries a severity so the scorer can trade a warning
//! cell for escaping a critical one.

use std::collections::BTreeMap;

use arena_core::{ActorId, Coordinate};

use crate::belief::BeliefMap;
use crate::error::ConfigError;

/// How urgently a cell should be avoided.
///
/// Ordering matters: `Critical > Warning`, so a map upsert that keeps the
/// maximum never downgrades a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Critical,
}

/// The set of threatened cells for one tick, with self-relative flags.
///
/// The flags reflect environmental hazards only: an adjacent enemy makes
/// cells dangerous to step on but does not force the agent into flight,
/// or it could never close in to attack.
#[derive(Clone, Debug, Default)]
pub struct ThreatSet {
    cells: BTreeMap<Coordinate, Severity>,
    /// A critical hazard cell lies within the critical radius of the agent.
    pub critical_near_self: bool,
    /// Any hazard-threatened cell lies within the warning radius of the agent.
    pub warning_near_self: bool,
}

impl ThreatSet {
    pub fn severity_at(&self, cell: Coordinate) -> Option<Severity> {
        self.cells.get(&cell).copied()
    }

    pub fn is_calm(&self) -> bool {
        !self.critical_near_self && !self.warning_near_self
    }

    pub fn cells(&self) -> &BTreeMap<Coordinate, Severity> {
        &self.cells
    }

    /// Manhattan distance from `cell` to the nearest threatened cell.
    pub fn distance_to_nearest(&self, cell: Coordinate) -> Option<u32> {
        self.cells
            .keys()
            .map(|threat| threat.manhattan_distance(cell))
            .min()
    }

    fn upsert(&mut self, cell: Coordinate, severity: Severity) {
        self.cells
            .entry(cell)
            .and_modify(|existing| *existing = (*existing).max(severity))
            .or_insert(severity);
    }
}

/// Builds the per-tick threat picture from the belief map.
#[derive(Clone, Copy, Debug)]
pub struct ThreatModel {
    radius_critical: u32,
    radius_warning: u32,
}

impl ThreatModel {
    pub fn new(radius_critical: u32, radius_warning: u32) -> Result<Self, ConfigError> {
        if radius_critical == 0 || radius_warning == 0 {
            return Err(ConfigError::ZeroRadius {
                critical: radius_critical,
                warning: radius_warning,
            });
        }
        if radius_critical > radius_warning {
            return Err(ConfigError::InvertedRadii {
                critical: radius_critical,
                warning: radius_warning,
            });
        }
        Ok(Self {
            radius_critical,
            radius_warning,
        })
    }

    /// Classifies every cell threatened this tick.
    ///
    /// Hazard cells and their axis neighbors are critical; the remaining
    /// cells inside the warning radius of a hazard get a warning. Enemy
    /// danger zones (the eight surrounding cells plus two cells along the
    /// enemy's facing) are critical regardless of distance.
    pub fn assess(&self, map: &BeliefMap, self_position: Coordinate, self_id: ActorId) -> ThreatSet {
        let mut threats = ThreatSet::default();
        let bounds = map.bounds();

        for &hazard in map.hazard_cells() {
            threats.upsert(hazard, Severity::Critical);
            for neighbor in map.neighbors4(hazard) {
                threats.upsert(neighbor, Severity::Critical);
            }
            // Warning halo out to the warning radius.
            let r = self.radius_warning as i32;
            for dx in -r..=r {
                for dy in -r..=r {
                    let cell = hazard + Coordinate::new(dx, dy);
                    if bounds.contains(cell)
                        && hazard.manhattan_distance(cell) <= self.radius_warning
                    {
                        threats.upsert(cell, Severity::Warning);
                    }
                }
            }

            // Flight is triggered by hazards alone, and the radii measure
            // the agent's distance to the hazard cell itself, not to its
            // halo.
            let distance = self_position.manhattan_distance(hazard);
            if distance <= self.radius_critical {
                threats.critical_near_self = true;
            }
            if distance <= self.radius_warning {
                threats.warning_near_self = true;
            }
        }

        for (&id, tracked) in map.actors() {
            if id == self_id {
                continue;
            }
            threats.upsert(tracked.position, Severity::Critical);
            for cell in tracked.position.ring8() {
                if bounds.contains(cell) {
                    threats.upsert(cell, Severity::Critical);
                }
            }
            let mut lunge = tracked.position;
            for _ in 0..2 {
                lunge = tracked.facing.step_from(lunge);
                if bounds.contains(lunge) {
                    threats.upsert(lunge, Severity::Critical);
                }
            }
        }

        threats
    }
}
