//! Controller tuning: named weights, thresholds, and presets.
//!
//! The original controllers existed as many near-duplicate variants that
//! differed only in hand-tuned constants. This module collapses those
//! variants into one parameterized core: every knob lives here as a named
//! field, and archetypes are expressed as presets over the same struct.

use arena_core::WeaponClass;

use crate::error::ConfigError;

/// All tunable parameters of the decision core.
///
/// Validated once at controller construction; a validated config never
/// produces call-time parameter errors.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControllerConfig {
    /// Base seed for all pseudo-random tie-breaks this match.
    pub match_seed: u64,

    // ------------------------------------------------------------------
    // Belief maintenance
    // ------------------------------------------------------------------
    /// Saturation ceiling for per-cell staleness counters.
    pub staleness_ceiling: u32,
    /// Ticks after which an unobserved actor is dropped from the index.
    pub occupant_ttl: u64,

    // ------------------------------------------------------------------
    // Threat radii (Manhattan)
    // ------------------------------------------------------------------
    pub radius_critical: u32,
    pub radius_warning: u32,
    /// Consecutive calm ticks required to leave the fleeing mode.
    pub calm_ticks: u32,

    // ------------------------------------------------------------------
    // Targeting ranges
    // ------------------------------------------------------------------
    /// Pickups beyond this Manhattan range do not trigger collecting.
    pub scan_radius: u32,
    /// Enemies beyond this Manhattan range are never engaged.
    pub engagement_range: u32,
    /// Minimum evaluated win chance to engage a target.
    pub engage_threshold: f64,
    /// Distance normalization horizon for combat evaluation.
    pub combat_max_distance: u32,

    // ------------------------------------------------------------------
    // Path costs (integer cost units; one step of open ground = base)
    // ------------------------------------------------------------------
    pub base_step_cost: u32,
    pub mist_penalty: u32,
    pub fire_penalty: u32,
    /// Penalty for stepping onto a weapon worse than the held one.
    pub worse_weapon_penalty: u32,
    /// Whether never-observed terrain may be traversed.
    pub allow_unknown: bool,

    // ------------------------------------------------------------------
    // Action scoring
    // ------------------------------------------------------------------
    /// Radius of the forward half-plane sampled for novelty.
    pub novelty_radius: u32,
    /// Cells seen within this many ticks count as already explored.
    pub recent_staleness: u32,

    // ------------------------------------------------------------------
    // Exploration priorities
    // ------------------------------------------------------------------
    pub exploration_time_factor: f64,
    pub exploration_distance_factor: f64,
    pub exploration_max_time_diff: u64,

    // ------------------------------------------------------------------
    // Collection priorities
    // ------------------------------------------------------------------
    pub collection_base_factor: f64,
    pub collection_distance_factor: f64,
    /// Discount applied per enemy at least as close to a pickup as we are.
    pub collection_enemy_factor: f64,
    pub potion_value: f64,
}

impl ControllerConfig {
    /// Balanced preset used when no archetype is requested.
    pub fn default_preset() -> Self {
        Self {
            match_seed: 0,
            staleness_ceiling: 1_000,
            occupant_ttl: 4,
            radius_critical: 2,
            radius_warning: 5,
            calm_ticks: 3,
            scan_radius: 6,
            engagement_range: 6,
            engage_threshold: 0.5,
            combat_max_distance: 50,
            base_step_cost: 10,
            mist_penalty: 100,
            fire_penalty: 500,
            worse_weapon_penalty: 50,
            allow_unknown: false,
            novelty_radius: 3,
            recent_staleness: 10,
            exploration_time_factor: 1.3,
            exploration_distance_factor: 0.5,
            exploration_max_time_diff: 50,
            collection_base_factor: 1_000.0,
            collection_distance_factor: 0.9,
            collection_enemy_factor: 0.33,
            potion_value: 2.0,
        }
    }

    /// Hunts readily: wider engagement range, lower bar to commit.
    pub fn aggressive() -> Self {
        Self {
            engagement_range: 9,
            engage_threshold: 0.35,
            radius_critical: 1,
            radius_warning: 3,
            calm_ticks: 2,
            ..Self::default_preset()
        }
    }

    /// Avoids fights and hazards: engages only from clear advantage.
    pub fn cautious() -> Self {
        Self {
            engagement_range: 4,
            engage_threshold: 0.75,
            radius_critical: 3,
            radius_warning: 7,
            calm_ticks: 5,
            mist_penalty: 200,
            ..Self::default_preset()
        }
    }

    /// Rejects malformed parameter combinations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radius_critical == 0 || self.radius_warning == 0 {
            return Err(ConfigError::ZeroRadius {
                critical: self.radius_critical,
                warning: self.radius_warning,
            });
        }
        if self.radius_critical > self.radius_warning {
            return Err(ConfigError::InvertedRadii {
                critical: self.radius_critical,
                warning: self.radius_warning,
            });
        }
        if self.base_step_cost == 0 {
            return Err(ConfigError::ZeroStepCost);
        }
        if self.calm_ticks == 0 {
            return Err(ConfigError::ZeroCalmTicks);
        }
        for (name, value) in [
            ("exploration_time_factor", self.exploration_time_factor),
            (
                "exploration_distance_factor",
                self.exploration_distance_factor,
            ),
            ("collection_base_factor", self.collection_base_factor),
            (
                "collection_distance_factor",
                self.collection_distance_factor,
            ),
            ("collection_enemy_factor", self.collection_enemy_factor),
            ("potion_value", self.potion_value),
            ("engage_threshold", self.engage_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositiveFactor { name, value });
            }
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::default_preset()
    }
}

/// Relative usefulness of a held or ground weapon.
///
/// Higher is better; amulets and scrolls are treated as downgrades from
/// anything, matching how the original controllers weighted pickups.
pub fn weapon_value(class: WeaponClass) -> f64 {
    match class {
        WeaponClass::Axe => 5.0,
        WeaponClass::Sword => 2.5,
        WeaponClass::Knife => 1.0,
        WeaponClass::Bow => 0.8,
        WeaponClass::Amulet => 0.0,
        WeaponClass::Scroll => 0.0,
    }
}
