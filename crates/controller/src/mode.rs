//! Tick-to-tick behavioral mode with hysteresis.

use strum::Display;

/// High-level posture driving goal selection for the tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionMode {
    #[default]
    Exploring,
    Collecting,
    FleeingHazard,
    Engaging,
    HoldingPosition,
}

/// Tick facts the transition function consumes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModeInputs {
    /// A critical threat lies within the critical radius.
    pub critical_hazard: bool,
    /// Any threat lies within the warning radius.
    pub warning_hazard: bool,
    /// A worthwhile pickup is in scan range.
    pub valuable_pickup: bool,
    /// Combat evaluation produced a favorable target.
    pub favorable_target: bool,
    /// The agent is standing on the objective cell.
    pub objective_held: bool,
}

/// Mode state machine.
///
/// Flight preempts everything and is sticky: leaving `FleeingHazard`
/// requires a run of fully calm ticks, so one hazard-free observation
/// does not bounce the agent straight back toward the danger.
#[derive(Clone, Copy, Debug)]
pub struct ModeMachine {
    mode: DecisionMode,
    calm_ticks_needed: u32,
    calm_streak: u32,
}

impl ModeMachine {
    pub fn new(calm_ticks_needed: u32) -> Self {
        Self {
            mode: DecisionMode::Exploring,
            calm_ticks_needed,
            calm_streak: 0,
        }
    }

    pub fn mode(&self) -> DecisionMode {
        self.mode
    }

    /// Advances the machine by one tick and returns the mode to act in.
    pub fn transition(&mut self, inputs: ModeInputs) -> DecisionMode {
        let previous = self.mode;

        if inputs.critical_hazard {
            self.calm_streak = 0;
            self.mode = DecisionMode::FleeingHazard;
            if previous != self.mode {
                tracing::debug!(%previous, "critical threat, fleeing");
            }
            return self.mode;
        }

        if self.mode == DecisionMode::FleeingHazard {
            if inputs.warning_hazard {
                self.calm_streak = 0;
                return self.mode;
            }
            self.calm_streak += 1;
            if self.calm_streak < self.calm_ticks_needed {
                return self.mode;
            }
            // Calm long enough; fall through to normal selection.
            self.calm_streak = 0;
        }

        self.mode = if inputs.favorable_target {
            DecisionMode::Engaging
        } else if inputs.valuable_pickup {
            DecisionMode::Collecting
        } else if inputs.objective_held {
            DecisionMode::HoldingPosition
        } else {
            DecisionMode::Exploring
        };

        if previous != self.mode {
            tracing::debug!(%previous, current = %self.mode, "mode change");
        }
        self.mode
    }
}
