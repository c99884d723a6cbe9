//! Per-action utility evaluation.
//!
//! Every legal action for the tick gets a score triple; the best action
//! is the lexicographic minimum. Ties are broken with a seeded draw so
//! that replays of the same match make the same choices.

use arena_core::{compute_seed, Action, ActorId, Coordinate, Facing, PcgRng, RngOracle};

use crate::belief::BeliefMap;
use crate::config::ControllerConfig;
use crate::threat::{Severity, ThreatSet};

/// Everything scoring needs for one tick, borrowed from the pipeline.
pub struct ScoreContext<'a> {
    pub map: &'a BeliefMap,
    pub threats: &'a ThreatSet,
    /// Navigation goal, if the current mode produced one.
    pub goal: Option<Coordinate>,
    pub self_id: ActorId,
    pub position: Coordinate,
    pub facing: Facing,
    pub tick: u64,
    pub config: &'a ControllerConfig,
}

/// Score triple, compared lexicographically; lower is better.
///
/// Danger dominates goal progress, and goal progress dominates novelty,
/// so an agent never trades safety for distance or distance for
/// curiosity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActionScore {
    /// Severity-weighted exposure of the resulting cell.
    pub danger: u32,
    /// Manhattan distance from the resulting position to the goal.
    pub goal_distance: u32,
    /// Recently-seen cells in the resulting forward half-plane; facing
    /// fresh ground scores lower.
    pub staleness_deficit: u32,
}

const CRITICAL_WEIGHT: u32 = 100;
const WARNING_WEIGHT: u32 = 10;

/// Deterministic action selection.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionScorer {
    rng: PcgRng,
}

impl ActionScorer {
    /// Scores one action against the tick context.
    pub fn score(&self, context: &ScoreContext<'_>, action: Action) -> ActionScore {
        let (position, facing) = action.simulate(context.position, context.facing);

        let mut danger = match context.threats.severity_at(position) {
            Some(Severity::Critical) => CRITICAL_WEIGHT,
            Some(Severity::Warning) => WARNING_WEIGHT,
            None => 0,
        };
        if let Some(distance) = context.threats.distance_to_nearest(position) {
            danger += context.config.radius_warning.saturating_sub(distance);
        }

        let goal_distance = context
            .goal
            .map(|goal| position.manhattan_distance(goal))
            .unwrap_or(0);

        ActionScore {
            danger,
            goal_distance,
            staleness_deficit: self.familiarity_ahead(context, position, facing),
        }
    }

    /// Counts cells in the forward half-plane that were seen recently.
    fn familiarity_ahead(
        &self,
        context: &ScoreContext<'_>,
        position: Coordinate,
        facing: Facing,
    ) -> u32 {
        let radius = context.config.novelty_radius as i32;
        let (fx, fy) = facing.delta();
        let mut familiar = 0;
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                // Keep only cells on the facing side of the agent.
                if dx * fx + dy * fy <= 0 {
                    continue;
                }
                let cell = position + Coordinate::new(dx, dy);
                if let Ok(tile) = context.map.get(cell) {
                    if tile.staleness <= context.config.recent_staleness {
                        familiar += 1;
                    }
                }
            }
        }
        familiar
    }

    /// Actions that are legal from the current position.
    ///
    /// Turns are always legal; steps require the destination to be inside
    /// the arena, believed passable, and unoccupied. Attacks and waiting
    /// are handled upstream by the mode logic, not scored here.
    pub fn legal_candidates(&self, context: &ScoreContext<'_>) -> Vec<Action> {
        let mut candidates = vec![Action::TurnLeft, Action::TurnRight];
        for action in Action::STEPS {
            let (position, _) = action.simulate(context.position, context.facing);
            if !context
                .map
                .is_steppable(position, context.config.allow_unknown)
            {
                continue;
            }
            let occupied = context
                .map
                .get(position)
                .is_ok_and(|tile| tile.occupant.is_some());
            if occupied {
                continue;
            }
            candidates.push(action);
        }
        candidates
    }

    /// Picks the best legal action for the tick.
    ///
    /// Among equal-scoring actions the choice is a seeded draw keyed on
    /// the match seed, tick, and deciding actor, so two agents in the
    /// same situation diverge but a replay does not.
    pub fn select(&self, context: &ScoreContext<'_>) -> Action {
        let scored: Vec<(ActionScore, Action)> = self
            .legal_candidates(context)
            .into_iter()
            .map(|action| (self.score(context, action), action))
            .collect();
        let Some(best) = scored.iter().map(|(score, _)| *score).min() else {
            return Action::TurnRight;
        };

        let tied: Vec<Action> = scored
            .into_iter()
            .filter(|(score, _)| *score == best)
            .map(|(_, action)| action)
            .collect();
        if tied.len() == 1 {
            return tied[0];
        }

        let seed = compute_seed(
            context.config.match_seed,
            context.tick,
            context.self_id.0,
            0,
        );
        let choice = tied[self.rng.pick_index(seed, tied.len())];
        tracing::debug!(
            candidates = tied.len(),
            ?choice,
            "tie-break among equal-scoring actions"
        );
        choice
    }
}
