//! The per-tick decision pipeline.
//!
//! One controller instance drives one agent through one match at a time.
//! Each tick flows through the same stages: fold the observation into the
//! belief map, classify threats, pick a behavioral mode, derive a
//! navigation goal, and translate the next route step into an action.
//! Any pipeline failure degrades to a scanning turn at the tick boundary,
//! so the engine always receives a legal action.

use arena_core::{
    Action, ActorId, Coordinate, ObservationWindow, StandardWeaponry, StaticArenaLayout,
    WeaponGeometry,
};

use crate::agent::AgentState;
use crate::belief::BeliefMap;
use crate::collect::best_pickup;
use crate::combat::{can_hit, find_target};
use crate::config::ControllerConfig;
use crate::error::{ConfigError, DecisionError};
use crate::explore::ExplorationMap;
use crate::mode::{DecisionMode, ModeInputs, ModeMachine};
use crate::nav::{travel_cost, PathFinder};
use crate::scoring::{ActionScorer, ScoreContext};
use crate::threat::{Severity, ThreatModel};

/// Everything rebuilt at every match reset.
#[derive(Clone, Debug)]
struct MatchState {
    belief: BeliefMap,
    exploration: ExplorationMap,
    agent: AgentState,
    machine: ModeMachine,
}

/// Grid-arena agent controller.
///
/// Generic over the weapon geometry oracle so tests can substitute fixed
/// hit patterns; matches use [`StandardWeaponry`].
pub struct ArenaController<W: WeaponGeometry = StandardWeaponry> {
    config: ControllerConfig,
    weaponry: W,
    scorer: ActionScorer,
    pathfinder: PathFinder,
    threat_model: ThreatModel,
    state: Option<MatchState>,
}

impl ArenaController<StandardWeaponry> {
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        Self::with_weaponry(config, StandardWeaponry)
    }
}

impl<W: WeaponGeometry> ArenaController<W> {
    pub fn with_weaponry(config: ControllerConfig, weaponry: W) -> Result<Self, ConfigError> {
        config.validate()?;
        let threat_model = ThreatModel::new(config.radius_critical, config.radius_warning)?;
        Ok(Self {
            config,
            weaponry,
            scorer: ActionScorer::default(),
            pathfinder: PathFinder::default(),
            threat_model,
            state: None,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Begins a new match on the given arena.
    pub fn on_match_reset(&mut self, layout: &StaticArenaLayout) {
        tracing::info!(arena = %layout.name, "match reset");
        self.state = Some(MatchState {
            belief: BeliefMap::seed(
                layout,
                self.config.staleness_ceiling,
                self.config.occupant_ttl,
            ),
            exploration: ExplorationMap::load(layout),
            agent: AgentState::default(),
            machine: ModeMachine::new(self.config.calm_ticks),
        });
    }

    /// Decides the action for one tick.
    ///
    /// Never fails outward: a malformed window or a pipeline error is
    /// logged and answered with a scanning turn.
    pub fn on_tick(&mut self, window: &ObservationWindow) -> Action {
        match self.decide(window) {
            Ok(action) => action,
            Err(error) => {
                tracing::warn!(%error, "decision failed, falling back to scanning turn");
                Action::TurnRight
            }
        }
    }

    /// Ends the current match.
    pub fn on_match_end(&mut self, score: u32) {
        tracing::info!(score, "match ended");
        self.state = None;
    }

    /// Current behavioral mode, if a match is in progress.
    pub fn mode(&self) -> Option<DecisionMode> {
        self.state.as_ref().map(|state| state.machine.mode())
    }

    /// Current arena knowledge, if a match is in progress.
    pub fn belief(&self) -> Option<&BeliefMap> {
        self.state.as_ref().map(|state| &state.belief)
    }

    fn decide(&mut self, window: &ObservationWindow) -> Result<Action, DecisionError> {
        let state = self.state.as_mut().ok_or(DecisionError::NotReset)?;
        let MatchState {
            belief,
            exploration,
            agent,
            machine,
        } = state;

        agent.observe(window)?;
        let self_id = agent.id.unwrap_or(ActorId(0));
        belief.update(window, self_id);
        let tick = belief.tick();
        exploration.update(window, tick);

        let threats = self.threat_model.assess(belief, agent.position, self_id);

        let pickup = best_pickup(belief, agent.position, self_id, agent.weapon, &self.config)
            .filter(|cell| agent.position.manhattan_distance(*cell) <= self.config.scan_radius);
        let engagement = find_target(
            belief,
            agent.position,
            self_id,
            agent.weapon,
            agent.health,
            &self.config,
        );
        let objective_held = belief.shrine() == Some(agent.position);

        let mode = machine.transition(ModeInputs {
            critical_hazard: threats.critical_near_self,
            warning_hazard: threats.warning_near_self,
            valuable_pickup: pickup.is_some(),
            favorable_target: engagement.is_some(),
            objective_held,
        });
        tracing::debug!(%mode, tick, position = %agent.position, "tick");

        let goal = match mode {
            DecisionMode::FleeingHazard => {
                // No destination while fleeing: pure danger minimization.
                agent.clear_plan();
                let context = ScoreContext {
                    map: belief,
                    threats: &threats,
                    goal: None,
                    self_id,
                    position: agent.position,
                    facing: agent.facing,
                    tick,
                    config: &self.config,
                };
                return Ok(self.scorer.select(&context));
            }
            DecisionMode::Engaging => {
                // Mode transition only enters Engaging with a target; if
                // it evaporated mid-tick, scan.
                let Some(engagement) = engagement else {
                    agent.clear_plan();
                    return Ok(Action::TurnRight);
                };
                if can_hit(
                    &self.weaponry,
                    agent.weapon,
                    agent.position,
                    agent.facing,
                    belief,
                    engagement.position,
                ) {
                    agent.clear_plan();
                    return Ok(Action::Attack);
                }
                engagement.position
            }
            DecisionMode::Collecting => {
                let Some(pickup) = pickup else {
                    agent.clear_plan();
                    return Ok(Action::TurnRight);
                };
                pickup
            }
            DecisionMode::HoldingPosition => {
                // Stand on the objective and keep scanning.
                agent.clear_plan();
                return Ok(Action::TurnRight);
            }
            DecisionMode::Exploring => match exploration.pick_target(agent.position, tick, &self.config) {
                Some(center) => center,
                None => {
                    // Nothing left to explore: score in place.
                    agent.clear_plan();
                    let context = ScoreContext {
                        map: belief,
                        threats: &threats,
                        goal: None,
                        self_id,
                        position: agent.position,
                        facing: agent.facing,
                        tick,
                        config: &self.config,
                    };
                    return Ok(self.scorer.select(&context));
                }
            },
        };

        let next = Self::next_route_step(&self.config, &self.pathfinder, belief, agent, goal);
        let Some(next) = next else {
            // No route at all: fall back to scored movement toward the goal.
            agent.clear_plan();
            let context = ScoreContext {
                map: belief,
                threats: &threats,
                goal: Some(goal),
                self_id,
                position: agent.position,
                facing: agent.facing,
                tick,
                config: &self.config,
            };
            return Ok(self.scorer.select(&context));
        };

        // Re-score rather than walk into a cell that turned critical since
        // the route was planned. Engaging is exempt: the target's own
        // danger zone has to be entered to strike.
        if mode != DecisionMode::Engaging && threats.severity_at(next) == Some(Severity::Critical)
        {
            agent.clear_plan();
            let context = ScoreContext {
                map: belief,
                threats: &threats,
                goal: Some(goal),
                self_id,
                position: agent.position,
                facing: agent.facing,
                tick,
                config: &self.config,
            };
            return Ok(self.scorer.select(&context));
        }

        let quick = mode == DecisionMode::Engaging;
        let Some(action) = crate::motor::step_toward(agent.position, agent.facing, next, quick)
        else {
            agent.clear_plan();
            return Ok(Action::TurnRight);
        };

        // An enemy blocking the very next cell while we face it is an
        // attack of opportunity, not an obstacle.
        if action == Action::StepForward {
            let blocked_by_enemy = belief
                .get(next)
                .is_ok_and(|tile| tile.occupant.is_some());
            if blocked_by_enemy {
                agent.clear_plan();
                return Ok(Action::Attack);
            }
        }
        Ok(action)
    }

    /// The next cell to walk to, reusing the cached plan when it is still
    /// valid and replanning otherwise.
    fn next_route_step(
        config: &ControllerConfig,
        pathfinder: &PathFinder,
        belief: &BeliefMap,
        agent: &mut AgentState,
        goal: Coordinate,
    ) -> Option<Coordinate> {
        if agent.position == goal {
            agent.clear_plan();
            return None;
        }

        let cached_valid = agent.target == Some(goal)
            && agent.plan.front().is_some_and(|&next| {
                agent.position.manhattan_distance(next) == 1
                    && belief.is_steppable(next, config.allow_unknown)
            });
        if cached_valid {
            return agent.plan.front().copied();
        }

        let cost = travel_cost(belief, config, agent.weapon);
        let route = pathfinder.route(belief, agent.position, goal, &cost);
        if route.next_step == agent.position {
            agent.clear_plan();
            return None;
        }
        if !route.reachable {
            tracing::debug!(%goal, fallback = %route.next_step, "goal unreachable, heading to closest cell");
        }
        let next = route.next_step;
        agent.adopt_plan(goal, route.path);
        Some(next)
    }
}
