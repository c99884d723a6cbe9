//! Decision core for grid-arena agents.
//!
//! The controller consumes per-tick observation windows and produces one
//! action per tick: it maintains a belief map of the arena, classifies
//! hazard and enemy threats, runs a mode state machine, and routes over
//! the believed terrain with deterministic tie-breaking throughout.

pub mod agent;
pub mod belief;
pub mod collect;
pub mod combat;
pub mod config;
pub mod controller;
pub mod error;
pub mod explore;
pub mod mode;
pub mod motor;
pub mod nav;
pub mod scoring;
pub mod threat;

pub use agent::AgentState;
pub use belief::{BeliefMap, TerrainBelief, TileKnowledge, TrackedActor};
pub use collect::best_pickup;
pub use combat::{can_hit, find_target, matchup_chance, Engagement};
pub use config::{weapon_value, ControllerConfig};
pub use controller::ArenaController;
pub use error::{ConfigError, DecisionError};
pub use explore::{sector_center, ExplorationMap};
pub use mode::{DecisionMode, ModeInputs, ModeMachine};
pub use nav::{travel_cost, PathFinder, Route};
pub use scoring::{ActionScore, ActionScorer, ScoreContext};
pub use threat::{Severity, ThreatModel, ThreatSet};
