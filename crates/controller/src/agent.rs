//! The agent's view of itself, plus cached plan state between ticks.

use std::collections::VecDeque;

use arena_core::{ActorId, Coordinate, Facing, ObservationWindow, WeaponClass};

use crate::error::DecisionError;

/// Self-state refreshed from every observation window.
///
/// Caches the current navigation target and the remainder of the planned
/// path so the route is not recomputed while it stays valid.
#[derive(Clone, Debug)]
pub struct AgentState {
    pub id: Option<ActorId>,
    pub position: Coordinate,
    pub facing: Facing,
    pub weapon: WeaponClass,
    pub health: u32,
    /// Navigation goal the cached plan leads to.
    pub target: Option<Coordinate>,
    /// Remaining cells of the cached route, front first.
    pub plan: VecDeque<Coordinate>,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            id: None,
            position: Coordinate::ORIGIN,
            facing: Facing::North,
            weapon: WeaponClass::Knife,
            health: 0,
            target: None,
            plan: VecDeque::new(),
        }
    }
}

impl AgentState {
    /// Refreshes self-state from the tick's observation window.
    ///
    /// The window must contain the agent's own cell with its own actor
    /// record; the engine guarantees this for live agents, so a missing
    /// record is a malformed window.
    pub fn observe(&mut self, window: &ObservationWindow) -> Result<(), DecisionError> {
        let tile = window
            .own_tile()
            .ok_or(DecisionError::MissingSelfTile(window.position))?;
        let actor = tile
            .occupant
            .ok_or(DecisionError::MissingSelfActor(window.position))?;

        self.id = Some(actor.id);
        self.position = window.position;
        self.facing = actor.facing;
        self.weapon = actor.weapon;
        self.health = actor.health;

        // The cached plan is position-relative; drop any prefix already
        // walked, and the whole plan if the agent is off-route.
        while self.plan.front() == Some(&self.position) {
            self.plan.pop_front();
        }
        Ok(())
    }

    /// Replaces the cached route.
    pub fn adopt_plan(&mut self, target: Coordinate, path: impl IntoIterator<Item = Coordinate>) {
        self.target = Some(target);
        self.plan = path.into_iter().collect();
    }

    /// Invalidates all cached navigation.
    pub fn clear_plan(&mut self) {
        self.target = None;
        self.plan.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{ActorObservation, TerrainKind, TileObservation};

    fn window_at(position: Coordinate, id: u32) -> ObservationWindow {
        ObservationWindow::new(position).with_tile(
            position,
            TileObservation::terrain(TerrainKind::Open).with_occupant(ActorObservation {
                id: ActorId(id),
                facing: Facing::East,
                weapon: WeaponClass::Sword,
                health: 7,
            }),
        )
    }

    #[test]
    fn observe_refreshes_self_state() {
        let mut state = AgentState::default();
        state.observe(&window_at(Coordinate::new(3, 4), 9)).unwrap();
        assert_eq!(state.id, Some(ActorId(9)));
        assert_eq!(state.position, Coordinate::new(3, 4));
        assert_eq!(state.facing, Facing::East);
        assert_eq!(state.weapon, WeaponClass::Sword);
        assert_eq!(state.health, 7);
    }

    #[test]
    fn malformed_windows_are_rejected() {
        let mut state = AgentState::default();
        let empty = ObservationWindow::new(Coordinate::new(1, 1));
        assert_eq!(
            state.observe(&empty),
            Err(DecisionError::MissingSelfTile(Coordinate::new(1, 1)))
        );

        let no_actor = ObservationWindow::new(Coordinate::new(1, 1)).with_tile(
            Coordinate::new(1, 1),
            TileObservation::terrain(TerrainKind::Open),
        );
        assert_eq!(
            state.observe(&no_actor),
            Err(DecisionError::MissingSelfActor(Coordinate::new(1, 1)))
        );
    }

    #[test]
    fn walked_plan_prefix_is_consumed() {
        let mut state = AgentState::default();
        state.adopt_plan(
            Coordinate::new(3, 0),
            [
                Coordinate::new(1, 0),
                Coordinate::new(2, 0),
                Coordinate::new(3, 0),
            ],
        );
        state.observe(&window_at(Coordinate::new(1, 0), 9)).unwrap();
        assert_eq!(state.plan.front(), Some(&Coordinate::new(2, 0)));
        assert_eq!(state.plan.len(), 2);
    }
}
