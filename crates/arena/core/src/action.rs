use crate::coords::{Coordinate, Facing};

/// The fixed action vocabulary a controller may emit each tick.
///
/// The external engine defines the exact grid effect of each action;
/// [`Action::simulate`] mirrors that effect for planning purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    TurnLeft,
    TurnRight,
    StepForward,
    StepLeft,
    StepRight,
    StepBackward,
    Attack,
    DoNothing,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::TurnLeft,
        Action::TurnRight,
        Action::StepForward,
        Action::StepLeft,
        Action::StepRight,
        Action::StepBackward,
        Action::Attack,
        Action::DoNothing,
    ];

    /// The four sidestep/step actions, in stable order.
    pub const STEPS: [Action; 4] = [
        Action::StepForward,
        Action::StepLeft,
        Action::StepRight,
        Action::StepBackward,
    ];

    /// Computes the (position, facing) an actor would occupy after this
    /// action, without mutating any real state.
    ///
    /// This is a total function over the closed action set: turns rotate
    /// in place, steps translate relative to the current facing without
    /// rotating, and Attack/DoNothing leave the pose unchanged. Legality
    /// (walls, occupancy, bounds) is the caller's concern.
    pub fn simulate(self, position: Coordinate, facing: Facing) -> (Coordinate, Facing) {
        match self {
            Action::TurnLeft => (position, facing.turn_left()),
            Action::TurnRight => (position, facing.turn_right()),
            Action::StepForward => (facing.step_from(position), facing),
            Action::StepLeft => (facing.turn_left().step_from(position), facing),
            Action::StepRight => (facing.turn_right().step_from(position), facing),
            Action::StepBackward => (facing.opposite().step_from(position), facing),
            Action::Attack => (position, facing),
            Action::DoNothing => (position, facing),
        }
    }

    /// Whether this action changes the actor's position.
    pub const fn is_step(self) -> bool {
        matches!(
            self,
            Action::StepForward | Action::StepLeft | Action::StepRight | Action::StepBackward
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_rotate_in_place() {
        let pos = Coordinate::new(3, 3);
        for facing in Facing::ALL {
            let (p, f) = Action::TurnLeft.simulate(pos, facing);
            assert_eq!(p, pos);
            assert_eq!(f, facing.turn_left());

            let (p, f) = Action::TurnRight.simulate(pos, facing);
            assert_eq!(p, pos);
            assert_eq!(f, facing.turn_right());
        }
    }

    #[test]
    fn steps_translate_without_rotating() {
        let pos = Coordinate::new(0, 0);
        let facing = Facing::North;

        let (p, f) = Action::StepForward.simulate(pos, facing);
        assert_eq!((p, f), (Coordinate::new(0, 1), Facing::North));

        let (p, f) = Action::StepLeft.simulate(pos, facing);
        assert_eq!((p, f), (Coordinate::new(-1, 0), Facing::North));

        let (p, f) = Action::StepRight.simulate(pos, facing);
        assert_eq!((p, f), (Coordinate::new(1, 0), Facing::North));

        let (p, f) = Action::StepBackward.simulate(pos, facing);
        assert_eq!((p, f), (Coordinate::new(0, -1), Facing::North));
    }

    #[test]
    fn attack_and_idle_are_identity() {
        let pose = (Coordinate::new(7, -2), Facing::West);
        assert_eq!(Action::Attack.simulate(pose.0, pose.1), pose);
        assert_eq!(Action::DoNothing.simulate(pose.0, pose.1), pose);
    }

    #[test]
    fn every_action_simulates_for_every_facing() {
        // Exhaustive sweep: simulate must be total over the closed enum.
        let pos = Coordinate::new(1, 1);
        for action in Action::ALL {
            for facing in Facing::ALL {
                let (p, _) = action.simulate(pos, facing);
                assert!(pos.manhattan_distance(p) <= 1);
                assert_eq!(action.is_step(), p != pos);
            }
        }
    }
}
