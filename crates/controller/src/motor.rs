//! Translation from "go to that adjacent cell" into a concrete action.

use arena_core::{Action, Coordinate, Facing};

/// The action moving the agent toward an adjacent `target` cell.
///
/// With `quick` set, sidesteps and backsteps are used so the move lands
/// this tick; otherwise the agent turns to face the target first, which
/// keeps its weapon pointed along its path. Returns `None` when the
/// target is not an adjacent cell.
pub fn step_toward(
    position: Coordinate,
    facing: Facing,
    target: Coordinate,
    quick: bool,
) -> Option<Action> {
    let needed = Facing::toward(position, target)?;
    let action = if needed == facing {
        Action::StepForward
    } else if needed == facing.turn_right() {
        if quick {
            Action::StepRight
        } else {
            Action::TurnRight
        }
    } else if needed == facing.turn_left() {
        if quick {
            Action::StepLeft
        } else {
            Action::TurnLeft
        }
    } else if quick {
        Action::StepBackward
    } else {
        Action::TurnRight
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HERE: Coordinate = Coordinate::new(5, 5);

    #[test]
    fn forward_when_already_facing() {
        let ahead = Facing::North.step_from(HERE);
        assert_eq!(
            step_toward(HERE, Facing::North, ahead, false),
            Some(Action::StepForward)
        );
        assert_eq!(
            step_toward(HERE, Facing::North, ahead, true),
            Some(Action::StepForward)
        );
    }

    #[test]
    fn quick_mode_sidesteps_instead_of_turning() {
        let east = Facing::East.step_from(HERE);
        assert_eq!(
            step_toward(HERE, Facing::North, east, false),
            Some(Action::TurnRight)
        );
        assert_eq!(
            step_toward(HERE, Facing::North, east, true),
            Some(Action::StepRight)
        );

        let west = Facing::West.step_from(HERE);
        assert_eq!(
            step_toward(HERE, Facing::North, west, false),
            Some(Action::TurnLeft)
        );
        assert_eq!(
            step_toward(HERE, Facing::North, west, true),
            Some(Action::StepLeft)
        );
    }

    #[test]
    fn reverse_target_backsteps_or_turns() {
        let behind = Facing::South.step_from(HERE);
        assert_eq!(
            step_toward(HERE, Facing::North, behind, true),
            Some(Action::StepBackward)
        );
        assert_eq!(
            step_toward(HERE, Facing::North, behind, false),
            Some(Action::TurnRight)
        );
    }

    #[test]
    fn every_quick_move_lands_on_the_target() {
        for facing in Facing::ALL {
            for direction in Facing::ALL {
                let target = direction.step_from(HERE);
                let action = step_toward(HERE, facing, target, true).unwrap();
                let (landing, _) = action.simulate(HERE, facing);
                assert_eq!(landing, target, "{facing:?} toward {direction:?}");
            }
        }
    }

    #[test]
    fn non_adjacent_targets_are_rejected() {
        assert_eq!(step_toward(HERE, Facing::North, HERE, false), None);
        assert_eq!(
            step_toward(HERE, Facing::North, Coordinate::new(7, 5), false),
            None
        );
        assert_eq!(
            step_toward(HERE, Facing::North, Coordinate::new(6, 6), false),
            None
        );
    }
}
