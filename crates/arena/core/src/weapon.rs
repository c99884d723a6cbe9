use crate::coords::{Coordinate, Facing};
use crate::layout::ArenaBounds;
use crate::terrain::WeaponClass;

/// Opaque engine query for the cells a weapon threatens this tick.
///
/// The engine owns the exact hit patterns; controllers only consume the
/// resulting cell set, e.g. when deciding whether an attack would connect.
pub trait WeaponGeometry: Send + Sync {
    fn threatened_cells(
        &self,
        class: WeaponClass,
        position: Coordinate,
        facing: Facing,
        bounds: ArenaBounds,
    ) -> Vec<Coordinate>;
}

/// Reference weapon shapes approximating the engine's patterns.
///
/// - Knife: 1 cell straight ahead.
/// - Sword: line of 3 cells straight ahead.
/// - Axe: frontal arc (ahead, ahead-left, ahead-right).
/// - Bow: line of up to 8 cells straight ahead.
/// - Amulet: the four diagonal neighbors plus the distance-2 diagonals.
/// - Scroll: line of 5 cells straight ahead.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardWeaponry;

impl StandardWeaponry {
    fn line(
        position: Coordinate,
        facing: Facing,
        reach: i32,
        bounds: ArenaBounds,
    ) -> Vec<Coordinate> {
        let (dx, dy) = facing.delta();
        (1..=reach)
            .map(|step| Coordinate::new(position.x + dx * step, position.y + dy * step))
            .filter(|cell| bounds.contains(*cell))
            .collect()
    }
}

impl WeaponGeometry for StandardWeaponry {
    fn threatened_cells(
        &self,
        class: WeaponClass,
        position: Coordinate,
        facing: Facing,
        bounds: ArenaBounds,
    ) -> Vec<Coordinate> {
        match class {
            WeaponClass::Knife => Self::line(position, facing, 1, bounds),
            WeaponClass::Sword => Self::line(position, facing, 3, bounds),
            WeaponClass::Bow => Self::line(position, facing, 8, bounds),
            WeaponClass::Scroll => Self::line(position, facing, 5, bounds),
            WeaponClass::Axe => {
                let ahead = facing.step_from(position);
                [
                    ahead,
                    facing.turn_left().step_from(ahead),
                    facing.turn_right().step_from(ahead),
                ]
                .into_iter()
                .filter(|cell| bounds.contains(*cell))
                .collect()
            }
            WeaponClass::Amulet => {
                let diagonals = [(1, 1), (1, -1), (-1, 1), (-1, -1), (2, 2), (2, -2), (-2, 2), (-2, -2)];
                diagonals
                    .into_iter()
                    .map(|(dx, dy)| Coordinate::new(position.x + dx, position.y + dy))
                    .filter(|cell| bounds.contains(*cell))
                    .collect()
            }
        }
    }
}
