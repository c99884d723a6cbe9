//! Pickup evaluation.
//!
//! Ranks every known ground item by how much it improves the agent's
//! loadout, discounted by travel distance and by enemies positioned to
//! contest the grab.

use arena_core::{ActorId, Coordinate, ItemKind, WeaponClass};

use crate::belief::BeliefMap;
use crate::config::{weapon_value, ControllerConfig};

/// Intrinsic value of picking `item` up while holding `held`.
///
/// `None` means the item is not worth a detour: a sidegrade or downgrade
/// weapon, or anything once the best weapon is already in hand.
fn pickup_value(item: ItemKind, held: WeaponClass, config: &ControllerConfig) -> Option<f64> {
    match item {
        ItemKind::Potion => Some(config.potion_value),
        ItemKind::Weapon(_) if held == WeaponClass::Axe => None,
        ItemKind::Weapon(ground) => {
            let gain = weapon_value(ground) - weapon_value(held);
            (gain > 0.0).then_some(gain)
        }
    }
}

/// The most attractive known pickup, if any is worth pursuing.
///
/// Priority decays with distance and is cut for every tracked enemy at
/// least as close to the item as the agent, so contested loot loses to
/// safe loot. Ties resolve to the first cell in coordinate order.
pub fn best_pickup(
    map: &BeliefMap,
    self_position: Coordinate,
    self_id: ActorId,
    held: WeaponClass,
    config: &ControllerConfig,
) -> Option<Coordinate> {
    let mut best: Option<(f64, Coordinate)> = None;

    for &cell in map.loot_cells() {
        let Some(item) = map.loot_at(cell) else {
            continue;
        };
        let Some(value) = pickup_value(item, held, config) else {
            continue;
        };

        let our_distance = self_position.manhattan_distance(cell);
        let mut priority = value
            * config.collection_base_factor
            * config
                .collection_distance_factor
                .powi(our_distance.saturating_sub(1).min(50) as i32);

        for (&id, tracked) in map.actors() {
            if id == self_id {
                continue;
            }
            let enemy_distance = tracked.position.manhattan_distance(cell);
            if enemy_distance <= our_distance {
                let edge = (our_distance - enemy_distance + 1).min(10);
                priority *= config.collection_enemy_factor.powi(edge as i32);
            }
        }

        if best.is_none_or(|(top, _)| priority > top) {
            best = Some((priority, cell));
        }
    }

    if let Some((priority, cell)) = best {
        tracing::debug!(%cell, priority, "best pickup candidate");
    }
    best.map(|(_, cell)| cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{
        ActorObservation, Facing, ObservationWindow, StaticArenaLayout, TerrainKind,
        TileObservation,
    };
    use crate::belief::BeliefMap;

    const ME: ActorId = ActorId(0);

    fn open_map(size: u32) -> BeliefMap {
        let text = vec![".".repeat(size as usize); size as usize].join("\n");
        let layout = StaticArenaLayout::parse("collect-test", &text).unwrap();
        BeliefMap::seed(&layout, 100, 4)
    }

    fn drop_item(map: &mut BeliefMap, cell: Coordinate, item: ItemKind) {
        map.update(
            &ObservationWindow::new(Coordinate::new(0, 0)).with_tile(
                cell,
                TileObservation::terrain(TerrainKind::Open).with_loot(item),
            ),
            ME,
        );
    }

    #[test]
    fn upgrades_attract_and_downgrades_do_not() {
        let mut map = open_map(9);
        drop_item(
            &mut map,
            Coordinate::new(4, 4),
            ItemKind::Weapon(WeaponClass::Axe),
        );
        let config = ControllerConfig::default_preset();
        let from = Coordinate::new(0, 0);

        assert_eq!(
            best_pickup(&map, from, ME, WeaponClass::Knife, &config),
            Some(Coordinate::new(4, 4))
        );
        // Already carrying the best weapon: nothing to collect.
        assert_eq!(best_pickup(&map, from, ME, WeaponClass::Axe, &config), None);
    }

    #[test]
    fn sidegrades_are_ignored() {
        let mut map = open_map(9);
        drop_item(
            &mut map,
            Coordinate::new(2, 2),
            ItemKind::Weapon(WeaponClass::Sword),
        );
        let config = ControllerConfig::default_preset();
        assert_eq!(
            best_pickup(&map, Coordinate::new(0, 0), ME, WeaponClass::Sword, &config),
            None
        );
    }

    #[test]
    fn potions_are_always_worth_something() {
        let mut map = open_map(9);
        drop_item(&mut map, Coordinate::new(3, 3), ItemKind::Potion);
        let config = ControllerConfig::default_preset();
        assert_eq!(
            best_pickup(&map, Coordinate::new(0, 0), ME, WeaponClass::Axe, &config),
            Some(Coordinate::new(3, 3))
        );
    }

    #[test]
    fn nearer_of_two_equal_items_wins() {
        let mut map = open_map(13);
        drop_item(&mut map, Coordinate::new(2, 0), ItemKind::Potion);
        drop_item(&mut map, Coordinate::new(10, 0), ItemKind::Potion);
        let config = ControllerConfig::default_preset();
        assert_eq!(
            best_pickup(&map, Coordinate::new(0, 0), ME, WeaponClass::Knife, &config),
            Some(Coordinate::new(2, 0))
        );
    }

    #[test]
    fn contested_loot_loses_to_safe_loot() {
        let mut map = open_map(13);
        // Two identical potions at equal distance; an enemy camps next to
        // the first.
        drop_item(&mut map, Coordinate::new(4, 0), ItemKind::Potion);
        drop_item(&mut map, Coordinate::new(0, 4), ItemKind::Potion);
        map.update(
            &ObservationWindow::new(Coordinate::new(0, 0)).with_tile(
                Coordinate::new(4, 1),
                TileObservation::terrain(TerrainKind::Open).with_occupant(ActorObservation {
                    id: ActorId(5),
                    facing: Facing::South,
                    weapon: WeaponClass::Sword,
                    health: 10,
                }),
            ),
            ME,
        );
        let config = ControllerConfig::default_preset();
        assert_eq!(
            best_pickup(&map, Coordinate::new(0, 0), ME, WeaponClass::Knife, &config),
            Some(Coordinate::new(0, 4))
        );
    }
}
