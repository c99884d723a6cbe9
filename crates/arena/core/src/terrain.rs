/// Canonical terrain classes for arena tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Open,
    Forest,
    Wall,
    Water,
    /// Fixed landmark actors seek to hold for scoring purposes.
    Shrine,
}

impl TerrainKind {
    /// Whether an actor may stand on this terrain.
    pub const fn is_passable(self) -> bool {
        !matches!(self, TerrainKind::Wall | TerrainKind::Water)
    }

    /// Whether occupants of this terrain are hidden from attackers.
    pub const fn conceals(self) -> bool {
        matches!(self, TerrainKind::Forest)
    }
}

bitflags::bitflags! {
    /// Set of transient hazard effects present on a tile.
    ///
    /// A hazard damages an actor occupying or adjacent to the cell each
    /// tick, so controllers treat hazard cells as terrain-independent
    /// danger sources.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct HazardSet: u8 {
        const MIST = 1 << 0;
        const FIRE = 1 << 1;
    }
}

// bitflags does not derive serde impls for user-defined flags types, so
// the set crosses the wire as its raw bits.
#[cfg(feature = "serde")]
impl serde::Serialize for HazardSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for HazardSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(HazardSet::from_bits_retain(bits))
    }
}

/// Weapon classes an actor can hold or find on the ground.
///
/// Exact hit geometry is owned by the engine and queried through
/// [`crate::WeaponGeometry`]; controllers only reason about the class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponClass {
    Knife,
    Sword,
    Axe,
    Bow,
    Amulet,
    Scroll,
}

/// Item lying on a tile, as reported by the observation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Weapon(WeaponClass),
    Potion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_and_water_are_impassable() {
        assert!(!TerrainKind::Wall.is_passable());
        assert!(!TerrainKind::Water.is_passable());
        assert!(TerrainKind::Open.is_passable());
        assert!(TerrainKind::Forest.is_passable());
        assert!(TerrainKind::Shrine.is_passable());
    }

    #[test]
    fn hazard_set_combines() {
        let both = HazardSet::MIST | HazardSet::FIRE;
        assert!(both.contains(HazardSet::MIST));
        assert!(both.contains(HazardSet::FIRE));
        assert!(HazardSet::default().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn hazard_set_serializes_as_raw_bits() {
        let both = HazardSet::MIST | HazardSet::FIRE;
        let json = serde_json::to_string(&both).unwrap();
        assert_eq!(json, "3");
        let back: HazardSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, both);

        let empty: HazardSet = serde_json::from_str("0").unwrap();
        assert!(empty.is_empty());
    }
}
