use std::collections::BTreeMap;
use std::fmt;

use crate::coords::{Coordinate, Facing};
use crate::terrain::{HazardSet, ItemKind, TerrainKind, WeaponClass};

/// Unique identifier for an actor tracked by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An actor as seen on a tile this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorObservation {
    pub id: ActorId,
    pub facing: Facing,
    pub weapon: WeaponClass,
    pub health: u32,
}

/// Per-cell description delivered by the engine for a visible tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileObservation {
    pub terrain: TerrainKind,
    pub hazards: HazardSet,
    pub occupant: Option<ActorObservation>,
    pub loot: Option<ItemKind>,
}

impl TileObservation {
    /// A bare tile of the given terrain with nothing on it.
    pub const fn terrain(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            hazards: HazardSet::empty(),
            occupant: None,
            loot: None,
        }
    }

    pub fn with_hazards(mut self, hazards: HazardSet) -> Self {
        self.hazards = hazards;
        self
    }

    pub fn with_occupant(mut self, occupant: ActorObservation) -> Self {
        self.occupant = Some(occupant);
        self
    }

    pub fn with_loot(mut self, loot: ItemKind) -> Self {
        self.loot = Some(loot);
        self
    }
}

/// Egocentric view of the arena delivered once per tick.
///
/// `position` is the observing agent's own cell; that cell must be present
/// in `tiles` and its occupant record describes the agent itself.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservationWindow {
    pub position: Coordinate,
    pub tiles: BTreeMap<Coordinate, TileObservation>,
}

impl ObservationWindow {
    pub fn new(position: Coordinate) -> Self {
        Self {
            position,
            tiles: BTreeMap::new(),
        }
    }

    pub fn with_tile(mut self, coordinate: Coordinate, tile: TileObservation) -> Self {
        self.tiles.insert(coordinate, tile);
        self
    }

    /// The observation of the agent's own cell, if the window is well formed.
    pub fn own_tile(&self) -> Option<&TileObservation> {
        self.tiles.get(&self.position)
    }

    /// The agent's own actor record, if the window is well formed.
    pub fn own_actor(&self) -> Option<&ActorObservation> {
        self.own_tile().and_then(|tile| tile.occupant.as_ref())
    }
}
