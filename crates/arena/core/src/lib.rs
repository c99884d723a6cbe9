//! Engine-facing value types shared by arena controllers.
//!
//! `arena-core` defines the vocabulary a controller exchanges with the
//! external arena engine: grid coordinates, terrain and hazard kinds, the
//! fixed action set, per-tick observation windows, static arena layouts,
//! and the opaque weapon-geometry query. It contains no decision logic
//! and performs no I/O beyond parsing arena text layouts.
pub mod action;
pub mod coords;
pub mod error;
pub mod layout;
pub mod observe;
pub mod rng;
pub mod terrain;
pub mod weapon;

pub use action::Action;
pub use coords::{Coordinate, Facing};
pub use error::{BoundsError, LayoutError};
pub use layout::{ArenaBounds, StaticArenaLayout};
pub use observe::{ActorId, ActorObservation, ObservationWindow, TileObservation};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use terrain::{HazardSet, ItemKind, TerrainKind, WeaponClass};
pub use weapon::{StandardWeaponry, WeaponGeometry};
