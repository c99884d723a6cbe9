use crate::coords::Coordinate;
use crate::layout::ArenaBounds;

/// A coordinate was queried outside the static arena bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("coordinate {coordinate} outside arena bounds {}x{}", bounds.width, bounds.height)]
pub struct BoundsError {
    pub coordinate: Coordinate,
    pub bounds: ArenaBounds,
}

/// Errors produced while parsing an arena text layout.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("unknown tile symbol {symbol:?} at row {row}, column {column}")]
    UnknownSymbol { symbol: char, row: usize, column: usize },
}
