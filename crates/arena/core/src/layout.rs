use std::collections::BTreeMap;

use crate::coords::Coordinate;
use crate::error::LayoutError;
use crate::terrain::{ItemKind, TerrainKind, WeaponClass};

/// Static rectangular extent of an arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArenaBounds {
    pub width: u32,
    pub height: u32,
}

impl ArenaBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.x >= 0
            && coordinate.y >= 0
            && coordinate.x < self.width as i32
            && coordinate.y < self.height as i32
    }

    /// Row-major storage index for an in-bounds coordinate.
    pub fn index(&self, coordinate: Coordinate) -> Option<usize> {
        self.contains(coordinate)
            .then(|| coordinate.y as usize * self.width as usize + coordinate.x as usize)
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Iterates every in-bounds coordinate in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Coordinate::new(x, y)))
    }
}

/// Full terrain grid delivered once at match reset (no hazards, no actors).
///
/// Weapon letters in the text format also seed an initial ground item,
/// mirroring how arenas place starting weapons.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticArenaLayout {
    pub name: String,
    pub bounds: ArenaBounds,
    pub terrain: BTreeMap<Coordinate, TerrainKind>,
    pub initial_items: BTreeMap<Coordinate, ItemKind>,
}

impl StaticArenaLayout {
    /// Parses the arena text format.
    ///
    /// Symbols: `.` open, `#` wall, `=` water, `@` forest, `M` shrine.
    /// Weapon letters stand on open ground and seed that weapon:
    /// `k` knife, `s` sword, `a` axe, `b` bow, `u` amulet, `r` scroll.
    /// Rows must all have the same width. Row 0 is y = 0.
    pub fn parse(name: &str, text: &str) -> Result<Self, LayoutError> {
        let mut terrain = BTreeMap::new();
        let mut initial_items = BTreeMap::new();
        let mut width: Option<usize> = None;
        let mut height = 0usize;

        for (row, line) in text.lines().filter(|line| !line.trim().is_empty()).enumerate() {
            let line = line.trim_end();
            match width {
                None => width = Some(line.len()),
                Some(expected) if line.len() != expected => {
                    return Err(LayoutError::RaggedRow {
                        row,
                        found: line.len(),
                        expected,
                    });
                }
                Some(_) => {}
            }

            for (column, symbol) in line.chars().enumerate() {
                let coordinate = Coordinate::new(column as i32, row as i32);
                let (kind, item) = match symbol {
                    '.' => (TerrainKind::Open, None),
                    '#' => (TerrainKind::Wall, None),
                    '=' => (TerrainKind::Water, None),
                    '@' => (TerrainKind::Forest, None),
                    'M' => (TerrainKind::Shrine, None),
                    'k' => (TerrainKind::Open, Some(ItemKind::Weapon(WeaponClass::Knife))),
                    's' => (TerrainKind::Open, Some(ItemKind::Weapon(WeaponClass::Sword))),
                    'a' => (TerrainKind::Open, Some(ItemKind::Weapon(WeaponClass::Axe))),
                    'b' => (TerrainKind::Open, Some(ItemKind::Weapon(WeaponClass::Bow))),
                    'u' => (TerrainKind::Open, Some(ItemKind::Weapon(WeaponClass::Amulet))),
                    'r' => (TerrainKind::Open, Some(ItemKind::Weapon(WeaponClass::Scroll))),
                    'p' => (TerrainKind::Open, Some(ItemKind::Potion)),
                    _ => {
                        return Err(LayoutError::UnknownSymbol {
                            symbol,
                            row,
                            column,
                        });
                    }
                };
                terrain.insert(coordinate, kind);
                if let Some(item) = item {
                    initial_items.insert(coordinate, item);
                }
            }
            height = row + 1;
        }

        let width = width.filter(|w| *w > 0).ok_or(LayoutError::Empty)?;
        if height == 0 {
            return Err(LayoutError::Empty);
        }

        Ok(Self {
            name: name.to_owned(),
            bounds: ArenaBounds::new(width as u32, height as u32),
            terrain,
            initial_items,
        })
    }

    pub fn terrain_at(&self, coordinate: Coordinate) -> Option<TerrainKind> {
        self.terrain.get(&coordinate).copied()
    }
}
