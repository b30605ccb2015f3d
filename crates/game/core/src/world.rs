//! Levels, tiles, and per-tile resource stock.
//!
//! The world is three stacked toroidal hex grids. Each level eagerly owns one
//! [`Tile`] per coordinate; tiles hold at most one occupant (by handle) and a
//! resource stock with strictly positive entries.

use std::collections::BTreeMap;

use crate::grid::{Coordinate, GridSize, Side};
use crate::types::ObjectRef;

/// The three vertical layers of the world, ordered bottom to top.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelType {
    Ground,
    Sky,
    Space,
}

impl LevelType {
    pub const ALL: [LevelType; 3] = [LevelType::Ground, LevelType::Sky, LevelType::Space];

    /// The level directly above, if any.
    pub const fn up(self) -> Option<LevelType> {
        match self {
            LevelType::Ground => Some(LevelType::Sky),
            LevelType::Sky => Some(LevelType::Space),
            LevelType::Space => None,
        }
    }

    /// The level directly below, if any.
    pub const fn down(self) -> Option<LevelType> {
        match self {
            LevelType::Ground => None,
            LevelType::Sky => Some(LevelType::Ground),
            LevelType::Space => Some(LevelType::Sky),
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            LevelType::Ground => 0,
            LevelType::Sky => 1,
            LevelType::Space => 2,
        }
    }
}

/// Kinds of resources a tile or container can stock.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceType {
    Metals,
    Fuel,
    Silicon,
    RareElements,
}

/// Identity of a tile: its level plus its planar coordinate.
///
/// All cross-references to tiles (object locations, quotes, events) use this
/// copyable handle; the [`Tile`] itself is owned by its [`Level`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileRef {
    pub level: LevelType,
    pub position: Coordinate,
}

impl TileRef {
    pub fn new(level: LevelType, position: Coordinate) -> Self {
        Self { level, position }
    }

    /// The tile at the same planar coordinate on another level.
    pub fn on_level(self, level: LevelType) -> Self {
        Self { level, ..self }
    }

    pub fn neighbour(self, side: Side, size: GridSize) -> Self {
        Self {
            level: self.level,
            position: self.position.neighbour(side, size),
        }
    }

    /// The six adjacent tiles on the same level.
    pub fn neighbours(self, size: GridSize) -> [TileRef; 6] {
        Side::ALL.map(|side| self.neighbour(side, size))
    }

    /// All tiles within hex distance `distance` on the same level, inclusive
    /// of this tile, enumerated by axial offsets.
    pub fn neighbours_within(self, distance: u32, size: GridSize) -> Vec<TileRef> {
        let d = i64::from(distance);
        let mut tiles = Vec::new();
        for du in -d..=d {
            let lo = (-d).max(-du - d);
            let hi = d.min(-du + d);
            for dv in lo..=hi {
                tiles.push(TileRef {
                    level: self.level,
                    position: self.position.delta(du, dv, size),
                });
            }
        }
        tiles
    }
}

impl std::fmt::Display for TileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.position, self.level)
    }
}

/// One grid cell: optional occupant handle plus resource stock.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    position: Coordinate,
    contents: Option<ObjectRef>,
    resources: BTreeMap<ResourceType, u32>,
}

impl Tile {
    fn new(position: Coordinate) -> Self {
        Self {
            position,
            contents: None,
            resources: BTreeMap::new(),
        }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn contents(&self) -> Option<ObjectRef> {
        self.contents
    }

    /// A tile is accessible when nothing occupies it.
    pub fn is_accessible(&self) -> bool {
        self.contents.is_none()
    }

    /// Stocked quantity, or `None` when the tile carries none of the resource.
    /// A stored zero is never observable: zero entries are removed on write.
    pub fn resource_quantity(&self, resource: ResourceType) -> Option<u32> {
        self.resources.get(&resource).copied()
    }

    pub fn resources(&self) -> &BTreeMap<ResourceType, u32> {
        &self.resources
    }

    /// Occupies the tile. Fails when already occupied (exclusive occupancy).
    pub(crate) fn set_contents(&mut self, contents: ObjectRef) -> Result<(), ObjectRef> {
        match self.contents {
            Some(occupant) => Err(occupant),
            None => {
                self.contents = Some(contents);
                Ok(())
            }
        }
    }

    pub(crate) fn clear_contents(&mut self) -> Option<ObjectRef> {
        self.contents.take()
    }

    pub(crate) fn set_resource_quantity(&mut self, resource: ResourceType, quantity: u32) {
        if quantity == 0 {
            self.resources.remove(&resource);
        } else {
            self.resources.insert(resource, quantity);
        }
    }
}

/// One full toroidal grid of tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    kind: LevelType,
    size: GridSize,
    tiles: Vec<Tile>,
}

impl Level {
    pub(crate) fn new(kind: LevelType, size: GridSize) -> Self {
        let mut tiles = Vec::with_capacity(size.tile_count());
        for v in 0..size.height {
            for u in 0..size.width {
                tiles.push(Tile::new(Coordinate::new(i64::from(u), i64::from(v), size)));
            }
        }
        Self { kind, size, tiles }
    }

    pub fn kind(&self) -> LevelType {
        self.kind
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    fn tile_index(&self, position: Coordinate) -> usize {
        position.v() as usize * self.size.width as usize + position.u() as usize
    }

    /// The tile at the given coordinate. Always succeeds: coordinates are
    /// normalized into bounds by construction.
    pub fn tile(&self, position: Coordinate) -> &Tile {
        &self.tiles[self.tile_index(position)]
    }

    pub(crate) fn tile_mut(&mut self, position: Coordinate) -> &mut Tile {
        let index = self.tile_index(position);
        &mut self.tiles[index]
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}
