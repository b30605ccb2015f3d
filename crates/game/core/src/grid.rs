//! Toroidal axial hex addressing.
//!
//! Every level of the world is a hex grid that wraps around in both axes.
//! Coordinates are stored normalized into `[0, width) x [0, height)`; all
//! arithmetic goes through [`Coordinate::delta`] so callers never see an
//! out-of-bounds value.

use std::fmt;

/// Extent of one level's grid, shared by all levels of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Position on the toroidal hex grid, in axial coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    u: u32,
    v: u32,
}

impl Coordinate {
    pub const ORIGIN: Self = Self { u: 0, v: 0 };

    /// Creates a coordinate, wrapping the components into the grid.
    pub fn new(u: i64, v: i64, size: GridSize) -> Self {
        let w = i64::from(size.width);
        let h = i64::from(size.height);
        Self {
            u: u.rem_euclid(w) as u32,
            v: v.rem_euclid(h) as u32,
        }
    }

    pub fn u(self) -> u32 {
        self.u
    }

    pub fn v(self) -> u32 {
        self.v
    }

    /// Offsets this coordinate, wrapping around the torus.
    pub fn delta(self, du: i64, dv: i64, size: GridSize) -> Self {
        Self::new(i64::from(self.u) + du, i64::from(self.v) + dv, size)
    }

    /// The adjacent coordinate on the given side.
    pub fn neighbour(self, side: Side, size: GridSize) -> Self {
        let (du, dv) = side.delta();
        self.delta(du, dv, size)
    }

    /// Hex distance to `other`, taking the shortest way around the torus.
    pub fn distance_to(self, other: Coordinate, size: GridSize) -> u32 {
        let w = i64::from(size.width);
        let h = i64::from(size.height);
        let du = i64::from(other.u) - i64::from(self.u);
        let dv = i64::from(other.v) - i64::from(self.v);

        let mut best = u32::MAX;
        for du in [du, du - w, du + w] {
            for dv in [dv, dv - h, dv + h] {
                let dist = (du.abs() + dv.abs() + (du + dv).abs()) / 2;
                best = best.min(dist as u32);
            }
        }
        best
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.u, self.v)
    }
}

/// The six sides of a hex tile, in axial deltas.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    NorthWest,
    NorthEast,
    West,
    East,
    SouthWest,
    SouthEast,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::NorthWest,
        Side::NorthEast,
        Side::West,
        Side::East,
        Side::SouthWest,
        Side::SouthEast,
    ];

    pub const fn delta(self) -> (i64, i64) {
        match self {
            Side::NorthWest => (0, -1),
            Side::NorthEast => (1, -1),
            Side::West => (-1, 0),
            Side::East => (1, 0),
            Side::SouthWest => (-1, 1),
            Side::SouthEast => (0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: GridSize = GridSize::new(10, 8);

    #[test]
    fn wrap_identity() {
        let c = Coordinate::new(3, 5, SIZE);
        assert_eq!(c.delta(i64::from(SIZE.width), 0, SIZE), c);
        assert_eq!(c.delta(0, i64::from(SIZE.height), SIZE), c);
        assert_eq!(c.delta(-i64::from(SIZE.width), -i64::from(SIZE.height), SIZE), c);
    }

    #[test]
    fn negative_components_wrap() {
        let c = Coordinate::new(-1, -2, SIZE);
        assert_eq!(c.u(), 9);
        assert_eq!(c.v(), 6);
    }

    #[test]
    fn sides_are_mutual_inverses() {
        let c = Coordinate::new(4, 4, SIZE);
        for (side, inverse) in [
            (Side::NorthWest, Side::SouthEast),
            (Side::NorthEast, Side::SouthWest),
            (Side::West, Side::East),
        ] {
            assert_eq!(c.neighbour(side, SIZE).neighbour(inverse, SIZE), c);
        }
    }

    #[test]
    fn hex_distance_on_flat_grid() {
        let big = GridSize::new(100, 100);
        let origin = Coordinate::new(50, 50, big);
        // Straight east: one step per tile.
        assert_eq!(origin.distance_to(origin.delta(3, 0, big), big), 3);
        // NE diagonal in axial coordinates: (+1, -1) per step.
        assert_eq!(origin.distance_to(origin.delta(4, -4, big), big), 4);
        // Mixed: (+2, +3) costs 5 (no shared diagonal component).
        assert_eq!(origin.distance_to(origin.delta(2, 3, big), big), 5);
    }

    #[test]
    fn distance_takes_shortcut_around_torus() {
        let origin = Coordinate::new(0, 0, SIZE);
        // 9 steps east is 1 step west on a width-10 torus.
        assert_eq!(origin.distance_to(Coordinate::new(9, 0, SIZE), SIZE), 1);
        assert_eq!(origin.distance_to(Coordinate::new(0, 7, SIZE), SIZE), 1);
    }
}
