//! Quick-game assembly: random keys, colors, and starting placement.
//!
//! Convenience for tests and simple servers; anything needing full control
//! builds a [`GameSetup`] by hand instead.

use std::collections::BTreeSet;

use rand::{Rng, RngCore};

use strata_core::{Color, Coordinate, GameSetup, GridSize, LevelType, PlayerKey, PlayerSetup, UnitSetup};

const PALETTE: [Color; 5] = [
    Color::RED,
    Color::GREEN,
    Color::BLUE,
    Color::YELLOW,
    Color::GRAY,
];

/// Builds a setup with one engineer and one scout per player at distinct
/// random ground tiles. Returns the setup and each player's fresh key, in
/// player order.
pub fn quick_setup<R: Rng>(
    rng: &mut R,
    size: GridSize,
    names: &[&str],
) -> (GameSetup, Vec<PlayerKey>) {
    let mut taken: BTreeSet<(u32, u32)> = BTreeSet::new();
    let mut place = |rng: &mut R| loop {
        let u = rng.gen_range(0..size.width);
        let v = rng.gen_range(0..size.height);
        if taken.insert((u, v)) {
            return Coordinate::new(i64::from(u), i64::from(v), size);
        }
    };

    let mut keys = Vec::with_capacity(names.len());
    let mut players = Vec::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        let key = PlayerKey::new(rng.next_u64());
        keys.push(key);
        players.push(PlayerSetup {
            name: (*name).to_owned(),
            colors: [
                PALETTE[index % PALETTE.len()],
                PALETTE[(index + 1) % PALETTE.len()],
            ],
            key: Some(key),
            units: vec![
                UnitSetup {
                    design: strata_content::engineer(),
                    level: LevelType::Ground,
                    position: place(rng),
                },
                UnitSetup {
                    design: strata_content::scout(),
                    level: LevelType::Ground,
                    position: place(rng),
                },
            ],
        });
    }

    (GameSetup { size, players }, keys)
}
