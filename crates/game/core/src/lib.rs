//! Deterministic simulation core for a turn-based strategy game.
//!
//! `strata-core` defines the canonical rules: a toroidal multi-level hex
//! world, composable game objects, quote-then-commit movement, and
//! authorization-scoped visibility. All state mutation flows through
//! [`controller::GameController`]; reads go through [`game::Game`] and are
//! gated by the acting player's [`security::Context`]. The crate is pure and
//! single-threaded; embedding runtimes own the concurrency.
pub mod controller;
pub mod error;
pub mod events;
pub mod game;
pub mod grid;
pub mod mobility;
pub mod object;
pub mod path;
pub mod security;
pub mod types;
pub mod world;

pub use controller::{FireOutcome, GameController, ReadyOutcome};
pub use error::{ActionError, SecurityError, SetupError};
pub use events::{GameEvent, Notification};
pub use game::{
    Game, GameOver, GameSetup, Player, PlayerGameInfo, PlayerSetup, Turn, UnitSetup,
    VictoryCondition,
};
pub use grid::{Coordinate, GridSize, Side};
pub use mobility::{Leveling, MobilityModule, Movement};
pub use object::{
    BaseModule, ContainerModule, GameObject, Module, ModuleKind, UnitDesign, WeaponModule,
};
pub use path::Path;
pub use security::{Context, PlayerKey};
pub use types::{Change, Color, Maybe, ObjectId, ObjectRef, PlayerId};
pub use world::{Level, LevelType, ResourceType, Tile, TileRef};
