//! Error taxonomy for the simulation core.
//!
//! Quote-phase impossibility (no path, insufficient budget at quote time) is
//! never an error: it is a "not possible" quote the caller inspects. Errors
//! here cover authentication failures, setup misuse, and invariant-violating
//! action attempts, all of which abort the call without partial mutation.

use crate::object::ModuleKind;
use crate::types::{ObjectRef, PlayerId};
use crate::world::{ResourceType, TileRef};

/// Authentication and capability failures, checked before any visibility logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SecurityError {
    #[error("no player is bound to this call")]
    NotAuthenticated,

    #[error("no such player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("invalid key for player {0}")]
    InvalidKey(PlayerId),

    #[error("player {0} is key-less and cannot authenticate")]
    KeylessPlayer(PlayerId),
}

/// Invalid game configuration, rejected at construction time.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("starting tile {tile} is already occupied")]
    StartTileOccupied { tile: TileRef },
}

/// Failures while validating or applying an action.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error("the game has ended; no further actions are accepted")]
    GameOver,

    #[error("no such object: {0}")]
    UnknownObject(ObjectRef),

    #[error("object {0} is not owned by the acting player")]
    NotOwned(ObjectRef),

    #[error("object {object} has no {kind} module")]
    MissingModule { object: ObjectRef, kind: ModuleKind },

    #[error("cannot execute: the quote is not possible")]
    NotPossible,

    #[error("cannot execute: cost {cost} exceeds remaining speed {remaining}")]
    InsufficientSpeed { cost: f64, remaining: f64 },

    #[error("cannot execute: path tile {tile} is no longer accessible")]
    PathObstructed { tile: TileRef },

    #[error("tile {tile} is occupied by {occupant}")]
    TileOccupied { tile: TileRef, occupant: ObjectRef },

    #[error("resource {resource} on tile {tile} would go negative")]
    ResourceUnderflow { tile: TileRef, resource: ResourceType },

    #[error("target {target} is out of weapon range {range}")]
    OutOfRange { target: TileRef, range: u32 },

    #[error("no shots remaining this turn")]
    NoShotsRemaining,

    #[error("target {target} is not observable by the acting player")]
    TargetNotObservable { target: TileRef },
}
