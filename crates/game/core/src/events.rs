//! Change notifications fanned out to authorized observers.
//!
//! Every core mutation produces [`Notification`]s addressed to the players
//! allowed to see the change at the moment it happened, never a broadcast of
//! raw state. The embedding runtime drains them from the controller and
//! delivers each to its recipient's channel.

use crate::game::{Turn, VictoryCondition};
use crate::types::{Change, ObjectRef, PlayerId};
use crate::world::{ResourceType, TileRef};

/// One observable state transition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    /// A tile's occupant changed (placed, removed, or relocated away/in).
    TileContents {
        tile: TileRef,
        change: Change<Option<ObjectRef>>,
    },

    /// A tile's stock of one resource changed.
    TileResources {
        tile: TileRef,
        resource: ResourceType,
        change: Change<Option<u32>>,
    },

    /// An object transitioned to another level.
    MobilityLeveled {
        object: ObjectRef,
        location: Change<TileRef>,
        remaining_speed: Change<f64>,
    },

    /// An object moved to another tile.
    MobilityMoved {
        object: ObjectRef,
        location: Change<TileRef>,
        remaining_speed: Change<f64>,
    },

    /// An object fired its weapon at a tile.
    WeaponFired { object: ObjectRef, target: TileRef },

    /// An object's container stock changed.
    ContainerStock {
        object: ObjectRef,
        resource: ResourceType,
        change: Change<u32>,
    },

    /// An object was destroyed and removed from the world.
    ObjectDestroyed { object: ObjectRef, tile: TileRef },

    /// A player's score changed.
    PlayerScore {
        player: PlayerId,
        change: Change<u32>,
    },

    /// A player declared readiness for the next turn.
    PlayerReady { player: PlayerId },

    /// All players were ready; a new turn has begun.
    NewTurn { turn: Turn },

    /// The game reached a terminal state.
    GameEnded {
        condition: VictoryCondition,
        winner: Option<PlayerId>,
    },
}

/// A [`GameEvent`] addressed to one authorized observer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notification {
    pub recipient: PlayerId,
    pub event: GameEvent,
}
