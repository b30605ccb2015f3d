//! Commands accepted by the session worker.
//!
//! Every mutation and read of the game travels as one of these over the
//! command channel, carrying a `oneshot` reply sender. The worker processes
//! them strictly one at a time, which is the session's whole concurrency
//! story: the core itself stays single-threaded.

use tokio::sync::{mpsc, oneshot};

use strata_core::{
    Context, FireOutcome, GameEvent, Leveling, LevelType, Maybe, Movement, ObjectRef, PlayerGameInfo,
    PlayerId, PlayerKey, ReadyOutcome, ResourceType, TileRef, UnitDesign,
};

use crate::error::Result;
use crate::snapshot::GameSnapshot;

pub enum Command {
    /// Binds a context to a player after checking its credential.
    Authenticate {
        player: PlayerId,
        key: PlayerKey,
        reply: oneshot::Sender<Result<Context>>,
    },
    /// Opens an event mailbox for a player. Events emitted from this point
    /// on are delivered to the returned receiver.
    Subscribe {
        player: PlayerId,
        reply: oneshot::Sender<mpsc::UnboundedReceiver<GameEvent>>,
    },
    SetReady {
        ctx: Context,
        reply: oneshot::Sender<Result<ReadyOutcome>>,
    },
    QuoteLeveling {
        ctx: Context,
        object: ObjectRef,
        level: LevelType,
        reply: oneshot::Sender<Result<Leveling>>,
    },
    QuoteMovement {
        ctx: Context,
        object: ObjectRef,
        target: TileRef,
        reply: oneshot::Sender<Result<Movement>>,
    },
    ExecuteLeveling {
        ctx: Context,
        quote: Leveling,
        reply: oneshot::Sender<Result<()>>,
    },
    ExecuteMovement {
        ctx: Context,
        quote: Movement,
        reply: oneshot::Sender<Result<()>>,
    },
    Fire {
        ctx: Context,
        object: ObjectRef,
        target: TileRef,
        reply: oneshot::Sender<Result<FireOutcome>>,
    },
    Load {
        ctx: Context,
        object: ObjectRef,
        resource: ResourceType,
        amount: u32,
        reply: oneshot::Sender<Result<u32>>,
    },
    Unload {
        ctx: Context,
        object: ObjectRef,
        resource: ResourceType,
        amount: u32,
        reply: oneshot::Sender<Result<u32>>,
    },
    Spawn {
        owner: PlayerId,
        design: UnitDesign,
        location: TileRef,
        reply: oneshot::Sender<Result<ObjectRef>>,
    },
    CheckContents {
        ctx: Context,
        tile: TileRef,
        reply: oneshot::Sender<Result<Maybe<ObjectRef>>>,
    },
    CheckResource {
        ctx: Context,
        tile: TileRef,
        resource: ResourceType,
        reply: oneshot::Sender<Result<Maybe<u32>>>,
    },
    ListObjects {
        ctx: Context,
        reply: oneshot::Sender<Result<Vec<ObjectRef>>>,
    },
    ListPlayers {
        ctx: Context,
        reply: oneshot::Sender<Result<Vec<PlayerGameInfo>>>,
    },
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },
}
