//! Client-facing handle to a running session.

use tokio::sync::{mpsc, oneshot};

use strata_core::{
    Context, FireOutcome, GameEvent, Leveling, LevelType, Maybe, Movement, ObjectRef, PlayerGameInfo,
    PlayerId, PlayerKey, ReadyOutcome, ResourceType, TileRef, UnitDesign,
};

use crate::command::Command;
use crate::error::{Result, RuntimeError};
use crate::snapshot::GameSnapshot;

/// Cloneable façade over the session worker's command channel.
///
/// Every method is one round-trip: send a command, await the oneshot reply.
/// Commands are applied in channel order, so two clients never interleave
/// inside one action.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    async fn round_trip<T>(
        &self,
        command: Command,
        reply_rx: oneshot::Receiver<Result<T>>,
    ) -> Result<T> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Authenticates as a keyed player, yielding the context for all
    /// subsequent calls.
    pub async fn authenticate(&self, player: PlayerId, key: PlayerKey) -> Result<Context> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(Command::Authenticate { player, key, reply }, reply_rx)
            .await
    }

    /// Opens an event mailbox for a player.
    pub async fn subscribe(&self, player: PlayerId) -> Result<mpsc::UnboundedReceiver<GameEvent>> {
        let (reply, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Subscribe { player, reply })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub async fn set_ready(&self, ctx: Context) -> Result<ReadyOutcome> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(Command::SetReady { ctx, reply }, reply_rx)
            .await
    }

    pub async fn quote_leveling(
        &self,
        ctx: Context,
        object: ObjectRef,
        level: LevelType,
    ) -> Result<Leveling> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(
            Command::QuoteLeveling {
                ctx,
                object,
                level,
                reply,
            },
            reply_rx,
        )
        .await
    }

    pub async fn quote_movement(
        &self,
        ctx: Context,
        object: ObjectRef,
        target: TileRef,
    ) -> Result<Movement> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(
            Command::QuoteMovement {
                ctx,
                object,
                target,
                reply,
            },
            reply_rx,
        )
        .await
    }

    pub async fn execute_leveling(&self, ctx: Context, quote: Leveling) -> Result<()> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(Command::ExecuteLeveling { ctx, quote, reply }, reply_rx)
            .await
    }

    pub async fn execute_movement(&self, ctx: Context, quote: Movement) -> Result<()> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(Command::ExecuteMovement { ctx, quote, reply }, reply_rx)
            .await
    }

    pub async fn fire(
        &self,
        ctx: Context,
        object: ObjectRef,
        target: TileRef,
    ) -> Result<FireOutcome> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(
            Command::Fire {
                ctx,
                object,
                target,
                reply,
            },
            reply_rx,
        )
        .await
    }

    pub async fn load(
        &self,
        ctx: Context,
        object: ObjectRef,
        resource: ResourceType,
        amount: u32,
    ) -> Result<u32> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(
            Command::Load {
                ctx,
                object,
                resource,
                amount,
                reply,
            },
            reply_rx,
        )
        .await
    }

    pub async fn unload(
        &self,
        ctx: Context,
        object: ObjectRef,
        resource: ResourceType,
        amount: u32,
    ) -> Result<u32> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(
            Command::Unload {
                ctx,
                object,
                resource,
                amount,
                reply,
            },
            reply_rx,
        )
        .await
    }

    /// Places a new object. A trusted (server-side) operation: there is no
    /// acting-player context.
    pub async fn spawn(
        &self,
        owner: PlayerId,
        design: UnitDesign,
        location: TileRef,
    ) -> Result<ObjectRef> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(
            Command::Spawn {
                owner,
                design,
                location,
                reply,
            },
            reply_rx,
        )
        .await
    }

    pub async fn check_contents(&self, ctx: Context, tile: TileRef) -> Result<Maybe<ObjectRef>> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(Command::CheckContents { ctx, tile, reply }, reply_rx)
            .await
    }

    pub async fn check_resource(
        &self,
        ctx: Context,
        tile: TileRef,
        resource: ResourceType,
    ) -> Result<Maybe<u32>> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(
            Command::CheckResource {
                ctx,
                tile,
                resource,
                reply,
            },
            reply_rx,
        )
        .await
    }

    pub async fn list_objects(&self, ctx: Context) -> Result<Vec<ObjectRef>> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(Command::ListObjects { ctx, reply }, reply_rx)
            .await
    }

    pub async fn list_players(&self, ctx: Context) -> Result<Vec<PlayerGameInfo>> {
        let (reply, reply_rx) = oneshot::channel();
        self.round_trip(Command::ListPlayers { ctx, reply }, reply_rx)
            .await
    }

    /// Full-state capture, the persistence/exchange shape.
    pub async fn snapshot(&self) -> Result<GameSnapshot> {
        let (reply, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
