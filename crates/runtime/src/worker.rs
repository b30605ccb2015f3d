//! Session worker that owns the game and processes commands one at a time.

use std::collections::BTreeMap;

use tokio::sync::mpsc;

use strata_core::{GameController, GameEvent, PlayerId};

use crate::command::Command;
use crate::snapshot::GameSnapshot;
use crate::victory::VictoryPolicy;

/// Owns the [`GameController`] and serializes all access to it. After every
/// command it drains the controller's notifications, routes each to its
/// recipient's mailboxes, and runs the victory policies over the batch.
pub struct SessionWorker {
    controller: GameController,
    policies: Vec<VictoryPolicy>,
    command_rx: mpsc::Receiver<Command>,
    mailboxes: BTreeMap<PlayerId, Vec<mpsc::UnboundedSender<GameEvent>>>,
}

impl SessionWorker {
    pub(crate) fn new(
        controller: GameController,
        policies: Vec<VictoryPolicy>,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        Self {
            controller,
            policies,
            command_rx,
            mailboxes: BTreeMap::new(),
        }
    }

    /// Main worker loop. Exits when every handle is dropped.
    pub(crate) async fn run(mut self) {
        tracing::info!(
            players = self.controller.game().players().count(),
            "session worker started"
        );
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command);
            self.deliver();
        }
        tracing::info!("session worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Authenticate { player, key, reply } => {
                tracing::debug!(%player, "authenticate");
                let result = self.controller.game().authenticate(player, &key);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::Subscribe { player, reply } => {
                tracing::debug!(%player, "subscribe");
                let (tx, rx) = mpsc::unbounded_channel();
                self.mailboxes.entry(player).or_default().push(tx);
                let _ = reply.send(rx);
            }
            Command::SetReady { ctx, reply } => {
                let result = self.controller.set_ready(&ctx);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::QuoteLeveling {
                ctx,
                object,
                level,
                reply,
            } => {
                let result = self.controller.leveling(&ctx, object, level);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::QuoteMovement {
                ctx,
                object,
                target,
                reply,
            } => {
                let result = self.controller.movement(&ctx, object, target);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::ExecuteLeveling { ctx, quote, reply } => {
                let result = self.controller.execute_leveling(&ctx, &quote);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::ExecuteMovement { ctx, quote, reply } => {
                let result = self.controller.execute_movement(&ctx, &quote);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::Fire {
                ctx,
                object,
                target,
                reply,
            } => {
                let result = self.controller.fire(&ctx, object, target);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::Load {
                ctx,
                object,
                resource,
                amount,
                reply,
            } => {
                let result = self.controller.load(&ctx, object, resource, amount);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::Unload {
                ctx,
                object,
                resource,
                amount,
                reply,
            } => {
                let result = self.controller.unload(&ctx, object, resource, amount);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::Spawn {
                owner,
                design,
                location,
                reply,
            } => {
                tracing::debug!(%owner, %location, "spawn");
                let result = self.controller.spawn(owner, design, location);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::CheckContents { ctx, tile, reply } => {
                let result = self.controller.game().check_contents(&ctx, tile);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::CheckResource {
                ctx,
                tile,
                resource,
                reply,
            } => {
                let result = self
                    .controller
                    .game()
                    .check_resource_quantity(&ctx, tile, resource);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::ListObjects { ctx, reply } => {
                let result = self.controller.game().list_objects(&ctx);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::ListPlayers { ctx, reply } => {
                let result = self.controller.game().list_player_game_info(&ctx);
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(GameSnapshot::capture(self.controller.game()));
            }
        }
    }

    /// Drains the outbox, runs victory policies over the batch (which may end
    /// the game and emit more), and routes everything to the mailboxes.
    fn deliver(&mut self) {
        let mut batch = self.controller.drain_events();
        if !batch.is_empty() {
            let verdict = self
                .policies
                .iter()
                .find_map(|policy| policy.check(self.controller.game(), &batch));
            if let Some((condition, winner)) = verdict {
                tracing::info!(%condition, ?winner, "victory condition met");
                if self.controller.end(condition, winner).is_ok() {
                    batch.extend(self.controller.drain_events());
                }
            }
        }

        for notification in batch {
            let Some(boxes) = self.mailboxes.get_mut(&notification.recipient) else {
                continue;
            };
            // Closed mailboxes are pruned as they are discovered.
            boxes.retain(|tx| tx.send(notification.event.clone()).is_ok());
        }
    }
}
