//! Session orchestrator: builds the game, spawns the worker, hands out handles.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use strata_core::{Game, GameController, GameSetup};

use crate::error::{Result, RuntimeError};
use crate::handle::SessionHandle;
use crate::victory::VictoryPolicy;
use crate::worker::SessionWorker;

/// Session configuration: the validated game setup plus runtime knobs.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub setup: GameSetup,
    pub policies: Vec<VictoryPolicy>,
    pub command_buffer_size: usize,
}

impl SessionConfig {
    pub fn new(setup: GameSetup) -> Self {
        Self {
            setup,
            policies: vec![VictoryPolicy::Supremacy],
            command_buffer_size: 32,
        }
    }

    pub fn with_policies(mut self, policies: Vec<VictoryPolicy>) -> Self {
        self.policies = policies;
        self
    }
}

/// One running game: a worker task plus the handle clients clone.
pub struct Session {
    handle: SessionHandle,
    worker: JoinHandle<()>,
}

impl Session {
    /// Validates the setup, builds the controller, and spawns the worker.
    pub fn start(config: SessionConfig) -> Result<Self> {
        let game = Game::new(config.setup)?;
        let controller = GameController::new(game);
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);
        let worker = SessionWorker::new(controller, config.policies, command_rx);
        Ok(Self {
            handle: SessionHandle::new(command_tx),
            worker: tokio::spawn(worker.run()),
        })
    }

    /// A cloneable handle for clients and tasks.
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Drops the session's own handle and waits for the worker to stop. The
    /// worker keeps running while any cloned handle is still alive.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}
