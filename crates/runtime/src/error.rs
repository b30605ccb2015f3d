//! Unified error types surfaced by the session API.
//!
//! Wraps failures from worker coordination and the game core so clients can
//! bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use strata_core::{ActionError, SecurityError, SetupError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Action(#[from] ActionError),
}
