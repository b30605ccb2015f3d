//! Async session layer over the deterministic game core.
//!
//! This crate wires the core's controller into a tokio worker task and exposes
//! a cloneable [`SessionHandle`] for clients. Consumers start a [`Session`],
//! subscribe per-player event mailboxes, and drive the game through the
//! handle; the worker serializes every command, so the single-threaded core
//! never sees concurrent access.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the orchestrator and configuration
//! - [`handle`] exposes the client-facing API
//! - [`victory`] provides passive win checks over the event stream
//! - [`snapshot`] is the serializable full-state capture
//! - [`bootstrap`] assembles quick games with random placement
pub mod bootstrap;
pub mod error;
pub mod handle;
pub mod session;
pub mod snapshot;
pub mod victory;

mod command;
mod worker;

pub use bootstrap::quick_setup;
pub use error::{Result, RuntimeError};
pub use handle::SessionHandle;
pub use session::{Session, SessionConfig};
pub use snapshot::{GameSnapshot, LevelSnapshot, ObjectSnapshot, PlayerSnapshot, TileSnapshot};
pub use victory::VictoryPolicy;
