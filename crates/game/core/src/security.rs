//! Request-scoped acting-player context.
//!
//! Every externally exposed operation that touches hidden state runs "as" a
//! player. The binding is an explicit [`Context`] value threaded through the
//! call, never process-global state, so one game instance can serve many
//! clients as long as calls are serialized per game.

use crate::error::SecurityError;
use crate::types::PlayerId;

/// Opaque credential controlling a keyed player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerKey(u64);

impl PlayerKey {
    pub const fn new(secret: u64) -> Self {
        Self(secret)
    }
}

/// The acting player bound to one call, or anonymous.
///
/// Obtained from [`crate::Game::authenticate`]; authenticated operations fail
/// with [`SecurityError::NotAuthenticated`] on an anonymous context before any
/// visibility logic runs. "Not logged in" is a hard error, "logged in but
/// can't see" is the soft `Unknown` answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Context {
    player: Option<PlayerId>,
}

impl Context {
    pub const fn anonymous() -> Self {
        Self { player: None }
    }

    pub(crate) const fn for_player(player: PlayerId) -> Self {
        Self {
            player: Some(player),
        }
    }

    pub fn player(&self) -> Option<PlayerId> {
        self.player
    }

    /// The authenticated player, or the hard authentication failure.
    pub fn current_player(&self) -> Result<PlayerId, SecurityError> {
        self.player.ok_or(SecurityError::NotAuthenticated)
    }
}
