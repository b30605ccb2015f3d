//! Victory policies: passive checks run over the core's event stream.
//!
//! Policies never reach into the core's rules. After each command the worker
//! hands them the freshly drained events plus a read view of the game; a
//! policy that finds its condition met names the winner and the worker ends
//! the game.

use strata_core::{Game, GameEvent, Notification, PlayerId, VictoryCondition};

/// A passive win check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VictoryPolicy {
    /// Last player still owning objects wins, once any player has lost their
    /// last object.
    Supremacy,
    /// First player to reach the score threshold wins.
    Might { threshold: u32 },
}

impl VictoryPolicy {
    /// Checks the condition against the events of the last command. Returns
    /// the verdict when the game should end.
    pub fn check(
        &self,
        game: &Game,
        events: &[Notification],
    ) -> Option<(VictoryCondition, Option<PlayerId>)> {
        match self {
            VictoryPolicy::Supremacy => {
                let someone_wiped = events.iter().any(|n| {
                    matches!(&n.event, GameEvent::ObjectDestroyed { object, .. }
                        if game.player(object.owner).is_some_and(|p| p.object_count() == 0))
                });
                if !someone_wiped {
                    return None;
                }
                let mut survivors = game.players().filter(|p| p.object_count() > 0);
                let winner = survivors.next()?;
                if survivors.next().is_some() {
                    return None;
                }
                Some((VictoryCondition::Supremacy, Some(winner.id())))
            }
            VictoryPolicy::Might { threshold } => {
                let crossed = events.iter().any(|n| {
                    matches!(&n.event, GameEvent::PlayerScore { change, .. }
                        if change.to >= *threshold)
                });
                if !crossed {
                    return None;
                }
                game.players()
                    .filter(|p| p.score() >= *threshold)
                    .max_by_key(|p| p.score())
                    .map(|p| (VictoryCondition::Might, Some(p.id())))
            }
        }
    }
}
