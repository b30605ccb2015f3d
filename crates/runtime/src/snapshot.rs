//! Serializable capture of the whole game state.
//!
//! The snapshot is the session's persistence/exchange shape, taken by the
//! worker between commands. Tiles are stored sparsely: only cells that hold
//! an occupant or resources appear.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use strata_core::{Color, Game, LevelType, ObjectId, ObjectRef, PlayerId, ResourceType, TileRef};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub levels: Vec<LevelSnapshot>,
    pub players: Vec<PlayerSnapshot>,
    pub current_turn: u32,
    pub ready_players: Vec<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub kind: LevelType,
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<TileSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub u: u32,
    pub v: u32,
    pub resources: BTreeMap<ResourceType, u32>,
    pub occupant: Option<ObjectRef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub colors: [Color; 2],
    pub keyless: bool,
    pub score: u32,
    pub objects: Vec<ObjectSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectSnapshot {
    pub id: ObjectId,
    pub name: String,
    pub location: TileRef,
}

impl GameSnapshot {
    pub fn capture(game: &Game) -> Self {
        let levels = game
            .levels()
            .iter()
            .map(|level| LevelSnapshot {
                kind: level.kind(),
                width: level.size().width,
                height: level.size().height,
                tiles: level
                    .tiles()
                    .filter(|tile| tile.contents().is_some() || !tile.resources().is_empty())
                    .map(|tile| TileSnapshot {
                        u: tile.position().u(),
                        v: tile.position().v(),
                        resources: tile.resources().clone(),
                        occupant: tile.contents(),
                    })
                    .collect(),
            })
            .collect();

        let players = game
            .players()
            .map(|player| PlayerSnapshot {
                id: player.id(),
                name: player.name().to_owned(),
                colors: player.colors(),
                keyless: player.is_keyless(),
                score: player.score(),
                objects: player
                    .objects()
                    .map(|object| ObjectSnapshot {
                        id: object.id(),
                        name: object.name().to_owned(),
                        location: object.location(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            levels,
            players,
            current_turn: game.current_turn().number(),
            ready_players: game.ready_players().iter().copied().collect(),
        }
    }
}
