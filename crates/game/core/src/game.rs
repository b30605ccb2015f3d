//! The game root: levels, players, turn bookkeeping, and visibility queries.
//!
//! `Game` is the ownership root of the whole object graph. Players own their
//! objects by id; tiles refer to occupants by handle; every back-reference is
//! a lookup through the owning container. Mutations that must notify
//! observers go through [`crate::GameController`]; `Game` itself exposes the
//! read side, including all visibility-gated queries.

use std::collections::BTreeSet;

use crate::error::{SecurityError, SetupError};
use crate::grid::{Coordinate, GridSize};
use crate::object::{GameObject, UnitDesign};
use crate::security::{Context, PlayerKey};
use crate::types::{Color, Maybe, ObjectId, ObjectRef, PlayerId};
use crate::world::{Level, LevelType, ResourceType, Tile, TileRef};

/// One turn in the game. Turns form a backward chain conceptually; the
/// monotonic number is all that is ever dereferenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Turn {
    number: u32,
}

impl Turn {
    pub const FIRST: Self = Self { number: 0 };

    pub fn number(self) -> u32 {
        self.number
    }

    pub(crate) fn next(self) -> Self {
        Self {
            number: self.number + 1,
        }
    }
}

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VictoryCondition {
    Supremacy,
    Might,
}

/// Terminal state of an ended game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameOver {
    pub condition: VictoryCondition,
    pub winner: Option<PlayerId>,
}

/// A participant: keyed (client-controlled) or key-less (environment).
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    id: PlayerId,
    name: String,
    colors: [Color; 2],
    key: Option<PlayerKey>,
    score: u32,
    next_object_id: u32,
    objects: std::collections::BTreeMap<ObjectId, GameObject>,
}

impl Player {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> [Color; 2] {
        self.colors
    }

    /// Key-less players are auto-ready and cannot authenticate.
    pub fn is_keyless(&self) -> bool {
        self.key.is_none()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.values()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub(crate) fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(&id)
    }

    pub(crate) fn objects_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.objects.values_mut()
    }

    pub(crate) fn add_score(&mut self, delta: u32) -> u32 {
        self.score += delta;
        self.score
    }

    pub(crate) fn allocate_object_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        id
    }

    pub(crate) fn insert_object(&mut self, object: GameObject) {
        self.objects.insert(object.id(), object);
    }

    pub(crate) fn remove_object(&mut self, id: ObjectId) -> Option<GameObject> {
        self.objects.remove(&id)
    }
}

/// What one player may know about another: identity always, score only once
/// any of the target's objects has been observed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerGameInfo {
    pub player: PlayerId,
    pub name: String,
    pub score: Maybe<u32>,
}

/// Starting unit for one player.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSetup {
    pub design: UnitDesign,
    pub level: LevelType,
    pub position: Coordinate,
}

/// One player's slot in the game configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSetup {
    pub name: String,
    pub colors: [Color; 2],
    pub key: Option<PlayerKey>,
    pub units: Vec<UnitSetup>,
}

/// Complete validated game configuration: one value instead of staged builders.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSetup {
    pub size: GridSize,
    pub players: Vec<PlayerSetup>,
}

/// The authoritative simulation state.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    size: GridSize,
    levels: [Level; 3],
    players: Vec<Player>,
    current_turn: Turn,
    ready: BTreeSet<PlayerId>,
    over: Option<GameOver>,
}

impl Game {
    /// Builds a game from a setup, validating it whole: non-empty grid, at
    /// least one player, and conflict-free starting placement.
    pub fn new(setup: GameSetup) -> Result<Self, SetupError> {
        if setup.size.width == 0 || setup.size.height == 0 {
            return Err(SetupError::EmptyGrid {
                width: setup.size.width,
                height: setup.size.height,
            });
        }
        if setup.players.is_empty() {
            return Err(SetupError::NoPlayers);
        }

        let mut game = Self {
            size: setup.size,
            levels: LevelType::ALL.map(|kind| Level::new(kind, setup.size)),
            players: Vec::with_capacity(setup.players.len()),
            current_turn: Turn::FIRST,
            ready: BTreeSet::new(),
            over: None,
        };

        for (index, player_setup) in setup.players.into_iter().enumerate() {
            let id = PlayerId(index as u32);
            let mut player = Player {
                id,
                name: player_setup.name,
                colors: player_setup.colors,
                key: player_setup.key,
                score: 0,
                next_object_id: 0,
                objects: std::collections::BTreeMap::new(),
            };

            for unit in player_setup.units {
                let location = TileRef::new(unit.level, unit.position);
                let object_id = player.allocate_object_id();
                let object = GameObject::new(object_id, id, location, unit.design);
                game.levels[unit.level.index()]
                    .tile_mut(unit.position)
                    .set_contents(object.handle())
                    .map_err(|_| SetupError::StartTileOccupied { tile: location })?;
                player.insert_object(object);
            }

            game.players.push(player);
        }

        Ok(game)
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn level(&self, kind: LevelType) -> &Level {
        &self.levels[kind.index()]
    }

    pub fn levels(&self) -> &[Level; 3] {
        &self.levels
    }

    pub fn tile(&self, tile: TileRef) -> &Tile {
        self.level(tile.level).tile(tile.position)
    }

    pub(crate) fn tile_mut(&mut self, tile: TileRef) -> &mut Tile {
        self.levels[tile.level.index()].tile_mut(tile.position)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0 as usize)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.0 as usize)
    }

    pub(crate) fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Resolves an object handle through its owning player.
    pub fn object(&self, object: ObjectRef) -> Option<&GameObject> {
        self.player(object.owner)?.object(object.id)
    }

    pub(crate) fn object_mut(&mut self, object: ObjectRef) -> Option<&mut GameObject> {
        self.player_mut(object.owner)?.object_mut(object.id)
    }

    pub fn current_turn(&self) -> Turn {
        self.current_turn
    }

    pub(crate) fn set_current_turn(&mut self, turn: Turn) {
        self.current_turn = turn;
    }

    pub fn ready_players(&self) -> &BTreeSet<PlayerId> {
        &self.ready
    }

    pub(crate) fn ready_mut(&mut self) -> &mut BTreeSet<PlayerId> {
        &mut self.ready
    }

    pub fn over(&self) -> Option<GameOver> {
        self.over
    }

    pub fn is_running(&self) -> bool {
        self.over.is_none()
    }

    pub(crate) fn set_over(&mut self, over: GameOver) {
        self.over = Some(over);
    }

    // ------------------------------------------------------------------
    // Authentication & visibility
    // ------------------------------------------------------------------

    /// Binds a request context to a player after checking its credential.
    pub fn authenticate(
        &self,
        player: PlayerId,
        key: &PlayerKey,
    ) -> Result<Context, SecurityError> {
        let target = self
            .player(player)
            .ok_or(SecurityError::UnknownPlayer(player))?;
        match &target.key {
            None => Err(SecurityError::KeylessPlayer(player)),
            Some(expected) if expected == key => Ok(Context::for_player(player)),
            Some(_) => Err(SecurityError::InvalidKey(player)),
        }
    }

    /// Whether any of `player`'s objects has the tile within sensor range.
    /// Sensors cover the full vertical column within their planar range.
    pub fn can_observe(&self, player: PlayerId, tile: TileRef) -> bool {
        self.player(player)
            .is_some_and(|p| p.objects().any(|object| object.observes(tile, self.size)))
    }

    /// The players authorized to see `tile` right now.
    pub(crate) fn observers_of(&self, tile: TileRef) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.objects().any(|object| object.observes(tile, self.size)))
            .map(|p| p.id)
            .collect()
    }

    /// Every tile currently observable by the player, across all levels.
    pub fn observable_tiles(&self, player: PlayerId) -> BTreeSet<TileRef> {
        let mut tiles = BTreeSet::new();
        let Some(player) = self.player(player) else {
            return tiles;
        };
        for object in player.objects() {
            let Some(base) = object.base() else { continue };
            for planar in object
                .location()
                .neighbours_within(base.view_range(), self.size)
            {
                for level in LevelType::ALL {
                    tiles.insert(planar.on_level(level));
                }
            }
        }
        tiles
    }

    // ------------------------------------------------------------------
    // Visibility-gated queries (authenticated)
    // ------------------------------------------------------------------

    /// The tile's occupant, as far as the acting player may know.
    pub fn check_contents(
        &self,
        ctx: &Context,
        tile: TileRef,
    ) -> Result<Maybe<ObjectRef>, SecurityError> {
        let player = ctx.current_player()?;
        if !self.can_observe(player, tile) {
            return Ok(Maybe::Unknown);
        }
        Ok(Maybe::from_option(self.tile(tile).contents()))
    }

    /// The tile's stock of a resource, as far as the acting player may know.
    pub fn check_resource_quantity(
        &self,
        ctx: &Context,
        tile: TileRef,
        resource: ResourceType,
    ) -> Result<Maybe<u32>, SecurityError> {
        let player = ctx.current_player()?;
        if !self.can_observe(player, tile) {
            return Ok(Maybe::Unknown);
        }
        Ok(Maybe::from_option(self.tile(tile).resource_quantity(resource)))
    }

    /// Whether the tile contains the given object, tri-state.
    pub fn check_contains(
        &self,
        ctx: &Context,
        tile: TileRef,
        object: ObjectRef,
    ) -> Result<Maybe<bool>, SecurityError> {
        Ok(match self.check_contents(ctx, tile)? {
            Maybe::Unknown => Maybe::Unknown,
            Maybe::Absent => Maybe::Present(false),
            Maybe::Present(occupant) => Maybe::Present(occupant == object),
        })
    }

    /// True when the tile is visible to the acting player and empty.
    pub fn check_accessible(&self, ctx: &Context, tile: TileRef) -> Result<bool, SecurityError> {
        Ok(self.check_contents(ctx, tile)?.is_absent())
    }

    /// Info about another player: identity always; score only once discovered
    /// (some object of theirs is observable, or they are the asking player).
    pub fn player_game_info(
        &self,
        ctx: &Context,
        player: PlayerId,
    ) -> Result<PlayerGameInfo, SecurityError> {
        let observer = ctx.current_player()?;
        let target = self
            .player(player)
            .ok_or(SecurityError::UnknownPlayer(player))?;

        let discovered = observer == player
            || target
                .objects()
                .any(|object| self.can_observe(observer, object.location()));

        Ok(PlayerGameInfo {
            player,
            name: target.name.clone(),
            score: if discovered {
                Maybe::Present(target.score)
            } else {
                Maybe::Unknown
            },
        })
    }

    /// Handles of every object owned by the acting player.
    pub fn list_objects(&self, ctx: &Context) -> Result<Vec<ObjectRef>, SecurityError> {
        let player = ctx.current_player()?;
        Ok(self
            .player(player)
            .map(|p| p.objects().map(|o| o.handle()).collect())
            .unwrap_or_default())
    }

    pub fn list_player_game_info(
        &self,
        ctx: &Context,
    ) -> Result<Vec<PlayerGameInfo>, SecurityError> {
        self.players
            .iter()
            .map(|p| self.player_game_info(ctx, p.id))
            .collect()
    }
}
