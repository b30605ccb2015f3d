//! The action entry point: validation, turn readiness, and notification fan-out.
//!
//! All mutation of a game flows through [`GameController`]. Each mutating
//! operation validates its context, applies the change atomically (or not at
//! all), and appends [`Notification`]s addressed to the players authorized to
//! observe the change at that moment. The embedding layer drains the outbox
//! after every call and delivers each notification to its recipient only.

use std::collections::BTreeSet;

use crate::error::{ActionError, SecurityError};
use crate::events::{GameEvent, Notification};
use crate::game::{Game, GameOver, Turn, VictoryCondition};
use crate::mobility::{self, Leveling, Movement};
use crate::object::{ModuleKind, UnitDesign};
use crate::security::Context;
use crate::types::{Change, ObjectRef, PlayerId};
use crate::world::{LevelType, ResourceType, TileRef};

/// Result of a readiness declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadyOutcome {
    /// Not all players are ready yet; `remaining` lists who is still due.
    Waiting { remaining: Vec<PlayerId> },
    /// Every player was ready; a new turn has started.
    NewTurn { turn: Turn },
}

/// Result of a weapon discharge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireOutcome {
    pub target: TileRef,
    pub damage: u32,
    pub destroyed: Option<ObjectRef>,
}

/// Owns a [`Game`] and mediates every mutation on it.
#[derive(Debug)]
pub struct GameController {
    game: Game,
    outbox: Vec<Notification>,
}

impl GameController {
    /// Wraps a freshly built game. Runs the initial reset/new-turn pass over
    /// every object and auto-readies key-less players.
    pub fn new(game: Game) -> Self {
        let mut controller = Self {
            game,
            outbox: Vec::new(),
        };
        for player in controller.game.players_mut() {
            for object in player.objects_mut() {
                object.on_reset();
                object.on_new_turn();
            }
        }
        let keyless: Vec<PlayerId> = controller
            .game
            .players()
            .filter(|p| p.is_keyless())
            .map(|p| p.id())
            .collect();
        controller.game.ready_mut().extend(keyless);
        controller
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Hands the pending notifications to the embedding layer.
    pub fn drain_events(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    fn ensure_running(&self) -> Result<(), ActionError> {
        if self.game.is_running() {
            Ok(())
        } else {
            Err(ActionError::GameOver)
        }
    }

    // ------------------------------------------------------------------
    // Notification plumbing
    // ------------------------------------------------------------------

    fn emit_to(&mut self, recipients: impl IntoIterator<Item = PlayerId>, event: GameEvent) {
        self.outbox.extend(
            recipients
                .into_iter()
                .map(|recipient| Notification {
                    recipient,
                    event: event.clone(),
                }),
        );
    }

    fn emit_to_all(&mut self, event: GameEvent) {
        let players: Vec<PlayerId> = self.game.players().map(|p| p.id()).collect();
        self.emit_to(players, event);
    }

    fn emit_for_tile(&mut self, tile: TileRef, event: GameEvent) {
        let observers = self.game.observers_of(tile);
        self.emit_to(observers, event);
    }

    fn emit_tile_contents(&mut self, tile: TileRef, change: Change<Option<ObjectRef>>) {
        self.emit_for_tile(tile, GameEvent::TileContents { tile, change });
    }

    /// Players entitled to see a player's score: the player themselves plus
    /// anyone currently observing one of their objects.
    fn score_observers(&self, player: PlayerId) -> BTreeSet<PlayerId> {
        let mut observers = BTreeSet::from([player]);
        if let Some(target) = self.game.player(player) {
            for other in self.game.players() {
                if target
                    .objects()
                    .any(|object| self.game.can_observe(other.id(), object.location()))
                {
                    observers.insert(other.id());
                }
            }
        }
        observers
    }

    // ------------------------------------------------------------------
    // Turn readiness
    // ------------------------------------------------------------------

    /// Declares the acting player ready for the next turn. When the ready set
    /// covers every player, the turn advances and the ready set is cleared.
    pub fn set_ready(&mut self, ctx: &Context) -> Result<ReadyOutcome, ActionError> {
        let player = ctx.current_player()?;
        self.ensure_running()?;
        if self.game.player(player).is_none() {
            return Err(SecurityError::UnknownPlayer(player).into());
        }

        self.game.ready_mut().insert(player);
        self.emit_to_all(GameEvent::PlayerReady { player });

        let all: BTreeSet<PlayerId> = self.game.players().map(|p| p.id()).collect();
        let remaining: Vec<PlayerId> = all
            .difference(self.game.ready_players())
            .copied()
            .collect();
        if remaining.is_empty() {
            let turn = self.advance_turn();
            Ok(ReadyOutcome::NewTurn { turn })
        } else {
            Ok(ReadyOutcome::Waiting { remaining })
        }
    }

    /// Advances to the next turn: every object's turn-scoped budgets are
    /// re-derived before any notification for the new turn goes out, so the
    /// transition appears atomic to observers.
    fn advance_turn(&mut self) -> Turn {
        let turn = self.game.current_turn().next();
        self.game.set_current_turn(turn);

        for player in self.game.players_mut() {
            for object in player.objects_mut() {
                object.on_new_turn();
            }
        }

        self.game.ready_mut().clear();
        let keyless: Vec<PlayerId> = self
            .game
            .players()
            .filter(|p| p.is_keyless())
            .map(|p| p.id())
            .collect();
        self.game.ready_mut().extend(keyless.iter().copied());

        self.emit_to_all(GameEvent::NewTurn { turn });
        for player in keyless {
            self.emit_to_all(GameEvent::PlayerReady { player });
        }
        turn
    }

    // ------------------------------------------------------------------
    // Tile resources
    // ------------------------------------------------------------------

    /// Sets a tile's stock of a resource. Zero removes the entry.
    pub fn set_resource_quantity(
        &mut self,
        tile: TileRef,
        resource: ResourceType,
        quantity: u32,
    ) -> Result<(), ActionError> {
        self.ensure_running()?;
        let from = self.game.tile(tile).resource_quantity(resource);
        self.game
            .tile_mut(tile)
            .set_resource_quantity(resource, quantity);
        let to = self.game.tile(tile).resource_quantity(resource);
        self.emit_for_tile(
            tile,
            GameEvent::TileResources {
                tile,
                resource,
                change: Change::new(from, to),
            },
        );
        Ok(())
    }

    /// Adjusts a tile's stock by a signed delta; fails without mutating when
    /// the result would go negative.
    pub fn add_resource_quantity(
        &mut self,
        tile: TileRef,
        resource: ResourceType,
        delta: i64,
    ) -> Result<u32, ActionError> {
        let current = i64::from(self.game.tile(tile).resource_quantity(resource).unwrap_or(0));
        let next = current + delta;
        if next < 0 {
            return Err(ActionError::ResourceUnderflow { tile, resource });
        }
        let next = next as u32;
        self.set_resource_quantity(tile, resource, next)?;
        Ok(next)
    }

    // ------------------------------------------------------------------
    // Object lifecycle
    // ------------------------------------------------------------------

    /// Places a new object for `owner` on `location`. The object joins the
    /// current turn with fresh budgets.
    pub fn spawn(
        &mut self,
        owner: PlayerId,
        design: UnitDesign,
        location: TileRef,
    ) -> Result<ObjectRef, ActionError> {
        self.ensure_running()?;
        if let Some(occupant) = self.game.tile(location).contents() {
            return Err(ActionError::TileOccupied {
                tile: location,
                occupant,
            });
        }
        let player = self
            .game
            .player_mut(owner)
            .ok_or(ActionError::Security(SecurityError::UnknownPlayer(owner)))?;
        let id = player.allocate_object_id();
        let mut object = crate::object::GameObject::new(id, owner, location, design);
        object.on_reset();
        object.on_new_turn();
        let handle = object.handle();
        player.insert_object(object);
        // Checked empty above; we hold exclusive access throughout.
        let _ = self.game.tile_mut(location).set_contents(handle);
        self.emit_tile_contents(location, Change::new(None, Some(handle)));
        Ok(handle)
    }

    fn destroy_object(&mut self, object: ObjectRef) {
        let Some(existing) = self.game.object(object) else {
            return;
        };
        let tile = existing.location();

        // Recipients are fixed before removal: the owner always learns of the
        // loss even when the destroyed object was their last sensor there.
        let mut recipients: BTreeSet<PlayerId> =
            self.game.observers_of(tile).into_iter().collect();
        recipients.insert(object.owner);

        self.game.tile_mut(tile).clear_contents();
        if let Some(player) = self.game.player_mut(object.owner) {
            player.remove_object(object.id);
        }

        self.emit_tile_contents(tile, Change::new(Some(object), None));
        self.emit_to(recipients, GameEvent::ObjectDestroyed { object, tile });
    }

    // ------------------------------------------------------------------
    // Movement / leveling (quote, then execute)
    // ------------------------------------------------------------------

    /// Quotes a leveling toward `level`. Quoting an object the acting player
    /// does not own yields an impossible quote, not an error.
    pub fn leveling(
        &self,
        ctx: &Context,
        object: ObjectRef,
        level: LevelType,
    ) -> Result<Leveling, ActionError> {
        let player = ctx.current_player()?;
        let target = self
            .game
            .object(object)
            .ok_or(ActionError::UnknownObject(object))?;
        if target.owner() != player {
            return Ok(mobility::impossible_leveling(object));
        }
        let module = target.mobility().ok_or(ActionError::MissingModule {
            object,
            kind: ModuleKind::Mobility,
        })?;
        Ok(mobility::quote_leveling(target, module, level))
    }

    /// Quotes a movement toward `target`.
    pub fn movement(
        &self,
        ctx: &Context,
        object: ObjectRef,
        target: TileRef,
    ) -> Result<Movement, ActionError> {
        let player = ctx.current_player()?;
        let mover = self
            .game
            .object(object)
            .ok_or(ActionError::UnknownObject(object))?;
        if mover.owner() != player {
            return Ok(mobility::impossible_movement(object));
        }
        let module = mover.mobility().ok_or(ActionError::MissingModule {
            object,
            kind: ModuleKind::Mobility,
        })?;
        Ok(mobility::quote_movement(&self.game, mover, module, target))
    }

    /// Commits a leveling quote after re-validating it.
    ///
    /// Deliberately does not re-check destination occupancy up front (units
    /// level into the unknown); the occupy step still enforces exclusivity
    /// and fails without partial mutation.
    pub fn execute_leveling(&mut self, ctx: &Context, quote: &Leveling) -> Result<(), ActionError> {
        let player = ctx.current_player()?;
        self.ensure_running()?;
        let target = quote.target().ok_or(ActionError::NotPossible)?;
        let handle = quote.object();

        let object = self
            .game
            .object(handle)
            .ok_or(ActionError::UnknownObject(handle))?;
        if object.owner() != player {
            return Err(ActionError::NotOwned(handle));
        }
        let module = object.mobility().ok_or(ActionError::MissingModule {
            object: handle,
            kind: ModuleKind::Mobility,
        })?;
        let remaining = module.remaining_speed();
        if quote.cost() > remaining {
            return Err(ActionError::InsufficientSpeed {
                cost: quote.cost(),
                remaining,
            });
        }

        // Stale-quote check: the quote must still describe a leveling from
        // the object's current tile.
        let from = object.location();
        let (cost_now, reachable) = module.cost_for_leveling_to(from.level, target.level);
        if !reachable || cost_now != quote.cost() || target.position != from.position {
            return Err(ActionError::NotPossible);
        }

        self.relocate(handle, from, target)?;
        self.spend(handle, quote.cost());

        self.emit_for_tile(
            target,
            GameEvent::MobilityLeveled {
                object: handle,
                location: Change::new(from, target),
                remaining_speed: Change::new(remaining, remaining - quote.cost()),
            },
        );
        Ok(())
    }

    /// Commits a movement quote after re-validating it: the cost must still
    /// fit the remaining budget and every tile on the quoted path (walked
    /// from the target back to the origin) must still be free, or be the
    /// mover's own current tile.
    pub fn execute_movement(&mut self, ctx: &Context, quote: &Movement) -> Result<(), ActionError> {
        let player = ctx.current_player()?;
        self.ensure_running()?;
        let path = quote.path().ok_or(ActionError::NotPossible)?.clone();
        let handle = quote.object();

        let object = self
            .game
            .object(handle)
            .ok_or(ActionError::UnknownObject(handle))?;
        if object.owner() != player {
            return Err(ActionError::NotOwned(handle));
        }
        let module = object.mobility().ok_or(ActionError::MissingModule {
            object: handle,
            kind: ModuleKind::Mobility,
        })?;
        let remaining = module.remaining_speed();
        if quote.cost() > remaining {
            return Err(ActionError::InsufficientSpeed {
                cost: quote.cost(),
                remaining,
            });
        }

        let current = object.location();
        for tile in path.route.iter().rev() {
            if *tile != current && !self.game.tile(*tile).is_accessible() {
                return Err(ActionError::PathObstructed { tile: *tile });
            }
        }

        // Stale-quote check: the quote is bound to the tile it was taken
        // from, including its level (the quoted leveling cost must still be
        // what leveling from here costs).
        let leveling = quote.leveling();
        let origin = leveling.target().ok_or(ActionError::NotPossible)?;
        let (leveling_cost_now, reachable) =
            module.cost_for_leveling_to(current.level, origin.level);
        if !reachable || leveling_cost_now != leveling.cost() || origin.position != current.position
        {
            return Err(ActionError::NotPossible);
        }
        let mut remaining_now = remaining;
        if origin.level != current.level {
            self.relocate(handle, current, origin)?;
            self.spend(handle, leveling.cost());
            self.emit_for_tile(
                origin,
                GameEvent::MobilityLeveled {
                    object: handle,
                    location: Change::new(current, origin),
                    remaining_speed: Change::new(remaining_now, remaining_now - leveling.cost()),
                },
            );
            remaining_now -= leveling.cost();
        }

        let target = path.target();
        self.relocate(handle, origin, target)?;
        self.spend(handle, path.cost);
        self.emit_for_tile(
            target,
            GameEvent::MobilityMoved {
                object: handle,
                location: Change::new(origin, target),
                remaining_speed: Change::new(remaining_now, remaining_now - path.cost),
            },
        );
        Ok(())
    }

    /// Moves an object between tiles as one logical step: the destination is
    /// checked before the origin is vacated, so failure never leaves the
    /// object unlocated.
    fn relocate(&mut self, object: ObjectRef, from: TileRef, to: TileRef) -> Result<(), ActionError> {
        if from == to {
            return Ok(());
        }
        if let Some(occupant) = self.game.tile(to).contents() {
            return Err(ActionError::TileOccupied { tile: to, occupant });
        }

        self.game.tile_mut(from).clear_contents();
        // Checked empty above; we hold exclusive access throughout.
        let _ = self.game.tile_mut(to).set_contents(object);
        if let Some(moved) = self.game.object_mut(object) {
            moved.set_location(to);
        }

        self.emit_tile_contents(from, Change::new(Some(object), None));
        self.emit_tile_contents(to, Change::new(None, Some(object)));
        Ok(())
    }

    fn spend(&mut self, object: ObjectRef, cost: f64) {
        if let Some(module) = self
            .game
            .object_mut(object)
            .and_then(|o| o.mobility_mut())
        {
            module.spend(cost);
        }
    }

    // ------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------

    /// Fires an object's weapon at a target tile. The target must be within
    /// range and observable by the acting player; hitting an empty tile
    /// spends the shot for nothing.
    pub fn fire(
        &mut self,
        ctx: &Context,
        object: ObjectRef,
        target: TileRef,
    ) -> Result<FireOutcome, ActionError> {
        let player = ctx.current_player()?;
        self.ensure_running()?;

        let shooter = self
            .game
            .object(object)
            .ok_or(ActionError::UnknownObject(object))?;
        if shooter.owner() != player {
            return Err(ActionError::NotOwned(object));
        }
        let weapon = shooter.weapon().ok_or(ActionError::MissingModule {
            object,
            kind: ModuleKind::Weapon,
        })?;
        let range = weapon.range();
        let fire_power = weapon.fire_power();

        if !self.game.can_observe(player, target) {
            return Err(ActionError::TargetNotObservable { target });
        }
        let distance = shooter
            .location()
            .position
            .distance_to(target.position, self.game.size());
        if distance > range {
            return Err(ActionError::OutOfRange { target, range });
        }
        if weapon.remaining_shots() == 0 {
            return Err(ActionError::NoShotsRemaining);
        }

        if let Some(armed) = self.game.object_mut(object).and_then(|o| o.weapon_mut()) {
            armed.expend_shot();
        }
        self.emit_for_tile(target, GameEvent::WeaponFired { object, target });

        let Some(victim) = self.game.tile(target).contents() else {
            return Ok(FireOutcome {
                target,
                damage: 0,
                destroyed: None,
            });
        };

        let damage = match self.game.object_mut(victim).and_then(|o| o.base_mut()) {
            Some(base) => base.take_damage(fire_power),
            // No hull to damage: the shot fizzles.
            None => 0,
        };

        let destroyed = self
            .game
            .object(victim)
            .and_then(|o| o.base())
            .is_some_and(|base| base.is_destroyed());
        if destroyed {
            self.destroy_object(victim);
            self.award_score(player, Self::KILL_SCORE);
            return Ok(FireOutcome {
                target,
                damage,
                destroyed: Some(victim),
            });
        }

        Ok(FireOutcome {
            target,
            damage,
            destroyed: None,
        })
    }

    /// Score awarded for destroying an enemy object.
    pub const KILL_SCORE: u32 = 100;

    fn award_score(&mut self, player: PlayerId, delta: u32) {
        let Some(scoring) = self.game.player_mut(player) else {
            return;
        };
        let to = scoring.add_score(delta);
        let from = to - delta;
        let recipients = self.score_observers(player);
        self.emit_to(
            recipients,
            GameEvent::PlayerScore {
                player,
                change: Change::new(from, to),
            },
        );
    }

    // ------------------------------------------------------------------
    // Resource transfer
    // ------------------------------------------------------------------

    /// Loads up to `amount` of a resource from the object's tile into its
    /// container. Returns the amount actually moved (bounded by tile stock
    /// and free capacity).
    pub fn load(
        &mut self,
        ctx: &Context,
        object: ObjectRef,
        resource: ResourceType,
        amount: u32,
    ) -> Result<u32, ActionError> {
        self.transfer(ctx, object, resource, amount, Direction::Load)
    }

    /// Unloads up to `amount` from the object's container onto its tile.
    pub fn unload(
        &mut self,
        ctx: &Context,
        object: ObjectRef,
        resource: ResourceType,
        amount: u32,
    ) -> Result<u32, ActionError> {
        self.transfer(ctx, object, resource, amount, Direction::Unload)
    }

    fn transfer(
        &mut self,
        ctx: &Context,
        object: ObjectRef,
        resource: ResourceType,
        amount: u32,
        direction: Direction,
    ) -> Result<u32, ActionError> {
        let player = ctx.current_player()?;
        self.ensure_running()?;

        let carrier = self
            .game
            .object(object)
            .ok_or(ActionError::UnknownObject(object))?;
        if carrier.owner() != player {
            return Err(ActionError::NotOwned(object));
        }
        let container = carrier
            .container_for(resource)
            .ok_or(ActionError::MissingModule {
                object,
                kind: ModuleKind::Container,
            })?;
        let tile = carrier.location();
        let tile_stock = self.game.tile(tile).resource_quantity(resource).unwrap_or(0);

        let moved = match direction {
            Direction::Load => amount.min(tile_stock).min(container.available()),
            Direction::Unload => amount.min(container.stock()),
        };
        if moved == 0 {
            return Ok(0);
        }

        let stock_before;
        let stock_after;
        {
            let Some(container) = self
                .game
                .object_mut(object)
                .and_then(|o| o.container_for_mut(resource))
            else {
                return Ok(0);
            };
            stock_before = container.stock();
            match direction {
                Direction::Load => container.add_stock(moved),
                Direction::Unload => container.remove_stock(moved),
            };
            stock_after = container.stock();
        }

        let delta = match direction {
            Direction::Load => -i64::from(moved),
            Direction::Unload => i64::from(moved),
        };
        self.add_resource_quantity(tile, resource, delta)?;

        self.emit_for_tile(
            tile,
            GameEvent::ContainerStock {
                object,
                resource,
                change: Change::new(stock_before, stock_after),
            },
        );
        Ok(moved)
    }

    // ------------------------------------------------------------------
    // Terminal state
    // ------------------------------------------------------------------

    /// Ends the game. A terminal transition: no further actions or readiness
    /// declarations are accepted afterwards.
    pub fn end(
        &mut self,
        condition: VictoryCondition,
        winner: Option<PlayerId>,
    ) -> Result<(), ActionError> {
        self.ensure_running()?;
        self.game.set_over(GameOver { condition, winner });
        self.emit_to_all(GameEvent::GameEnded { condition, winner });
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Load,
    Unload,
}
