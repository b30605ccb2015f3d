//! Movement and leveling: cost tables, quotes, and path search.
//!
//! Every move is two-phase: the engine first quotes the action (cost, target,
//! path) without touching state, then the controller executes the quote after
//! re-validating it: another player may have moved between quote and commit.
//!
//! Costs are `f64` speed points. A missing cost-table entry means the level is
//! impassable/unreachable, represented by the [`f64::MAX`] sentinel so that
//! comparisons with the remaining budget behave as a strict block (never
//! infinity arithmetic).

use std::collections::BTreeMap;

use crate::game::Game;
use crate::object::GameObject;
use crate::path::{self, Path};
use crate::types::ObjectRef;
use crate::world::{LevelType, TileRef};

/// Per-turn movement budget and the cost tables for lateral and vertical motion.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MobilityModule {
    movement_speed: f64,
    remaining_speed: f64,
    movement_cost: BTreeMap<LevelType, f64>,
    leveling_cost: BTreeMap<LevelType, f64>,
}

impl MobilityModule {
    pub fn new(
        movement_speed: f64,
        movement_cost: BTreeMap<LevelType, f64>,
        leveling_cost: BTreeMap<LevelType, f64>,
    ) -> Self {
        Self {
            movement_speed,
            remaining_speed: movement_speed,
            movement_cost,
            leveling_cost,
        }
    }

    pub fn movement_speed(&self) -> f64 {
        self.movement_speed
    }

    pub fn remaining_speed(&self) -> f64 {
        self.remaining_speed
    }

    /// Cost of one lateral step while on the given level.
    pub fn cost_for_moving_in(&self, level: LevelType) -> f64 {
        self.movement_cost.get(&level).copied().unwrap_or(f64::MAX)
    }

    /// Accumulated cost of leveling from `from` to `to`, walking the level
    /// order strictly in one direction. Returns the cost accumulated so far
    /// plus whether the target is reachable at all: a missing table entry for
    /// any level entered on the way makes it unreachable.
    pub fn cost_for_leveling_to(&self, from: LevelType, to: LevelType) -> (f64, bool) {
        if from == to {
            return (0.0, true);
        }

        let step = if to > from { LevelType::up } else { LevelType::down };
        let mut cost = 0.0;
        let mut current = from;
        while let Some(next) = step(current) {
            match self.leveling_cost.get(&next) {
                Some(level_cost) => cost += level_cost,
                None => return (cost, false),
            }
            if next == to {
                return (cost, true);
            }
            current = next;
        }
        (cost, false)
    }

    pub(crate) fn refill(&mut self) {
        self.remaining_speed = self.movement_speed;
    }

    pub(crate) fn spend(&mut self, cost: f64) {
        self.remaining_speed -= cost;
    }
}

/// Quote for a vertical transition to another level.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leveling {
    object: ObjectRef,
    cost: f64,
    target: Option<TileRef>,
}

impl Leveling {
    pub fn object(&self) -> ObjectRef {
        self.object
    }

    /// The cost of the leveling. When not possible this is the cost
    /// accumulated before the quote failed, not the cost of reaching the
    /// target.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The tile at the same planar coordinate on the destination level, when
    /// the leveling is executable.
    pub fn target(&self) -> Option<TileRef> {
        self.target
    }

    pub fn is_possible(&self) -> bool {
        self.target.is_some()
    }
}

/// Quote for a move to a target tile, including any leveling needed first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movement {
    object: ObjectRef,
    cost: f64,
    leveling: Leveling,
    path: Option<Path<TileRef>>,
}

impl Movement {
    pub fn object(&self) -> ObjectRef {
        self.object
    }

    /// Total cost (leveling plus path). When not possible this reports the
    /// cost known so far.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn leveling(&self) -> &Leveling {
        &self.leveling
    }

    pub fn path(&self) -> Option<&Path<TileRef>> {
        self.path.as_ref()
    }

    pub fn is_possible(&self) -> bool {
        self.path.is_some()
    }
}

/// Quote handed out when the acting player does not own the object: nothing
/// about the object's mobility may leak, so the quote is a flat impossible.
pub(crate) fn impossible_leveling(object: ObjectRef) -> Leveling {
    Leveling {
        object,
        cost: 0.0,
        target: None,
    }
}

pub(crate) fn impossible_movement(object: ObjectRef) -> Movement {
    Movement {
        object,
        cost: 0.0,
        leveling: impossible_leveling(object),
        path: None,
    }
}

/// Quotes a leveling for `object` toward `target_level`.
///
/// An impossible quote (unreachable level, or over budget) carries no target.
pub(crate) fn quote_leveling(
    object: &GameObject,
    mobility: &MobilityModule,
    target_level: LevelType,
) -> Leveling {
    let current = object.location();
    if target_level == current.level {
        return Leveling {
            object: object.handle(),
            cost: 0.0,
            target: Some(current),
        };
    }

    let (cost, reachable) = mobility.cost_for_leveling_to(current.level, target_level);
    let target = (reachable && cost <= mobility.remaining_speed())
        .then(|| current.on_level(target_level));
    Leveling {
        object: object.handle(),
        cost,
        target,
    }
}

/// Quotes a movement for `object` toward `target`.
///
/// The quote first levels to the target's level, then path-searches from the
/// post-leveling tile. Intermediate tiles must be unoccupied; the target tile
/// itself may be entered regardless of occupancy (execution re-checks it).
pub(crate) fn quote_movement(
    game: &Game,
    object: &GameObject,
    mobility: &MobilityModule,
    target: TileRef,
) -> Movement {
    let leveling = quote_leveling(object, mobility, target.level);
    let Some(origin) = leveling.target() else {
        return Movement {
            object: object.handle(),
            cost: leveling.cost(),
            leveling,
            path: None,
        };
    };

    let step_cost = mobility.cost_for_moving_in(target.level);
    let budget = mobility.remaining_speed() - leveling.cost();
    let size = game.size();
    let path = path::find(
        origin,
        |tile| tile == target,
        |_, to| {
            if to == target || game.tile(to).is_accessible() {
                step_cost
            } else {
                f64::MAX
            }
        },
        budget,
        |tile| tile.neighbours(size),
    );

    let cost = leveling.cost() + path.as_ref().map_or(0.0, |p| p.cost);
    Movement {
        object: object.handle(),
        cost,
        leveling,
        path,
    }
}
