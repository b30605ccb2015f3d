//! Game objects and their capability modules.
//!
//! An object is a composition of modules fixed at construction: the modules
//! decide what it can see (base), how it moves (mobility), what it can shoot
//! (weapon), and what it can carry (container). Capability dispatch is a
//! closed enum; "module-or-default" reads collapse a missing module into the
//! no-op behavior (no sensor observes nothing, no mobility never moves).

use std::fmt;

use crate::grid::GridSize;
use crate::mobility::MobilityModule;
use crate::types::{ObjectId, ObjectRef, PlayerId};
use crate::world::{ResourceType, TileRef};

/// Capability discriminant used for lookups and error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModuleKind {
    Base,
    Mobility,
    Weapon,
    Container,
}

/// One capability attached to exactly one game object.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Module {
    Base(BaseModule),
    Mobility(MobilityModule),
    Weapon(WeaponModule),
    Container(ContainerModule),
}

impl Module {
    pub fn kind(&self) -> ModuleKind {
        match self {
            Module::Base(_) => ModuleKind::Base,
            Module::Mobility(_) => ModuleKind::Mobility,
            Module::Weapon(_) => ModuleKind::Weapon,
            Module::Container(_) => ModuleKind::Container,
        }
    }

    /// Resets per-turn consumables to their baseline (fresh game).
    pub(crate) fn on_reset(&mut self) {
        match self {
            Module::Mobility(mobility) => mobility.refill(),
            Module::Weapon(weapon) => weapon.refill(),
            Module::Base(_) | Module::Container(_) => {}
        }
    }

    /// Re-derives turn-scoped budgets at the start of every turn.
    pub(crate) fn on_new_turn(&mut self) {
        match self {
            Module::Mobility(mobility) => mobility.refill(),
            Module::Weapon(weapon) => weapon.refill(),
            Module::Base(_) | Module::Container(_) => {}
        }
    }
}

/// Hull and sensors: hit points, armor, and the visibility grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseModule {
    max_health: u32,
    health: u32,
    armor: u32,
    view_range: u32,
}

impl BaseModule {
    pub fn new(max_health: u32, armor: u32, view_range: u32) -> Self {
        Self {
            max_health,
            health: max_health,
            armor,
            view_range,
        }
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn armor(&self) -> u32 {
        self.armor
    }

    pub fn view_range(&self) -> u32 {
        self.view_range
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    /// Applies incoming fire; armor absorbs its value from every hit.
    /// Returns the damage actually dealt.
    pub(crate) fn take_damage(&mut self, power: u32) -> u32 {
        let damage = power.saturating_sub(self.armor).min(self.health);
        self.health -= damage;
        damage
    }
}

/// Ranged weaponry with a per-turn shot budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponModule {
    fire_power: u32,
    range: u32,
    shots_per_turn: u32,
    remaining_shots: u32,
}

impl WeaponModule {
    pub fn new(fire_power: u32, range: u32, shots_per_turn: u32) -> Self {
        Self {
            fire_power,
            range,
            shots_per_turn,
            remaining_shots: shots_per_turn,
        }
    }

    pub fn fire_power(&self) -> u32 {
        self.fire_power
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn remaining_shots(&self) -> u32 {
        self.remaining_shots
    }

    pub(crate) fn refill(&mut self) {
        self.remaining_shots = self.shots_per_turn;
    }

    pub(crate) fn expend_shot(&mut self) -> bool {
        if self.remaining_shots == 0 {
            return false;
        }
        self.remaining_shots -= 1;
        true
    }
}

/// Resource storage for one resource kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerModule {
    resource: ResourceType,
    capacity: u32,
    stock: u32,
}

impl ContainerModule {
    pub fn new(resource: ResourceType, capacity: u32) -> Self {
        Self {
            resource,
            capacity,
            stock: 0,
        }
    }

    pub fn resource(&self) -> ResourceType {
        self.resource
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.stock)
    }

    /// Stores up to `amount`, bounded by free capacity. Returns the amount stored.
    pub(crate) fn add_stock(&mut self, amount: u32) -> u32 {
        let stored = amount.min(self.available());
        self.stock += stored;
        stored
    }

    /// Withdraws up to `amount`, bounded by stock. Returns the amount removed.
    pub(crate) fn remove_stock(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.stock);
        self.stock -= removed;
        removed
    }
}

/// Blueprint for constructing a game object: a name plus its module loadout.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitDesign {
    pub name: String,
    pub modules: Vec<Module>,
}

impl UnitDesign {
    pub fn new(name: impl Into<String>, modules: Vec<Module>) -> Self {
        Self {
            name: name.into(),
            modules,
        }
    }
}

/// An entity on the map, owned by a player, located on exactly one tile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameObject {
    id: ObjectId,
    owner: PlayerId,
    name: String,
    location: TileRef,
    modules: Vec<Module>,
}

impl GameObject {
    pub(crate) fn new(id: ObjectId, owner: PlayerId, location: TileRef, design: UnitDesign) -> Self {
        Self {
            id,
            owner,
            name: design.name,
            location,
            modules: design.modules,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> TileRef {
        self.location
    }

    pub(crate) fn set_location(&mut self, location: TileRef) {
        self.location = location;
    }

    /// Handle other parts of the state use to refer to this object.
    pub fn handle(&self) -> ObjectRef {
        ObjectRef {
            owner: self.owner,
            id: self.id,
        }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// First module of the given kind, if the object carries one.
    pub fn module(&self, kind: ModuleKind) -> Option<&Module> {
        self.modules.iter().find(|module| module.kind() == kind)
    }

    pub fn base(&self) -> Option<&BaseModule> {
        self.modules.iter().find_map(|m| match m {
            Module::Base(base) => Some(base),
            _ => None,
        })
    }

    pub fn mobility(&self) -> Option<&MobilityModule> {
        self.modules.iter().find_map(|m| match m {
            Module::Mobility(mobility) => Some(mobility),
            _ => None,
        })
    }

    pub fn weapon(&self) -> Option<&WeaponModule> {
        self.modules.iter().find_map(|m| match m {
            Module::Weapon(weapon) => Some(weapon),
            _ => None,
        })
    }

    pub fn containers(&self) -> impl Iterator<Item = &ContainerModule> {
        self.modules.iter().filter_map(|m| match m {
            Module::Container(container) => Some(container),
            _ => None,
        })
    }

    /// First container stocking the given resource.
    pub fn container_for(&self, resource: ResourceType) -> Option<&ContainerModule> {
        self.containers().find(|c| c.resource() == resource)
    }

    pub(crate) fn base_mut(&mut self) -> Option<&mut BaseModule> {
        self.modules.iter_mut().find_map(|m| match m {
            Module::Base(base) => Some(base),
            _ => None,
        })
    }

    pub(crate) fn mobility_mut(&mut self) -> Option<&mut MobilityModule> {
        self.modules.iter_mut().find_map(|m| match m {
            Module::Mobility(mobility) => Some(mobility),
            _ => None,
        })
    }

    pub(crate) fn weapon_mut(&mut self) -> Option<&mut WeaponModule> {
        self.modules.iter_mut().find_map(|m| match m {
            Module::Weapon(weapon) => Some(weapon),
            _ => None,
        })
    }

    pub(crate) fn container_for_mut(&mut self, resource: ResourceType) -> Option<&mut ContainerModule> {
        self.modules.iter_mut().find_map(|m| match m {
            Module::Container(container) if container.resource() == resource => Some(container),
            _ => None,
        })
    }

    /// Module-or-default sensor read: objects without a base module never
    /// observe anything.
    pub fn observes(&self, tile: TileRef, size: GridSize) -> bool {
        self.base().is_some_and(|base| {
            self.location.position.distance_to(tile.position, size) <= base.view_range()
        })
    }

    pub(crate) fn on_reset(&mut self) {
        for module in &mut self.modules {
            module.on_reset();
        }
    }

    pub(crate) fn on_new_turn(&mut self) {
        for module in &mut self.modules {
            module.on_new_turn();
        }
    }
}

impl fmt::Display for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.handle(), self.name, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_absorbs_damage() {
        let mut base = BaseModule::new(10, 2, 1);
        assert_eq!(base.take_damage(5), 3);
        assert_eq!(base.health(), 7);
        // Hits at or below armor do nothing.
        assert_eq!(base.take_damage(2), 0);
        assert_eq!(base.health(), 7);
        // Damage never exceeds remaining health.
        assert_eq!(base.take_damage(100), 7);
        assert!(base.is_destroyed());
    }

    #[test]
    fn weapon_shot_budget() {
        let mut weapon = WeaponModule::new(3, 2, 2);
        assert!(weapon.expend_shot());
        assert!(weapon.expend_shot());
        assert!(!weapon.expend_shot());
        weapon.refill();
        assert_eq!(weapon.remaining_shots(), 2);
    }

    #[test]
    fn container_bounds() {
        let mut container = ContainerModule::new(ResourceType::Metals, 10);
        assert_eq!(container.add_stock(7), 7);
        assert_eq!(container.add_stock(7), 3);
        assert_eq!(container.available(), 0);
        assert_eq!(container.remove_stock(4), 4);
        assert_eq!(container.remove_stock(100), 6);
        assert_eq!(container.stock(), 0);
    }
}
