//! The stock unit roster.
//!
//! Each constructor returns a fresh [`UnitDesign`] with its module loadout.
//! Costs are speed points: a missing cost-table entry makes the level
//! impassable for that design.

use std::collections::BTreeMap;

use strata_core::{
    BaseModule, ContainerModule, LevelType, MobilityModule, Module, ResourceType, UnitDesign,
    WeaponModule,
};

/// Slow ground builder: sturdy, short-sighted, carries construction metals.
pub fn engineer() -> UnitDesign {
    UnitDesign::new(
        "Engineer",
        vec![
            Module::Base(BaseModule::new(30, 1, 2)),
            Module::Mobility(MobilityModule::new(
                8.0,
                BTreeMap::from([(LevelType::Ground, 2.0)]),
                BTreeMap::new(),
            )),
            Module::Container(ContainerModule::new(ResourceType::Metals, 20)),
        ],
    )
}

/// Fast ground recon unit: fragile, far-sighted, lightly armed.
pub fn scout() -> UnitDesign {
    UnitDesign::new(
        "Scout",
        vec![
            Module::Base(BaseModule::new(10, 0, 5)),
            Module::Mobility(MobilityModule::new(
                10.0,
                BTreeMap::from([(LevelType::Ground, 2.0)]),
                BTreeMap::new(),
            )),
            Module::Weapon(WeaponModule::new(3, 3, 1)),
        ],
    )
}

/// Sky-capable gunship: cheap in the sky, expensive when grounded.
pub fn airship() -> UnitDesign {
    UnitDesign::new(
        "Airship",
        vec![
            Module::Base(BaseModule::new(20, 1, 4)),
            Module::Mobility(MobilityModule::new(
                12.0,
                BTreeMap::from([(LevelType::Ground, 4.0), (LevelType::Sky, 1.0)]),
                BTreeMap::from([(LevelType::Ground, 2.0), (LevelType::Sky, 2.0)]),
            )),
            Module::Weapon(WeaponModule::new(5, 2, 2)),
        ],
    )
}

/// Immobile depot: heavily armored bulk storage for metals and fuel.
pub fn container_post() -> UnitDesign {
    UnitDesign::new(
        "Container post",
        vec![
            Module::Base(BaseModule::new(40, 3, 1)),
            Module::Container(ContainerModule::new(ResourceType::Metals, 50)),
            Module::Container(ContainerModule::new(ResourceType::Fuel, 50)),
        ],
    )
}

/// Every stock design.
pub fn catalog() -> Vec<UnitDesign> {
    vec![engineer(), scout(), airship(), container_post()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::ModuleKind;

    #[test]
    fn every_design_has_a_base_module() {
        for design in catalog() {
            assert!(
                design
                    .modules
                    .iter()
                    .any(|m| m.kind() == ModuleKind::Base),
                "{} lacks a base module",
                design.name
            );
        }
    }

    #[test]
    fn airship_reaches_the_sky() {
        let design = airship();
        let mobility = design
            .modules
            .iter()
            .find_map(|m| match m {
                Module::Mobility(mobility) => Some(mobility),
                _ => None,
            })
            .unwrap();
        let (cost, reachable) = mobility.cost_for_leveling_to(LevelType::Ground, LevelType::Sky);
        assert!(reachable);
        assert!(cost <= mobility.movement_speed());
        // Space stays out of reach for the whole roster.
        assert!(!mobility.cost_for_leveling_to(LevelType::Ground, LevelType::Space).1);
    }

    #[test]
    fn container_post_is_immobile() {
        let design = container_post();
        assert!(
            !design
                .modules
                .iter()
                .any(|m| m.kind() == ModuleKind::Mobility)
        );
    }
}
