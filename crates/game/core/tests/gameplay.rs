//! End-to-end rules coverage: movement budgets, leveling, readiness,
//! visibility, combat, and notification scoping, all through the controller.

use std::collections::BTreeMap;

use strata_core::{
    ActionError, BaseModule, Color, ContainerModule, Coordinate, Game, GameController, GameEvent,
    GameSetup, GridSize, LevelType, Maybe, MobilityModule, Module, ObjectId, ObjectRef, PlayerId,
    PlayerKey, PlayerSetup, ReadyOutcome, ResourceType, TileRef, UnitDesign, UnitSetup,
    WeaponModule,
};

const SIZE: GridSize = GridSize::new(12, 12);

fn at(u: i64, v: i64) -> Coordinate {
    Coordinate::new(u, v, SIZE)
}

fn ground(u: i64, v: i64) -> TileRef {
    TileRef::new(LevelType::Ground, at(u, v))
}

fn obj(player: u32, id: u32) -> ObjectRef {
    ObjectRef {
        owner: PlayerId(player),
        id: ObjectId(id),
    }
}

/// Speed 10, ground steps cost 2, sky entry costs 5.
fn rover() -> UnitDesign {
    UnitDesign::new(
        "rover",
        vec![
            Module::Base(BaseModule::new(10, 0, 3)),
            Module::Mobility(MobilityModule::new(
                10.0,
                BTreeMap::from([(LevelType::Ground, 2.0), (LevelType::Sky, 1.0)]),
                BTreeMap::from([(LevelType::Sky, 5.0)]),
            )),
        ],
    )
}

fn gunner() -> UnitDesign {
    UnitDesign::new(
        "gunner",
        vec![
            Module::Base(BaseModule::new(12, 1, 5)),
            Module::Weapon(WeaponModule::new(5, 3, 1)),
        ],
    )
}

fn drone() -> UnitDesign {
    UnitDesign::new("drone", vec![Module::Base(BaseModule::new(8, 1, 2))])
}

fn hauler() -> UnitDesign {
    UnitDesign::new(
        "hauler",
        vec![
            Module::Base(BaseModule::new(20, 1, 2)),
            Module::Container(ContainerModule::new(ResourceType::Metals, 20)),
        ],
    )
}

fn unit(design: UnitDesign, u: i64, v: i64) -> UnitSetup {
    UnitSetup {
        design,
        level: LevelType::Ground,
        position: at(u, v),
    }
}

const KEY_RED: PlayerKey = PlayerKey::new(11);
const KEY_BLUE: PlayerKey = PlayerKey::new(22);

fn two_player_game(
    red_units: Vec<UnitSetup>,
    blue_units: Vec<UnitSetup>,
) -> (GameController, strata_core::Context, strata_core::Context) {
    let setup = GameSetup {
        size: SIZE,
        players: vec![
            PlayerSetup {
                name: "red".to_owned(),
                colors: [Color::RED, Color::YELLOW],
                key: Some(KEY_RED),
                units: red_units,
            },
            PlayerSetup {
                name: "blue".to_owned(),
                colors: [Color::BLUE, Color::GRAY],
                key: Some(KEY_BLUE),
                units: blue_units,
            },
        ],
    };
    let game = Game::new(setup).unwrap();
    let red = game.authenticate(PlayerId(0), &KEY_RED).unwrap();
    let blue = game.authenticate(PlayerId(1), &KEY_BLUE).unwrap();
    (GameController::new(game), red, blue)
}

#[test]
fn movement_quote_is_idempotent_and_budget_is_spent() {
    let (mut controller, red, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 9, 9)]);
    let rover = obj(0, 0);

    // Three ground steps at cost 2 each.
    let quote = controller.movement(&red, rover, ground(3, 0)).unwrap();
    assert!(quote.is_possible());
    assert_eq!(quote.cost(), 6.0);

    let again = controller.movement(&red, rover, ground(3, 0)).unwrap();
    assert_eq!(again, quote);

    controller.execute_movement(&red, &quote).unwrap();
    let moved = controller.game().object(rover).unwrap();
    assert_eq!(moved.location(), ground(3, 0));
    assert_eq!(moved.mobility().unwrap().remaining_speed(), 4.0);

    // Three more steps would cost 6 against a budget of 4.
    let too_far = controller.movement(&red, rover, ground(6, 0)).unwrap();
    assert!(!too_far.is_possible());

    let reachable = controller.movement(&red, rover, ground(5, 0)).unwrap();
    assert!(reachable.is_possible());
    assert_eq!(reachable.cost(), 4.0);
}

#[test]
fn stale_movement_quote_is_rejected() {
    let (mut controller, red, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 9, 9)]);
    let rover = obj(0, 0);

    let quote = controller.movement(&red, rover, ground(3, 0)).unwrap();
    controller.execute_movement(&red, &quote).unwrap();

    // Executing the same quote again must fail, not walk the path twice.
    let err = controller.execute_movement(&red, &quote).unwrap_err();
    assert!(matches!(
        err,
        ActionError::InsufficientSpeed { .. } | ActionError::NotPossible
    ));
    assert_eq!(
        controller.game().object(rover).unwrap().location(),
        ground(3, 0)
    );
}

#[test]
fn path_search_routes_around_occupied_tiles() {
    let (mut controller, red, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 2, 0)]);
    let rover = obj(0, 0);

    // The straight line is blocked at (2,0): one extra step to detour.
    let quote = controller.movement(&red, rover, ground(4, 0)).unwrap();
    assert!(quote.is_possible());
    assert_eq!(quote.cost(), 10.0);

    // The occupied tile itself may be quoted as a target...
    let onto = controller.movement(&red, rover, ground(2, 0)).unwrap();
    assert!(onto.is_possible());

    // ...but execution re-walks the whole path, target included, and fails
    // without moving.
    let err = controller.execute_movement(&red, &onto).unwrap_err();
    assert!(matches!(err, ActionError::PathObstructed { .. }));
    assert_eq!(
        controller.game().object(rover).unwrap().location(),
        ground(0, 0)
    );
}

#[test]
fn leveling_quote_and_execute() {
    let (mut controller, red, _) =
        two_player_game(vec![unit(rover(), 2, 2)], vec![unit(drone(), 9, 9)]);
    let rover = obj(0, 0);

    let quote = controller.leveling(&red, rover, LevelType::Sky).unwrap();
    assert!(quote.is_possible());
    assert_eq!(quote.cost(), 5.0);
    assert_eq!(quote.target(), Some(TileRef::new(LevelType::Sky, at(2, 2))));

    // Space has no leveling entry: not possible even via Sky.
    let space = controller.leveling(&red, rover, LevelType::Space).unwrap();
    assert!(!space.is_possible());

    controller.execute_leveling(&red, &quote).unwrap();
    let leveled = controller.game().object(rover).unwrap();
    assert_eq!(leveled.location().level, LevelType::Sky);
    assert_eq!(leveled.mobility().unwrap().remaining_speed(), 5.0);

    // The vacated ground tile is free again.
    assert!(controller.game().tile(ground(2, 2)).is_accessible());
}

#[test]
fn movement_levels_first_when_the_target_is_on_another_level() {
    let (mut controller, red, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 9, 9)]);
    let rover = obj(0, 0);

    // Level to Sky (5) then two sky steps (1 each).
    let target = TileRef::new(LevelType::Sky, at(2, 0));
    let quote = controller.movement(&red, rover, target).unwrap();
    assert!(quote.is_possible());
    assert_eq!(quote.cost(), 7.0);

    controller.execute_movement(&red, &quote).unwrap();
    let moved = controller.game().object(rover).unwrap();
    assert_eq!(moved.location(), target);
    assert_eq!(moved.mobility().unwrap().remaining_speed(), 3.0);
}

#[test]
fn quotes_for_foreign_objects_are_impossible_not_errors() {
    let (controller, red, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 9, 9)]);

    let foreign = obj(1, 0);
    let quote = controller.movement(&red, foreign, ground(8, 9)).unwrap();
    assert!(!quote.is_possible());
    assert_eq!(quote.cost(), 0.0);

    let leveling = controller.leveling(&red, foreign, LevelType::Sky).unwrap();
    assert!(!leveling.is_possible());
}

#[test]
fn readiness_state_machine_with_keyless_player() {
    let setup = GameSetup {
        size: SIZE,
        players: vec![
            PlayerSetup {
                name: "a".to_owned(),
                colors: [Color::RED, Color::YELLOW],
                key: Some(PlayerKey::new(1)),
                units: vec![unit(rover(), 0, 0)],
            },
            PlayerSetup {
                name: "b".to_owned(),
                colors: [Color::BLUE, Color::GRAY],
                key: Some(PlayerKey::new(2)),
                units: vec![unit(drone(), 4, 4)],
            },
            PlayerSetup {
                name: "c".to_owned(),
                colors: [Color::GREEN, Color::GRAY],
                key: Some(PlayerKey::new(3)),
                units: vec![unit(drone(), 8, 8)],
            },
            // Key-less environment player: ready automatically.
            PlayerSetup {
                name: "nature".to_owned(),
                colors: [Color::GRAY, Color::GREEN],
                key: None,
                units: vec![],
            },
        ],
    };
    let game = Game::new(setup).unwrap();
    let a = game.authenticate(PlayerId(0), &PlayerKey::new(1)).unwrap();
    let b = game.authenticate(PlayerId(1), &PlayerKey::new(2)).unwrap();
    let c = game.authenticate(PlayerId(2), &PlayerKey::new(3)).unwrap();
    let mut controller = GameController::new(game);

    assert_eq!(
        controller.set_ready(&a).unwrap(),
        ReadyOutcome::Waiting {
            remaining: vec![PlayerId(1), PlayerId(2)],
        }
    );
    assert_eq!(
        controller.set_ready(&b).unwrap(),
        ReadyOutcome::Waiting {
            remaining: vec![PlayerId(2)],
        }
    );

    let outcome = controller.set_ready(&c).unwrap();
    let ReadyOutcome::NewTurn { turn } = outcome else {
        panic!("expected a new turn, got {outcome:?}");
    };
    assert_eq!(turn.number(), 1);

    // Only the key-less player is pre-ready for the new turn.
    assert_eq!(
        controller.game().ready_players().iter().copied().collect::<Vec<_>>(),
        vec![PlayerId(3)]
    );
}

#[test]
fn new_turn_refills_budgets() {
    let (mut controller, red, blue) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 9, 9)]);
    let rover = obj(0, 0);

    let quote = controller.movement(&red, rover, ground(3, 0)).unwrap();
    controller.execute_movement(&red, &quote).unwrap();
    assert_eq!(
        controller.game().object(rover).unwrap().mobility().unwrap().remaining_speed(),
        4.0
    );

    controller.set_ready(&red).unwrap();
    controller.set_ready(&blue).unwrap();
    assert_eq!(
        controller.game().object(rover).unwrap().mobility().unwrap().remaining_speed(),
        10.0
    );
}

#[test]
fn visibility_goes_from_unknown_to_known_as_sensors_move() {
    // Red's rover sees 3 tiles; blue's drone sits 6 away.
    let (mut controller, red, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 6, 0)]);
    let rover = obj(0, 0);
    let drone = obj(1, 0);

    assert_eq!(
        controller.game().check_contents(&red, ground(6, 0)).unwrap(),
        Maybe::Unknown
    );

    // Two steps closer: distance 4, still dark.
    let quote = controller.movement(&red, rover, ground(2, 0)).unwrap();
    controller.execute_movement(&red, &quote).unwrap();
    assert_eq!(
        controller.game().check_contents(&red, ground(6, 0)).unwrap(),
        Maybe::Unknown
    );

    // One more step: distance 3 is within sensor range.
    let quote = controller.movement(&red, rover, ground(3, 0)).unwrap();
    controller.execute_movement(&red, &quote).unwrap();
    assert_eq!(
        controller.game().check_contents(&red, ground(6, 0)).unwrap(),
        Maybe::Present(drone)
    );
    assert_eq!(
        controller.game().check_contents(&red, ground(5, 0)).unwrap(),
        Maybe::Absent
    );
}

#[test]
fn scores_are_hidden_until_discovery() {
    let (controller, red, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 6, 0)]);

    let info = controller.game().player_game_info(&red, PlayerId(1)).unwrap();
    assert_eq!(info.name, "blue");
    assert_eq!(info.score, Maybe::Unknown);

    let own = controller.game().player_game_info(&red, PlayerId(0)).unwrap();
    assert_eq!(own.score, Maybe::Present(0));
}

#[test]
fn firing_damages_destroys_and_scores() {
    // Gunner: power 5, range 3, one shot per turn. Drone: 8 health, 1 armor.
    let (mut controller, red, blue) =
        two_player_game(vec![unit(gunner(), 0, 0)], vec![unit(drone(), 2, 0)]);
    let gunner = obj(0, 0);
    let drone = obj(1, 0);
    controller.drain_events();

    let hit = controller.fire(&red, gunner, ground(2, 0)).unwrap();
    assert_eq!(hit.damage, 4);
    assert_eq!(hit.destroyed, None);
    assert_eq!(
        controller.game().object(drone).unwrap().base().unwrap().health(),
        4
    );

    // Shot budget is per turn.
    let err = controller.fire(&red, gunner, ground(2, 0)).unwrap_err();
    assert!(matches!(err, ActionError::NoShotsRemaining));

    controller.set_ready(&red).unwrap();
    controller.set_ready(&blue).unwrap();
    controller.drain_events();

    let kill = controller.fire(&red, gunner, ground(2, 0)).unwrap();
    assert_eq!(kill.destroyed, Some(drone));
    assert!(controller.game().object(drone).is_none());
    assert!(controller.game().tile(ground(2, 0)).is_accessible());
    assert_eq!(
        controller.game().player(PlayerId(0)).unwrap().score(),
        GameController::KILL_SCORE
    );

    // The victim's owner always learns of the loss.
    let events = controller.drain_events();
    assert!(events.iter().any(|n| n.recipient == PlayerId(1)
        && matches!(n.event, GameEvent::ObjectDestroyed { object, .. } if object == drone)));
}

#[test]
fn firing_requires_range_and_observability() {
    let (mut controller, red, _) =
        two_player_game(vec![unit(gunner(), 0, 0)], vec![unit(drone(), 4, 0)]);
    let gunner = obj(0, 0);

    // Distance 4 exceeds range 3.
    let err = controller.fire(&red, gunner, ground(4, 0)).unwrap_err();
    assert!(matches!(err, ActionError::OutOfRange { .. }));

    // Distance 6 is also beyond sensors: the softer refusal comes first.
    let err = controller.fire(&red, gunner, ground(6, 0)).unwrap_err();
    assert!(matches!(err, ActionError::TargetNotObservable { .. }));
}

#[test]
fn loading_and_unloading_respect_tile_stock_and_capacity() {
    let (mut controller, red, _) =
        two_player_game(vec![unit(hauler(), 1, 1)], vec![unit(drone(), 9, 9)]);
    let hauler = obj(0, 0);

    controller
        .set_resource_quantity(ground(1, 1), ResourceType::Metals, 30)
        .unwrap();

    // Capacity 20 bounds the transfer.
    let loaded = controller
        .load(&red, hauler, ResourceType::Metals, 50)
        .unwrap();
    assert_eq!(loaded, 20);
    assert_eq!(
        controller.game().tile(ground(1, 1)).resource_quantity(ResourceType::Metals),
        Some(10)
    );

    let unloaded = controller
        .unload(&red, hauler, ResourceType::Metals, 5)
        .unwrap();
    assert_eq!(unloaded, 5);
    assert_eq!(
        controller.game().tile(ground(1, 1)).resource_quantity(ResourceType::Metals),
        Some(15)
    );

    // No container for fuel.
    let err = controller
        .load(&red, hauler, ResourceType::Fuel, 1)
        .unwrap_err();
    assert!(matches!(err, ActionError::MissingModule { .. }));
}

#[test]
fn notifications_go_only_to_authorized_observers() {
    // Players on opposite corners, far outside each other's sensors.
    let (mut controller, red, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 6, 6)]);
    let rover = obj(0, 0);
    controller.drain_events();

    let quote = controller.movement(&red, rover, ground(1, 0)).unwrap();
    controller.execute_movement(&red, &quote).unwrap();

    let events = controller.drain_events();
    assert!(!events.is_empty());
    assert!(
        events.iter().all(|n| n.recipient == PlayerId(0)),
        "blue observed nothing, so blue gets nothing: {events:?}"
    );
}

#[test]
fn turn_events_reach_every_player() {
    let (mut controller, red, blue) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 6, 6)]);
    controller.drain_events();

    controller.set_ready(&red).unwrap();
    controller.set_ready(&blue).unwrap();

    let events = controller.drain_events();
    for player in [PlayerId(0), PlayerId(1)] {
        assert!(events.iter().any(|n| n.recipient == player
            && matches!(n.event, GameEvent::NewTurn { turn } if turn.number() == 1)));
    }
}

#[test]
fn ended_games_accept_no_further_actions() {
    let (mut controller, red, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 9, 9)]);

    controller
        .end(strata_core::VictoryCondition::Might, Some(PlayerId(0)))
        .unwrap();

    let err = controller.set_ready(&red).unwrap_err();
    assert!(matches!(err, ActionError::GameOver));
    let quote = controller.movement(&red, obj(0, 0), ground(1, 0)).unwrap();
    let err = controller.execute_movement(&red, &quote).unwrap_err();
    assert!(matches!(err, ActionError::GameOver));
}

#[test]
fn anonymous_contexts_are_rejected_before_visibility() {
    let (mut controller, _, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 9, 9)]);

    let anon = strata_core::Context::anonymous();
    let err = controller.set_ready(&anon).unwrap_err();
    assert!(matches!(
        err,
        ActionError::Security(strata_core::SecurityError::NotAuthenticated)
    ));
    assert!(controller.game().check_contents(&anon, ground(0, 0)).is_err());
}

#[test]
fn contains_and_accessibility_follow_visibility() {
    let (controller, red, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 9, 9)]);
    let rover = obj(0, 0);
    let drone = obj(1, 0);

    // Within the rover's sensors the answer is definite either way.
    assert_eq!(
        controller.game().check_contains(&red, ground(0, 0), rover).unwrap(),
        Maybe::Present(true)
    );
    assert_eq!(
        controller.game().check_contains(&red, ground(2, 0), rover).unwrap(),
        Maybe::Present(false)
    );
    // Beyond them even a true occupancy stays unknown.
    assert_eq!(
        controller.game().check_contains(&red, ground(9, 9), drone).unwrap(),
        Maybe::Unknown
    );

    // Accessible means visibly empty; unknown tiles are never accessible.
    assert!(controller.game().check_accessible(&red, ground(2, 0)).unwrap());
    assert!(!controller.game().check_accessible(&red, ground(0, 0)).unwrap());
    assert!(!controller.game().check_accessible(&red, ground(9, 9)).unwrap());
}

#[test]
fn resource_stock_is_tri_state_and_never_negative() {
    let (mut controller, red, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 9, 9)]);

    controller
        .set_resource_quantity(ground(2, 0), ResourceType::Metals, 5)
        .unwrap();
    controller.drain_events();

    assert_eq!(
        controller
            .game()
            .check_resource_quantity(&red, ground(2, 0), ResourceType::Metals)
            .unwrap(),
        Maybe::Present(5)
    );
    // Visible but unstocked reads as a definite absence.
    assert_eq!(
        controller
            .game()
            .check_resource_quantity(&red, ground(1, 0), ResourceType::Metals)
            .unwrap(),
        Maybe::Absent
    );
    // Out of sensor range the stock stays unknown.
    assert_eq!(
        controller
            .game()
            .check_resource_quantity(&red, ground(9, 9), ResourceType::Metals)
            .unwrap(),
        Maybe::Unknown
    );

    // Draining below zero fails without touching the tile or notifying anyone.
    let err = controller
        .add_resource_quantity(ground(2, 0), ResourceType::Metals, -8)
        .unwrap_err();
    assert!(matches!(
        err,
        ActionError::ResourceUnderflow { tile, resource }
            if tile == ground(2, 0) && resource == ResourceType::Metals
    ));
    assert_eq!(
        controller
            .game()
            .check_resource_quantity(&red, ground(2, 0), ResourceType::Metals)
            .unwrap(),
        Maybe::Present(5)
    );
    assert!(controller.drain_events().is_empty());

    assert_eq!(
        controller
            .add_resource_quantity(ground(2, 0), ResourceType::Metals, 3)
            .unwrap(),
        8
    );
    // Draining to exactly zero removes the entry.
    assert_eq!(
        controller
            .add_resource_quantity(ground(2, 0), ResourceType::Metals, -8)
            .unwrap(),
        0
    );
    assert_eq!(
        controller
            .game()
            .check_resource_quantity(&red, ground(2, 0), ResourceType::Metals)
            .unwrap(),
        Maybe::Absent
    );
}

#[test]
fn observable_tiles_cover_the_sensor_column() {
    let (controller, _, _) =
        two_player_game(vec![unit(rover(), 0, 0)], vec![unit(drone(), 9, 9)]);

    let tiles = controller.game().observable_tiles(PlayerId(0));
    // View range 3 covers 37 planar hexes, each across all three levels.
    assert_eq!(tiles.len(), 37 * 3);
    assert!(tiles.contains(&ground(3, 0)));
    assert!(tiles.contains(&TileRef::new(LevelType::Sky, at(3, 0))));
    assert!(!tiles.contains(&ground(4, 0)));
}
