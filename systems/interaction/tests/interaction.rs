use std::collections::{BTreeMap, BTreeSet};

use conquest_core::{
    AxialCoord, City, CityId, Command, GameSnapshot, Hex, HexLayout, HighlightKind, MapData,
    Mode, PlayerId, Terrain, Unit, UnitId, UnitStats, UnitType, AI_PLAYER, HUMAN_PLAYER,
};
use conquest_system_interaction::{
    compute_highlights, InputEvent, InteractionController, LocalRejection, Transition,
};
use conquest_world::{query, replace, GameStateCache};
use glam::Vec2;

const RADIUS: i32 = 3;

fn hexagon_map() -> Vec<Hex> {
    let mut hexes = Vec::new();
    for q in -RADIUS..=RADIUS {
        for r in -RADIUS..=RADIUS {
            if (q + r).abs() <= RADIUS {
                hexes.push(Hex::new(AxialCoord::new(q, r), Terrain::Land));
            }
        }
    }
    hexes
}

fn unit(id: &str, owner: &str, q: i32, r: i32, movement: u32, range: u32) -> Unit {
    Unit {
        id: UnitId::new(id),
        kind: UnitType::Infantry,
        owner: PlayerId::new(owner),
        position: AxialCoord::new(q, r),
        health: 10,
        movement_remaining: movement,
        has_attacked: false,
        stats: UnitStats {
            max_health: 10,
            attack: 3,
            defense: 4,
            range,
            movement,
            cost: 50,
        },
    }
}

fn city(id: &str, owner: Option<&str>, q: i32, r: i32) -> City {
    City {
        id: CityId::new(id),
        name: format!("City {id}"),
        owner: owner.map(PlayerId::new),
        position: AxialCoord::new(q, r),
        current_production: None,
        production_progress: 0,
        production_capacity: 10,
    }
}

fn cache_with(units: Vec<Unit>, cities: Vec<City>) -> GameStateCache {
    GameStateCache::with_snapshot(GameSnapshot {
        turn: 1,
        current_player: PlayerId::new(HUMAN_PLAYER),
        resources: BTreeMap::new(),
        map: MapData {
            width: 7,
            height: 7,
            hexes: hexagon_map(),
        },
        units,
        cities,
        game_over: false,
        winner: None,
    })
}

fn skirmish() -> GameStateCache {
    cache_with(
        vec![
            unit("u1", HUMAN_PLAYER, 0, 0, 2, 1),
            unit("u2", HUMAN_PLAYER, 0, 1, 2, 1),
            unit("e1", AI_PLAYER, 1, -1, 2, 1),
            unit("e2", AI_PLAYER, 3, -3, 2, 1),
        ],
        vec![
            city("c1", Some(HUMAN_PLAYER), -2, 0),
            city("c2", None, 2, 0),
        ],
    )
}

fn click(layout: &HexLayout, q: i32, r: i32) -> InputEvent {
    InputEvent::Click {
        position: layout.hex_to_pixel(AxialCoord::new(q, r)),
    }
}

#[test]
fn movement_two_on_empty_map_highlights_both_rings() {
    let mover = unit("u1", HUMAN_PLAYER, 0, 0, 2, 1);
    let cache = cache_with(vec![mover.clone()], Vec::new());

    let highlighted = compute_highlights(&mover, &cache);

    let coords: BTreeSet<AxialCoord> = highlighted.iter().map(|h| h.coord).collect();
    let expected: BTreeSet<AxialCoord> = hexagon_map()
        .into_iter()
        .map(|hex| hex.coord)
        .filter(|coord| {
            let distance = AxialCoord::new(0, 0).distance(*coord);
            distance == 1 || distance == 2
        })
        .collect();
    assert_eq!(coords, expected);
    assert_eq!(highlighted.len(), 18);
    assert!(highlighted
        .iter()
        .all(|highlight| highlight.kind == HighlightKind::Move));
}

#[test]
fn highlights_skip_occupied_hexes_and_mark_enemies_in_range() {
    let cache = skirmish();
    let mover = unit("u1", HUMAN_PLAYER, 0, 0, 2, 1);

    let highlighted = compute_highlights(&mover, &cache);

    let moves: Vec<AxialCoord> = highlighted
        .iter()
        .filter(|h| h.kind == HighlightKind::Move)
        .map(|h| h.coord)
        .collect();
    let attacks: Vec<AxialCoord> = highlighted
        .iter()
        .filter(|h| h.kind == HighlightKind::Attack)
        .map(|h| h.coord)
        .collect();

    assert!(!moves.contains(&AxialCoord::new(0, 1)), "friendly unit blocks");
    assert!(!moves.contains(&AxialCoord::new(1, -1)), "enemy unit blocks");
    assert_eq!(moves.len(), 16);
    assert_eq!(attacks, vec![AxialCoord::new(1, -1)]);
}

#[test]
fn clicking_own_unit_selects_it_with_highlights() {
    let cache = skirmish();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();

    let transition = controller.handle(click(&layout, 0, 0), &cache, &layout);

    assert_eq!(transition, Transition::Updated);
    let state = controller.state();
    assert_eq!(state.selected_unit().map(|u| u.id.as_str()), Some("u1"));
    assert!(state.selected_city().is_none());
    assert_eq!(state.mode(), Mode::Select);
    assert!(!state.highlighted().is_empty());
}

#[test]
fn clicking_own_city_replaces_unit_selection() {
    let cache = skirmish();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();

    let _ = controller.handle(click(&layout, 0, 0), &cache, &layout);
    let transition = controller.handle(click(&layout, -2, 0), &cache, &layout);

    assert_eq!(transition, Transition::Updated);
    let state = controller.state();
    assert!(state.selected_unit().is_none());
    assert_eq!(state.selected_city().map(|c| c.id.as_str()), Some("c1"));
    assert!(state.highlighted().is_empty());
}

#[test]
fn clicking_enemy_or_neutral_clears_selection() {
    let cache = skirmish();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();

    let _ = controller.handle(click(&layout, 0, 0), &cache, &layout);
    let _ = controller.handle(click(&layout, 1, -1), &cache, &layout);
    assert!(controller.state().selected_unit().is_none());

    let _ = controller.handle(click(&layout, -2, 0), &cache, &layout);
    let _ = controller.handle(click(&layout, 2, 0), &cache, &layout);
    assert!(controller.state().selected_city().is_none());
}

#[test]
fn click_outside_map_is_ignored() {
    let cache = skirmish();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();
    let _ = controller.handle(click(&layout, 0, 0), &cache, &layout);
    let before = controller.state().clone();

    let transition = controller.handle(
        InputEvent::Click {
            position: Vec2::new(-400.0, -400.0),
        },
        &cache,
        &layout,
    );

    assert_eq!(transition, Transition::Ignored);
    assert_eq!(controller.state(), &before);
}

#[test]
fn armed_move_dispatches_once_and_blocks_until_complete() {
    let cache = skirmish();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();

    let _ = controller.handle(click(&layout, 0, 0), &cache, &layout);
    assert_eq!(
        controller.handle(InputEvent::ArmMove, &cache, &layout),
        Transition::Updated
    );
    assert_eq!(controller.state().mode(), Mode::Move);

    let transition = controller.handle(click(&layout, -1, 0), &cache, &layout);
    assert_eq!(
        transition,
        Transition::Dispatch(Command::MoveUnit {
            unit: UnitId::new("u1"),
            target: AxialCoord::new(-1, 0),
        })
    );
    assert!(controller.is_pending());
    assert_eq!(controller.state().mode(), Mode::Select);

    assert_eq!(
        controller.handle(click(&layout, 0, 1), &cache, &layout),
        Transition::Busy
    );
    assert_eq!(controller.request(Command::EndTurn), Transition::Busy);

    controller.complete();

    assert!(!controller.is_pending());
    assert_eq!(controller.state().mode(), Mode::Select);
    assert!(controller.state().selected_unit().is_none());
    assert!(controller.state().highlighted().is_empty());
}

#[test]
fn attacking_own_unit_is_refused_locally() {
    let cache = skirmish();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();

    let _ = controller.handle(click(&layout, 0, 0), &cache, &layout);
    let _ = controller.handle(InputEvent::ArmAttack, &cache, &layout);
    let transition = controller.handle(click(&layout, 0, 1), &cache, &layout);

    assert_eq!(
        transition,
        Transition::Rejected(LocalRejection::AttackOwnUnit)
    );
    assert_eq!(
        LocalRejection::AttackOwnUnit.to_string(),
        "Cannot attack own units"
    );
    assert!(!controller.is_pending());
    assert_eq!(controller.state().mode(), Mode::Select);
    assert!(controller.state().selected_unit().is_none());
}

#[test]
fn own_unit_check_follows_the_attacker_not_the_turn() {
    let mut cache = skirmish();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();

    let _ = controller.handle(click(&layout, 0, 0), &cache, &layout);
    let _ = controller.handle(InputEvent::ArmAttack, &cache, &layout);

    let mut snapshot = query::snapshot(&cache)
        .expect("loaded")
        .clone();
    snapshot.current_player = PlayerId::new(AI_PLAYER);
    replace(&mut cache, snapshot);

    let transition = controller.handle(click(&layout, 0, 1), &cache, &layout);

    assert_eq!(
        transition,
        Transition::Rejected(LocalRejection::AttackOwnUnit)
    );
    assert!(controller.pending().is_none());
    assert_eq!(controller.state().mode(), Mode::Select);
}

#[test]
fn attack_click_on_empty_hex_stays_armed() {
    let cache = skirmish();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();

    let _ = controller.handle(click(&layout, 0, 0), &cache, &layout);
    let _ = controller.handle(InputEvent::ArmAttack, &cache, &layout);
    let transition = controller.handle(click(&layout, -1, 1), &cache, &layout);

    assert_eq!(transition, Transition::Ignored);
    assert_eq!(controller.state().mode(), Mode::Attack);

    let transition = controller.handle(click(&layout, 1, -1), &cache, &layout);
    assert_eq!(
        transition,
        Transition::Dispatch(Command::Attack {
            attacker: UnitId::new("u1"),
            defender: UnitId::new("e1"),
        })
    );
}

#[test]
fn arming_without_unit_is_refused() {
    let cache = skirmish();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();

    let _ = controller.handle(click(&layout, -2, 0), &cache, &layout);

    assert_eq!(
        controller.handle(InputEvent::ArmMove, &cache, &layout),
        Transition::Rejected(LocalRejection::NoUnitSelected)
    );
    assert_eq!(controller.state().mode(), Mode::Select);
    assert!(controller.state().selected_city().is_some());
}

#[test]
fn produce_requires_selected_city() {
    let cache = skirmish();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();
    let produce = InputEvent::Produce {
        unit_type: UnitType::Tank,
    };

    assert_eq!(
        controller.handle(produce, &cache, &layout),
        Transition::Rejected(LocalRejection::NoCitySelected)
    );
    assert!(!controller.is_pending());

    let _ = controller.handle(click(&layout, -2, 0), &cache, &layout);
    assert_eq!(
        controller.handle(produce, &cache, &layout),
        Transition::Dispatch(Command::ProduceUnit {
            city: CityId::new("c1"),
            unit_type: UnitType::Tank,
        })
    );
    assert_eq!(
        controller.pending(),
        Some(&Command::ProduceUnit {
            city: CityId::new("c1"),
            unit_type: UnitType::Tank,
        })
    );
}

#[test]
fn deselect_clears_everything() {
    let cache = skirmish();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();

    let _ = controller.handle(click(&layout, 0, 0), &cache, &layout);
    let _ = controller.handle(InputEvent::ArmMove, &cache, &layout);
    let transition = controller.handle(InputEvent::Deselect, &cache, &layout);

    assert_eq!(transition, Transition::Updated);
    assert!(controller.state().selected_hex().is_none());
    assert_eq!(controller.state().mode(), Mode::Select);
}

#[test]
fn panel_request_dispatches_when_idle() {
    let mut controller = InteractionController::new();

    assert_eq!(
        controller.request(Command::EndTurn),
        Transition::Dispatch(Command::EndTurn)
    );
    assert!(controller.is_pending());
    controller.complete();
    assert!(controller.pending().is_none());
}

#[test]
fn clicks_before_first_snapshot_are_ignored() {
    let cache = GameStateCache::new();
    let layout = HexLayout::default();
    let mut controller = InteractionController::new();

    assert_eq!(
        controller.handle(click(&layout, 0, 0), &cache, &layout),
        Transition::Ignored
    );
}
