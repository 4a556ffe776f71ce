use std::collections::BTreeMap;

use conquest_core::{
    AxialCoord, City, CityId, GameSnapshot, Hex, HexLayout, Highlight, HighlightKind, MapData,
    PlayerId, SelectionState, Terrain, Unit, UnitId, UnitStats, UnitType, AI_PLAYER,
    HUMAN_PLAYER,
};
use conquest_rendering::{
    Banner, Canvas, Color, DrawCommand, Frame, HexRenderer, Hud, Palette, HIGHLIGHT_WIDTH,
    SELECTION_WIDTH,
};
use glam::Vec2;

fn unit(id: &str, owner: &str, kind: UnitType, q: i32, r: i32, health: u32) -> Unit {
    Unit {
        id: UnitId::new(id),
        kind,
        owner: PlayerId::new(owner),
        position: AxialCoord::new(q, r),
        health,
        movement_remaining: 2,
        has_attacked: false,
        stats: UnitStats {
            max_health: 10,
            attack: 3,
            defense: 4,
            range: 1,
            movement: 2,
            cost: kind.cost(),
        },
    }
}

fn city(id: &str, owner: Option<&str>, q: i32, r: i32) -> City {
    City {
        id: CityId::new(id),
        name: format!("City {id}"),
        owner: owner.map(PlayerId::new),
        position: AxialCoord::new(q, r),
        current_production: Some(UnitType::Tank),
        production_progress: 20,
        production_capacity: 10,
    }
}

fn snapshot(units: Vec<Unit>, cities: Vec<City>) -> GameSnapshot {
    GameSnapshot {
        turn: 4,
        current_player: PlayerId::new(HUMAN_PLAYER),
        resources: BTreeMap::from([(PlayerId::new(HUMAN_PLAYER), 175)]),
        map: MapData {
            width: 3,
            height: 1,
            hexes: vec![
                Hex::new(AxialCoord::new(0, 0), Terrain::Land),
                Hex::new(AxialCoord::new(1, 0), Terrain::Water),
                Hex::new(AxialCoord::new(2, 0), Terrain::Mountain),
            ],
        },
        units,
        cities,
        game_over: false,
        winner: None,
    }
}

fn renderer() -> HexRenderer {
    HexRenderer::new(
        HexLayout::default().with_viewport(Vec2::new(800.0, 600.0)),
        Palette::default(),
    )
}

fn fill_colors(frame: &Frame) -> Vec<Color> {
    frame
        .commands()
        .iter()
        .filter_map(|command| match command {
            DrawCommand::FillPolygon { color, .. } | DrawCommand::FillRect { color, .. } => {
                Some(*color)
            }
            _ => None,
        })
        .collect()
}

#[test]
fn without_snapshot_only_clears() {
    let mut frame = Frame::new();

    renderer().render(None, &SelectionState::new(), &mut frame);

    assert_eq!(
        frame.commands(),
        &[DrawCommand::Clear {
            color: Color::from_rgb_u8(0, 0, 0)
        }]
    );
}

#[test]
fn layers_are_painted_back_to_front() {
    let palette = Palette::default();
    let state = snapshot(
        vec![unit("u1", HUMAN_PLAYER, UnitType::Tank, 0, 0, 10)],
        vec![city("c1", Some(AI_PLAYER), 2, 0)],
    );
    let mut selection = SelectionState::new();
    selection.select_unit(
        state.units[0].clone(),
        vec![Highlight::new(AxialCoord::new(1, 0), HighlightKind::Move)],
    );
    let mut frame = Frame::new();

    renderer().render(Some(&state), &selection, &mut frame);

    let commands = frame.commands();
    assert!(matches!(commands[0], DrawCommand::Clear { .. }));
    // Three hexes, each a fill and an outline.
    assert!(matches!(
        commands[1],
        DrawCommand::FillPolygon { color, .. } if color == palette.land
    ));
    assert!(matches!(
        commands[3],
        DrawCommand::FillPolygon { color, .. } if color == palette.water
    ));
    assert!(matches!(
        commands[7],
        DrawCommand::StrokePolygon { color, width, .. }
            if color == palette.move_highlight && width == HIGHLIGHT_WIDTH
    ));
    assert!(matches!(
        commands[8],
        DrawCommand::FillRect { color, .. } if color == palette.city_building
    ));
    assert!(matches!(
        commands[9],
        DrawCommand::FillRect { color, .. } if color == palette.ai
    ));
    assert!(matches!(commands[10], DrawCommand::StrokeRect { .. }));
    assert!(matches!(
        commands[11],
        DrawCommand::FillPolygon { color, .. } if color == palette.human
    ));
    assert!(matches!(
        commands.last(),
        Some(DrawCommand::StrokePolygon { color, width, .. })
            if *color == palette.selection && *width == SELECTION_WIDTH
    ));
}

#[test]
fn neutral_city_has_no_flag() {
    let palette = Palette::default();
    let state = snapshot(Vec::new(), vec![city("c1", None, 1, 0)]);
    let mut frame = Frame::new();

    renderer().render(Some(&state), &SelectionState::new(), &mut frame);

    let colors = fill_colors(&frame);
    assert!(colors.contains(&palette.city_building));
    assert!(!colors.contains(&palette.unknown_owner));
    assert!(!colors.contains(&palette.human));
    assert!(!colors.contains(&palette.ai));
}

#[test]
fn health_bar_tracks_remaining_health() {
    let palette = Palette::default();
    let layout = *renderer().layout();
    let state = snapshot(
        vec![unit("u1", AI_PLAYER, UnitType::Infantry, 1, 0, 2)],
        Vec::new(),
    );
    let mut frame = Frame::new();

    renderer().render(Some(&state), &SelectionState::new(), &mut frame);

    let center = layout.hex_to_pixel(AxialCoord::new(1, 0));
    let bar = frame
        .commands()
        .iter()
        .find_map(|command| match command {
            DrawCommand::FillRect { origin, size, color } if *color == palette.health_low => {
                Some((*origin, *size))
            }
            _ => None,
        })
        .expect("health fill drawn");
    assert!(bar.0.abs_diff_eq(Vec2::new(center.x - 15.0, center.y - 30.0), 1e-3));
    assert!(bar.1.abs_diff_eq(Vec2::new(6.0, 4.0), 1e-3));
}

#[test]
fn rendering_is_idempotent() {
    let state = snapshot(
        vec![
            unit("u1", HUMAN_PLAYER, UnitType::Bomber, 0, 0, 8),
            unit("e1", AI_PLAYER, UnitType::Destroyer, 1, 0, 5),
        ],
        vec![city("c1", Some(HUMAN_PLAYER), 2, 0)],
    );
    let renderer = renderer();
    let mut first = Frame::new();
    let mut second = Frame::new();

    renderer.render(Some(&state), &SelectionState::new(), &mut first);
    renderer.render(Some(&state), &SelectionState::new(), &mut second);

    assert_eq!(first, second);
}

#[test]
fn renderer_draws_through_any_canvas() {
    struct Counter(usize);

    impl Canvas for Counter {
        fn clear(&mut self, _: Color) {
            self.0 += 1;
        }
        fn fill_polygon(&mut self, _: &[Vec2], _: Color) {
            self.0 += 1;
        }
        fn stroke_polygon(&mut self, _: &[Vec2], _: Color, _: f32) {
            self.0 += 1;
        }
        fn fill_rect(&mut self, _: Vec2, _: Vec2, _: Color) {
            self.0 += 1;
        }
        fn stroke_rect(&mut self, _: Vec2, _: Vec2, _: Color, _: f32) {
            self.0 += 1;
        }
    }

    let state = snapshot(Vec::new(), Vec::new());
    let mut counter = Counter(0);
    renderer().render(Some(&state), &SelectionState::new(), &mut counter);

    assert_eq!(counter.0, 7);
}

#[test]
fn hud_describes_turn_and_selected_city() {
    let state = snapshot(Vec::new(), vec![city("c1", None, 1, 0)]);
    let mut selection = SelectionState::new();
    selection.select_city(state.cities[0].clone());

    let hud = Hud::compose(Some(&state), &selection);

    assert_eq!(hud.status, vec!["Turn: 4", "Player: HUMAN", "Resources: 175"]);
    assert_eq!(
        hud.details,
        vec!["City c1", "Owner: Neutral", "Production: tank (20/100)"]
    );
    assert!(hud.city_selected);
    assert!(!hud.unit_selected);
    assert!(hud.banner.is_none());
}

#[test]
fn hud_reports_defeat_when_ai_wins() {
    let mut state = snapshot(Vec::new(), Vec::new());
    state.game_over = true;
    state.winner = Some(PlayerId::new(AI_PLAYER));

    let hud = Hud::compose(Some(&state), &SelectionState::new());

    assert_eq!(hud.banner, Some(Banner::Defeat));
    assert_eq!(Banner::Defeat.title(), "DEFEAT");
}
