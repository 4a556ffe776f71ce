#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Strategic Conquest.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The map is painted by replaying the [`Frame`] filled by the caller onto a
//! macroquad-backed [`Canvas`]. The control panel lives in the local `ui`
//! module so Macroquad UI types do not leak into the rest of the adapter.

mod ui;

use self::ui::{draw_control_panel_ui, to_macroquad_color, ControlPanelUiContext};
use anyhow::Result;
use conquest_rendering::{
    Banner, Canvas, Color, Frame, FrameInput, Hud, HudLine, Presentation, RenderingBackend,
    UiAction,
};
use glam::Vec2;
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};

/// Default width of the control panel docked to the right edge of the window.
pub const DEFAULT_PANEL_WIDTH: f32 = 240.0;

/// Number of log lines kept on screen.
const VISIBLE_LOG_LINES: usize = 8;
const LOG_FONT_SIZE: f32 = 18.0;
const LOG_LINE_HEIGHT: f32 = 20.0;
const BANNER_SIZE: Vec2 = Vec2::new(520.0, 140.0);

const KEY_BINDINGS: [(KeyCode, UiAction); 8] = [
    (KeyCode::N, UiAction::NewGame),
    (KeyCode::Enter, UiAction::EndTurn),
    (KeyCode::M, UiAction::ArmMove),
    (KeyCode::A, UiAction::ArmAttack),
    (KeyCode::Escape, UiAction::Deselect),
    (KeyCode::R, UiAction::Refresh),
    (KeyCode::S, UiAction::Save),
    (KeyCode::L, UiAction::LoadLastSave),
];

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct ControlPanelInputState {
    latched: Vec<UiAction>,
}

impl ControlPanelInputState {
    /// Returns the latched button presses in press order and clears the latch
    /// so every press fires only once.
    pub fn take_actions(&mut self) -> Vec<UiAction> {
        std::mem::take(&mut self.latched)
    }

    /// Records that a control-panel button was pressed this frame.
    pub fn register(&mut self, action: UiAction) {
        self.latched.push(action);
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` quits the window loop.
    quit_requested: bool,
    /// Bound actions in binding order.
    actions: Vec<UiAction>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Q);
        let actions = KEY_BINDINGS
            .iter()
            .filter(|(key, _)| is_key_pressed(*key))
            .map(|(_, action)| *action)
            .collect();

        Self {
            quit_requested,
            actions,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug)]
pub struct MacroquadBackend {
    panel_width: f32,
    panel_background: Color,
    button: Color,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            panel_width: DEFAULT_PANEL_WIDTH,
            panel_background: Color::from_rgb_u8(0x2a, 0x2a, 0x2a),
            button: Color::from_rgb_u8(70, 70, 70),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend with the default panel width and colours.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Swap interval requested from the platform for the presentation's vsync flag.
fn swap_interval(vsync: bool) -> i32 {
    i32::from(vsync)
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Frame, &mut Hud) + 'static,
    {
        let Self {
            panel_width,
            panel_background,
            button,
        } = self;

        let Presentation {
            window_title,
            window_size,
            vsync,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.x.round() as i32,
            window_height: window_size.y.round() as i32,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        config.platform.swap_interval = Some(swap_interval(vsync));

        macroquad::Window::from_config(config, async move {
            let mut control_panel_input = ControlPanelInputState::default();
            let mut frame = Frame::new();
            let mut canvas = MacroquadCanvas;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = gather_frame_input_from_observations(
                    screen,
                    panel_width,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_pressed(MouseButton::Left),
                    control_panel_input.take_actions(),
                    keyboard.actions,
                );
                let viewport = frame_input.viewport;

                frame.reset();
                let mut hud = Hud::default();
                update(frame_input, &mut frame, &mut hud);

                frame.replay(&mut canvas);
                draw_log(&hud.log, viewport);
                if let Some(banner) = hud.banner {
                    draw_banner(banner, viewport);
                }

                if panel_width > f32::EPSILON {
                    let background = to_macroquad_color(panel_background);
                    macroquad::shapes::draw_rectangle(
                        viewport.x,
                        0.0,
                        panel_width,
                        screen.y,
                        background,
                    );
                    let mut control_panel_ui = macroquad::ui::root_ui();
                    let pressed = draw_control_panel_ui(
                        &mut control_panel_ui,
                        ControlPanelUiContext {
                            origin: MacroquadVec2::new(viewport.x, 0.0),
                            size: MacroquadVec2::new(panel_width, screen.y),
                            background,
                            button,
                            hud: &hud,
                        },
                    );
                    for action in pressed {
                        control_panel_input.register(action);
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn gather_frame_input_from_observations(
    screen: Vec2,
    panel_width: f32,
    cursor: Vec2,
    clicked: bool,
    panel_actions: Vec<UiAction>,
    keyboard_actions: Vec<UiAction>,
) -> FrameInput {
    let viewport = Vec2::new((screen.x - panel_width).max(0.0), screen.y);
    let over_map = cursor.x >= 0.0
        && cursor.y >= 0.0
        && cursor.x < viewport.x
        && cursor.y < viewport.y;

    let mut actions = panel_actions;
    actions.extend(keyboard_actions);

    FrameInput {
        viewport,
        click: (clicked && over_map).then_some(cursor),
        actions,
    }
}

/// Canvas that draws straight into the current macroquad frame.
#[derive(Clone, Copy, Debug, Default)]
struct MacroquadCanvas;

impl Canvas for MacroquadCanvas {
    fn clear(&mut self, color: Color) {
        macroquad::window::clear_background(to_macroquad_color(color));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let color = to_macroquad_color(color);
        for [a, b, c] in fan_triangles(points) {
            macroquad::shapes::draw_triangle(to_mq(a), to_mq(b), to_mq(c), color);
        }
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, width: f32) {
        if points.len() < 2 {
            return;
        }
        let color = to_macroquad_color(color);
        for (index, start) in points.iter().enumerate() {
            let end = points[(index + 1) % points.len()];
            macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, width, color);
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            size.x,
            size.y,
            to_macroquad_color(color),
        );
    }

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, color: Color, width: f32) {
        macroquad::shapes::draw_rectangle_lines(
            origin.x,
            origin.y,
            size.x,
            size.y,
            width,
            to_macroquad_color(color),
        );
    }
}

/// Splits a convex polygon into triangles sharing its first corner.
fn fan_triangles(points: &[Vec2]) -> Vec<[Vec2; 3]> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    rest.windows(2)
        .map(|pair| [first, pair[0], pair[1]])
        .collect()
}

fn to_mq(point: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(point.x, point.y)
}

fn draw_log(lines: &[HudLine], viewport: Vec2) {
    let visible = &lines[lines.len().saturating_sub(VISIBLE_LOG_LINES)..];
    if visible.is_empty() {
        return;
    }

    let height = visible.len() as f32 * LOG_LINE_HEIGHT + 8.0;
    let top = viewport.y - height;
    macroquad::shapes::draw_rectangle(
        0.0,
        top,
        viewport.x,
        height,
        macroquad::color::Color::new(0.0, 0.0, 0.0, 0.6),
    );
    for (row, line) in visible.iter().enumerate() {
        let baseline = top + (row as f32 + 1.0) * LOG_LINE_HEIGHT;
        let _ = macroquad::text::draw_text(
            &line.text,
            8.0,
            baseline,
            LOG_FONT_SIZE,
            to_macroquad_color(line.color),
        );
    }
}

fn draw_banner(banner: Banner, viewport: Vec2) {
    let origin = (viewport - BANNER_SIZE) / 2.0;
    let accent = match banner {
        Banner::Victory => macroquad::color::GOLD,
        Banner::Defeat => macroquad::color::RED,
    };
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        BANNER_SIZE.x,
        BANNER_SIZE.y,
        macroquad::color::Color::new(0.0, 0.0, 0.0, 0.85),
    );
    macroquad::shapes::draw_rectangle_lines(
        origin.x,
        origin.y,
        BANNER_SIZE.x,
        BANNER_SIZE.y,
        3.0,
        accent,
    );
    draw_centered_text(banner.title(), origin.y + 60.0, 48, viewport.x, accent);
    draw_centered_text(
        banner.message(),
        origin.y + 105.0,
        20,
        viewport.x,
        macroquad::color::WHITE,
    );
}

fn draw_centered_text(
    text: &str,
    baseline: f32,
    font_size: u16,
    width: f32,
    color: macroquad::color::Color,
) {
    let dimensions = macroquad::text::measure_text(text, None, font_size, 1.0);
    let _ = macroquad::text::draw_text(
        text,
        (width - dimensions.width) / 2.0,
        baseline,
        f32::from(font_size),
        color,
    );
}
