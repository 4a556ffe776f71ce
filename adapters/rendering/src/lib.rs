#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Strategic Conquest adapters.
//!
//! Drawing is expressed against the [`Canvas`] trait. [`HexRenderer`] paints
//! a snapshot and selection onto any canvas, and [`Frame`] records the calls
//! so backends can replay them and tests can compare them.

mod hud;
mod palette;
mod scene;
pub mod sprites;

use anyhow::Result as AnyResult;
use conquest_core::UnitType;
use glam::Vec2;

pub use hud::{Banner, Hud, HudLine};
pub use palette::Palette;
pub use scene::{
    HexRenderer, GLYPH_BORDER_WIDTH, GRID_LINE_WIDTH, HEALTH_BAR_GAP, HEALTH_BAR_SIZE,
    HIGHLIGHT_WIDTH, SELECTION_WIDTH,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Drawing primitives every backend must provide.
pub trait Canvas {
    /// Fills the whole surface.
    fn clear(&mut self, color: Color);

    /// Fills a closed polygon.
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    /// Outlines a closed polygon.
    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, width: f32);

    /// Fills an axis-aligned rectangle anchored at its top-left corner.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    /// Outlines an axis-aligned rectangle anchored at its top-left corner.
    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, color: Color, width: f32);
}

/// Single recorded drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// See [`Canvas::clear`].
    Clear {
        /// Fill color.
        color: Color,
    },
    /// See [`Canvas::fill_polygon`].
    FillPolygon {
        /// Polygon corners in drawing order.
        points: Vec<Vec2>,
        /// Fill color.
        color: Color,
    },
    /// See [`Canvas::stroke_polygon`].
    StrokePolygon {
        /// Polygon corners in drawing order.
        points: Vec<Vec2>,
        /// Line color.
        color: Color,
        /// Line width in pixels.
        width: f32,
    },
    /// See [`Canvas::fill_rect`].
    FillRect {
        /// Top-left corner.
        origin: Vec2,
        /// Width and height.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
    /// See [`Canvas::stroke_rect`].
    StrokeRect {
        /// Top-left corner.
        origin: Vec2,
        /// Width and height.
        size: Vec2,
        /// Line color.
        color: Color,
        /// Line width in pixels.
        width: f32,
    },
}

/// Canvas that records primitives in call order.
///
/// Two frames compare equal exactly when they would produce the same pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    commands: Vec<DrawCommand>,
}

impl Frame {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded primitives in drawing order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops every recorded primitive while keeping the allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Replays the recorded primitives onto another canvas.
    pub fn replay<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear { color } => canvas.clear(*color),
                DrawCommand::FillPolygon { points, color } => canvas.fill_polygon(points, *color),
                DrawCommand::StrokePolygon {
                    points,
                    color,
                    width,
                } => canvas.stroke_polygon(points, *color, *width),
                DrawCommand::FillRect {
                    origin,
                    size,
                    color,
                } => canvas.fill_rect(*origin, *size, *color),
                DrawCommand::StrokeRect {
                    origin,
                    size,
                    color,
                    width,
                } => canvas.stroke_rect(*origin, *size, *color, *width),
            }
        }
    }
}

impl Canvas for Frame {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            size,
            color,
        });
    }

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            origin,
            size,
            color,
            width,
        });
    }
}

/// Player action triggered through the control panel or a keyboard shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiAction {
    /// Start a new game.
    NewGame,
    /// End the current turn.
    EndTurn,
    /// Arm the selected unit for a move.
    ArmMove,
    /// Arm the selected unit for an attack.
    ArmAttack,
    /// Drop the selection.
    Deselect,
    /// Re-read the server state.
    Refresh,
    /// Save the game.
    Save,
    /// Load the most recent save.
    LoadLastSave,
    /// Build a unit in the selected city.
    Produce(UnitType),
}

/// Input snapshot gathered by adapters before composing a frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Size of the drawable area in pixels.
    pub viewport: Vec2,
    /// Primary click on the map area, in screen pixels.
    pub click: Option<Vec2>,
    /// Panel buttons and shortcuts triggered on this frame, in order.
    pub actions: Vec<UiAction>,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Requested window size in pixels.
    pub window_size: Vec2,
    /// Whether presentation waits for vertical sync.
    pub vsync: bool,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, window_size: Vec2, vsync: bool) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_size,
            vsync,
        }
    }
}

/// Rendering backend capable of presenting Strategic Conquest frames.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// Each frame the backend gathers [`FrameInput`], hands it to `update`
    /// together with a cleared [`Frame`] and [`Hud`] to fill, and then
    /// presents both.
    fn run<F>(self, presentation: Presentation, update: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Frame, &mut Hud) + 'static;
}
