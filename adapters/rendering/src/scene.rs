use conquest_core::{City, GameSnapshot, HexLayout, SelectionState, Unit};
use glam::Vec2;

use crate::{sprites, Canvas, Palette};

/// Width of the outline drawn around every hex.
pub const GRID_LINE_WIDTH: f32 = 1.0;

/// Width of move and attack highlight outlines.
pub const HIGHLIGHT_WIDTH: f32 = 3.0;

/// Width of the selected hex outline.
pub const SELECTION_WIDTH: f32 = 4.0;

/// Width of the white outline around unit glyphs and city borders.
pub const GLYPH_BORDER_WIDTH: f32 = 2.0;

/// Size of the health bar drawn above every unit.
pub const HEALTH_BAR_SIZE: Vec2 = Vec2::new(30.0, 4.0);

/// Distance between the top of a hex and its health bar.
pub const HEALTH_BAR_GAP: f32 = 5.0;

const HEALTH_BAR_BORDER_WIDTH: f32 = 1.0;

/// Paints a full picture of the map from a snapshot and the local selection.
///
/// Rendering holds no state between calls. Layers are painted back to front:
/// terrain, highlights, cities, units with health bars, then the selection
/// outline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HexRenderer {
    layout: HexLayout,
    palette: Palette,
}

impl HexRenderer {
    /// Creates a renderer with an explicit layout and palette.
    #[must_use]
    pub const fn new(layout: HexLayout, palette: Palette) -> Self {
        Self { layout, palette }
    }

    /// Layout used to place hexes.
    #[must_use]
    pub const fn layout(&self) -> &HexLayout {
        &self.layout
    }

    /// Repaints the whole canvas.
    ///
    /// Without a snapshot only the background is cleared.
    pub fn render<C: Canvas + ?Sized>(
        &self,
        snapshot: Option<&GameSnapshot>,
        selection: &SelectionState,
        canvas: &mut C,
    ) {
        canvas.clear(self.palette.background);
        let Some(snapshot) = snapshot else {
            return;
        };

        for hex in &snapshot.map.hexes {
            let corners = self.layout.corners(hex.coord);
            canvas.fill_polygon(&corners, self.palette.terrain(hex.terrain));
            canvas.stroke_polygon(&corners, self.palette.grid_line, GRID_LINE_WIDTH);
        }

        for highlight in selection.highlighted() {
            let corners = self.layout.corners(highlight.coord);
            canvas.stroke_polygon(
                &corners,
                self.palette.highlight(highlight.kind),
                HIGHLIGHT_WIDTH,
            );
        }

        for city in &snapshot.cities {
            self.draw_city(city, canvas);
        }

        for unit in &snapshot.units {
            self.draw_unit(unit, canvas);
        }

        if let Some(coord) = selection.selected_hex() {
            let corners = self.layout.corners(coord);
            canvas.stroke_polygon(&corners, self.palette.selection, SELECTION_WIDTH);
        }
    }

    fn draw_city<C: Canvas + ?Sized>(&self, city: &City, canvas: &mut C) {
        let center = self.layout.hex_to_pixel(city.position);
        let glyph = sprites::city_glyph(center, self.layout.hex_size());

        canvas.fill_rect(
            glyph.building_origin,
            glyph.building_size,
            self.palette.city_building,
        );
        if let Some(owner) = &city.owner {
            canvas.fill_rect(glyph.flag_origin, glyph.flag_size, self.palette.owner(owner));
        }
        canvas.stroke_rect(
            glyph.building_origin,
            glyph.building_size,
            self.palette.city_border,
            GLYPH_BORDER_WIDTH,
        );
    }

    fn draw_unit<C: Canvas + ?Sized>(&self, unit: &Unit, canvas: &mut C) {
        let center = self.layout.hex_to_pixel(unit.position);
        let glyph = sprites::unit_glyph(unit.kind, center, self.layout.hex_size());
        canvas.fill_polygon(&glyph, self.palette.owner(&unit.owner));
        canvas.stroke_polygon(&glyph, self.palette.glyph_border, GLYPH_BORDER_WIDTH);

        let origin = Vec2::new(
            center.x - HEALTH_BAR_SIZE.x / 2.0,
            center.y - self.layout.hex_size() - HEALTH_BAR_GAP,
        );
        let ratio = sprites::health_ratio(unit.health, unit.stats.max_health);
        canvas.fill_rect(origin, HEALTH_BAR_SIZE, self.palette.health_background);
        canvas.fill_rect(
            origin,
            Vec2::new(HEALTH_BAR_SIZE.x * ratio, HEALTH_BAR_SIZE.y),
            self.palette.health(ratio),
        );
        canvas.stroke_rect(
            origin,
            HEALTH_BAR_SIZE,
            self.palette.health_border,
            HEALTH_BAR_BORDER_WIDTH,
        );
    }
}
