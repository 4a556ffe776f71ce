use conquest_core::{HighlightKind, PlayerId, Terrain, AI_PLAYER, HUMAN_PLAYER};

use crate::Color;

/// Colors used by [`crate::HexRenderer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Frame clear color.
    pub background: Color,
    /// Outline drawn around every hex.
    pub grid_line: Color,
    /// Water hexes.
    pub water: Color,
    /// Land hexes.
    pub land: Color,
    /// Forest hexes.
    pub forest: Color,
    /// Mountain hexes.
    pub mountain: Color,
    /// Outline of reachable hexes.
    pub move_highlight: Color,
    /// Outline of attackable hexes.
    pub attack_highlight: Color,
    /// Outline of the selected hex.
    pub selection: Color,
    /// Human seat.
    pub human: Color,
    /// Computer seat.
    pub ai: Color,
    /// Any other seat.
    pub unknown_owner: Color,
    /// Body of a city.
    pub city_building: Color,
    /// Outline of a city.
    pub city_border: Color,
    /// Outline of a unit glyph.
    pub glyph_border: Color,
    /// Health bar backdrop.
    pub health_background: Color,
    /// Health bar outline.
    pub health_border: Color,
    /// Health above one half.
    pub health_high: Color,
    /// Health above one quarter.
    pub health_mid: Color,
    /// Health at or below one quarter.
    pub health_low: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0x00, 0x00, 0x00),
            grid_line: Color::from_rgb_u8(0x4a, 0x4a, 0x4a),
            water: Color::from_rgb_u8(0x00, 0x80, 0xFF),
            land: Color::from_rgb_u8(0x00, 0xFF, 0x00),
            forest: Color::from_rgb_u8(0x00, 0x88, 0x00),
            mountain: Color::from_rgb_u8(0xA0, 0xA0, 0xA0),
            move_highlight: Color::from_rgb_u8(0x00, 0xFF, 0x00),
            attack_highlight: Color::from_rgb_u8(0xFF, 0x00, 0x00),
            selection: Color::from_rgb_u8(0xFF, 0xFF, 0x00),
            human: Color::from_rgb_u8(0x00, 0x00, 0xFF),
            ai: Color::from_rgb_u8(0xFF, 0x00, 0x00),
            unknown_owner: Color::from_rgb_u8(0x80, 0x80, 0x80),
            city_building: Color::from_rgb_u8(0xFF, 0xFF, 0x00),
            city_border: Color::from_rgb_u8(0x00, 0x00, 0x00),
            glyph_border: Color::from_rgb_u8(0xFF, 0xFF, 0xFF),
            health_background: Color::from_rgb_u8(0x00, 0x00, 0x00),
            health_border: Color::from_rgb_u8(0xFF, 0xFF, 0xFF),
            health_high: Color::from_rgb_u8(0x00, 0xFF, 0x00),
            health_mid: Color::from_rgb_u8(0xFF, 0xFF, 0x00),
            health_low: Color::from_rgb_u8(0xFF, 0x00, 0x00),
        }
    }
}

impl Palette {
    /// Fill color of a terrain type.
    #[must_use]
    pub const fn terrain(&self, terrain: Terrain) -> Color {
        match terrain {
            Terrain::Water => self.water,
            Terrain::Land => self.land,
            Terrain::Forest => self.forest,
            Terrain::Mountain => self.mountain,
        }
    }

    /// Outline color of a highlight.
    #[must_use]
    pub const fn highlight(&self, kind: HighlightKind) -> Color {
        match kind {
            HighlightKind::Move => self.move_highlight,
            HighlightKind::Attack => self.attack_highlight,
        }
    }

    /// Color identifying a seat.
    #[must_use]
    pub fn owner(&self, owner: &PlayerId) -> Color {
        match owner.as_str() {
            HUMAN_PLAYER => self.human,
            AI_PLAYER => self.ai,
            _ => self.unknown_owner,
        }
    }

    /// Health bar fill for a health ratio in `0.0..=1.0`.
    #[must_use]
    pub fn health(&self, ratio: f32) -> Color {
        if ratio > 0.5 {
            self.health_high
        } else if ratio > 0.25 {
            self.health_mid
        } else {
            self.health_low
        }
    }
}
