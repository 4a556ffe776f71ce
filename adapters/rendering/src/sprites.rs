//! Geometry of unit and city glyphs.
//!
//! Every glyph is expressed in screen pixels around a hex centre and scales
//! with the hex size, so glyphs stay inside their hex at any zoom.

use conquest_core::UnitType;
use glam::Vec2;

/// Unit glyph extent relative to the hex size.
pub const SYMBOL_SCALE: f32 = 0.6;

/// City building extent relative to the hex size.
pub const CITY_SCALE: f32 = 0.8;

/// Bombers are drawn larger than fighters by this factor.
pub const BOMBER_SCALE: f32 = 1.2;

/// Outline polygon of a unit glyph centred on `center`.
#[must_use]
pub fn unit_glyph(kind: UnitType, center: Vec2, hex_size: f32) -> Vec<Vec2> {
    let half = hex_size * SYMBOL_SCALE / 2.0;
    let points = match kind {
        UnitType::Infantry => vec![
            Vec2::new(0.0, -half),
            Vec2::new(-half, half),
            Vec2::new(half, half),
        ],
        UnitType::Tank => vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ],
        UnitType::Fighter => diamond(half),
        UnitType::Bomber => diamond(half * BOMBER_SCALE),
        UnitType::Transport | UnitType::Destroyer => {
            let deck = hex_size * SYMBOL_SCALE / 3.0;
            vec![
                Vec2::new(-deck, -half),
                Vec2::new(deck, -half),
                Vec2::new(half, half),
                Vec2::new(-half, half),
            ]
        }
    };
    points.into_iter().map(|point| center + point).collect()
}

fn diamond(half: f32) -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, -half),
        Vec2::new(half, 0.0),
        Vec2::new(0.0, half),
        Vec2::new(-half, 0.0),
    ]
}

/// Rectangles making up a city glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityGlyph {
    /// Top-left corner of the building.
    pub building_origin: Vec2,
    /// Size of the building.
    pub building_size: Vec2,
    /// Top-left corner of the owner flag.
    pub flag_origin: Vec2,
    /// Size of the owner flag.
    pub flag_size: Vec2,
}

/// Lays out a city glyph centred on `center`.
///
/// The flag sits above the building and is only drawn for owned cities.
#[must_use]
pub fn city_glyph(center: Vec2, hex_size: f32) -> CityGlyph {
    let building = hex_size * CITY_SCALE;
    CityGlyph {
        building_origin: center - Vec2::splat(building / 2.0),
        building_size: Vec2::splat(building),
        flag_origin: center + Vec2::new(-building / 4.0, -building * 0.7),
        flag_size: Vec2::new(building / 2.0, building / 4.0),
    }
}

/// Fraction of health left, clamped to `0.0..=1.0`.
///
/// A unit without a health pool reports an empty bar.
#[must_use]
pub fn health_ratio(health: u32, max_health: u32) -> f32 {
    if max_health == 0 {
        return 0.0;
    }
    (health as f32 / max_health as f32).clamp(0.0, 1.0)
}
