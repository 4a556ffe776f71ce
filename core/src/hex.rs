//! Axial hex coordinates and the pixel layout that presents them on screen.
//!
//! Hexes are pointy-top and addressed with axial `(q, r)` pairs; the third
//! cube component `s = -q - r` is implicit. [`HexLayout`] owns the affine
//! transform between axial space and screen pixels, and [`FractionalHex`]
//! carries the cube-rounding rule used when a pixel is mapped back onto the
//! grid.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

const SQRT_3: f32 = 1.732_050_8;

/// Offsets of the six neighbours surrounding any axial coordinate.
const NEIGHBOR_OFFSETS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Integer position of a hex on the grid expressed in axial coordinates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AxialCoord {
    q: i32,
    r: i32,
}

impl AxialCoord {
    /// Creates a new axial coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Column-like axial component.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Row-like axial component.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Implicit third cube component, always `-q - r`.
    #[must_use]
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Computes the grid-native hex distance between two coordinates.
    ///
    /// This is `(|dq| + |dq + dr| + |dr|) / 2`, the number of single-hex
    /// steps separating the two positions.
    #[must_use]
    pub fn distance(self, other: AxialCoord) -> u32 {
        let dq = i64::from(self.q) - i64::from(other.q);
        let dr = i64::from(self.r) - i64::from(other.r);
        let steps = (dq.unsigned_abs() + (dq + dr).unsigned_abs() + dr.unsigned_abs()) / 2;
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// Lists the six coordinates adjacent to this one.
    #[must_use]
    pub fn neighbors(self) -> [AxialCoord; 6] {
        NEIGHBOR_OFFSETS.map(|(dq, dr)| {
            AxialCoord::new(self.q.saturating_add(dq), self.r.saturating_add(dr))
        })
    }
}

/// Serde adapter encoding an [`AxialCoord`] as a `[q, r]` pair.
///
/// Unit and city positions travel in this form, while map hexes carry `q` and
/// `r` as named fields.
pub mod axial_pair {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::AxialCoord;

    /// Serializes the coordinate as a two-element sequence.
    pub fn serialize<S>(coord: &AxialCoord, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (coord.q(), coord.r()).serialize(serializer)
    }

    /// Deserializes a coordinate from a two-element sequence.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<AxialCoord, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (q, r) = <(i32, i32)>::deserialize(deserializer)?;
        Ok(AxialCoord::new(q, r))
    }
}

/// Fractional axial position produced by inverting the pixel transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractionalHex {
    /// Fractional `q` component.
    pub q: f32,
    /// Fractional `r` component.
    pub r: f32,
}

impl FractionalHex {
    /// Creates a new fractional hex position.
    #[must_use]
    pub const fn new(q: f32, r: f32) -> Self {
        Self { q, r }
    }

    /// Implicit fractional `s` component.
    #[must_use]
    pub fn s(&self) -> f32 {
        -self.q - self.r
    }

    /// Rounds to the containing hex using cube rounding.
    ///
    /// Each cube component is rounded independently. The component that moved
    /// furthest while rounding is then recomputed from the other two so the
    /// result always satisfies `q + r + s == 0`.
    #[must_use]
    pub fn round(self) -> AxialCoord {
        let s = self.s();

        let mut rounded_q = self.q.round();
        let mut rounded_r = self.r.round();
        let rounded_s = s.round();

        let q_diff = (rounded_q - self.q).abs();
        let r_diff = (rounded_r - self.r).abs();
        let s_diff = (rounded_s - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rounded_q = -rounded_r - rounded_s;
        } else if r_diff > s_diff {
            rounded_r = -rounded_q - rounded_s;
        }

        AxialCoord::new(rounded_q as i32, rounded_r as i32)
    }
}

/// Affine layout mapping axial coordinates onto screen pixels.
///
/// The grid origin sits at the centre of the viewport shifted by `offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexLayout {
    hex_size: f32,
    offset: Vec2,
    viewport: Vec2,
}

impl Default for HexLayout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HEX_SIZE, Self::DEFAULT_OFFSET, Vec2::ZERO)
    }
}

impl HexLayout {
    /// Distance from a hex centre to any of its corners, in pixels.
    pub const DEFAULT_HEX_SIZE: f32 = 25.0;

    /// Translation applied on top of the viewport centre.
    pub const DEFAULT_OFFSET: Vec2 = Vec2::new(50.0, 50.0);

    /// Creates a layout with an explicit hex size, offset and viewport size.
    #[must_use]
    pub const fn new(hex_size: f32, offset: Vec2, viewport: Vec2) -> Self {
        Self {
            hex_size,
            offset,
            viewport,
        }
    }

    /// Returns a copy of the layout sized for a different viewport.
    #[must_use]
    pub const fn with_viewport(mut self, viewport: Vec2) -> Self {
        self.viewport = viewport;
        self
    }

    /// Updates the viewport dimensions in place.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Corner radius of a single hex in pixels.
    #[must_use]
    pub const fn hex_size(&self) -> f32 {
        self.hex_size
    }

    /// Translation applied on top of the viewport centre.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Width and height of the drawing surface.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Pixel position of the axial origin.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.offset + self.viewport * 0.5
    }

    /// Projects an axial coordinate onto the centre of its hex in pixels.
    #[must_use]
    pub fn hex_to_pixel(&self, coord: AxialCoord) -> Vec2 {
        let q = coord.q() as f32;
        let r = coord.r() as f32;
        let x = self.hex_size * (1.5 * q);
        let y = self.hex_size * (SQRT_3 / 2.0 * q + SQRT_3 * r);
        Vec2::new(x, y) + self.origin()
    }

    /// Inverts [`Self::hex_to_pixel`] without rounding.
    #[must_use]
    pub fn pixel_to_fractional(&self, point: Vec2) -> FractionalHex {
        let size = self.hex_size.max(f32::EPSILON);
        let relative = point - self.origin();
        let q = (2.0 / 3.0 * relative.x) / size;
        let r = (-1.0 / 3.0 * relative.x + SQRT_3 / 3.0 * relative.y) / size;
        FractionalHex::new(q, r)
    }

    /// Maps a pixel onto the hex that contains it.
    #[must_use]
    pub fn pixel_to_hex(&self, point: Vec2) -> AxialCoord {
        self.pixel_to_fractional(point).round()
    }

    /// Corner points of the hex drawn at the provided coordinate.
    #[must_use]
    pub fn corners(&self, coord: AxialCoord) -> [Vec2; 6] {
        hex_corners(self.hex_to_pixel(coord), self.hex_size)
    }
}

/// Corner points of a pointy-top hexagon centred on `center`.
///
/// The first corner points straight up and the rest follow clockwise in
/// screen space.
#[must_use]
pub fn hex_corners(center: Vec2, size: f32) -> [Vec2; 6] {
    std::array::from_fn(|index| {
        let angle = PI / 3.0 * index as f32 - PI / 2.0;
        Vec2::new(center.x + size * angle.cos(), center.y + size * angle.sin())
    })
}
