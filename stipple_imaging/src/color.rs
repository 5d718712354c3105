// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packed 32-bit colors and premultiplication helpers.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A packed, unpremultiplied 32-bit color in `0xAARRGGBB` order.
///
/// Alpha occupies the most significant byte, followed by red, green, and
/// blue. This is the only color layout accepted at the call boundary.
///
/// ```
/// use stipple_imaging::Argb;
///
/// let red = Argb::from_argb(0xFF, 0xFF, 0, 0);
/// assert_eq!(red, Argb::RED);
/// assert_eq!(red.0, 0xFFFF_0000);
/// assert_eq!(red.to_rgba8(), [0xFF, 0, 0, 0xFF]);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    /// Opaque red.
    pub const RED: Self = Self(0xFFFF_0000);
    /// Opaque green.
    pub const GREEN: Self = Self(0xFF00_FF00);
    /// Opaque blue.
    pub const BLUE: Self = Self(0xFF00_00FF);
    /// Opaque yellow.
    pub const YELLOW: Self = Self(0xFFFF_FF00);
    /// Opaque cyan.
    pub const CYAN: Self = Self(0xFF00_FFFF);
    /// Opaque magenta.
    pub const MAGENTA: Self = Self(0xFFFF_00FF);

    /// Pack four 8-bit channels.
    #[inline]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(u32::from_be_bytes([a, r, g, b]))
    }

    /// Pack 8-bit color channels with a unit-range alpha.
    #[inline]
    pub fn from_rgb_alpha(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self::from_argb(unit_to_u8(alpha), r, g, b)
    }

    /// Alpha channel.
    #[inline]
    pub const fn alpha(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// Red channel.
    #[inline]
    pub const fn red(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    /// Green channel.
    #[inline]
    pub const fn green(self) -> u8 {
        self.0.to_be_bytes()[2]
    }

    /// Blue channel.
    #[inline]
    pub const fn blue(self) -> u8 {
        self.0.to_be_bytes()[3]
    }

    /// Replace the alpha channel.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        let [_, r, g, b] = self.0.to_be_bytes();
        Self::from_argb(a, r, g, b)
    }

    /// Channels in `[r, g, b, a]` byte order, unpremultiplied.
    #[inline]
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }

    /// Build from `[r, g, b, a]` bytes.
    #[inline]
    pub const fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::from_argb(rgba[3], rgba[0], rgba[1], rgba[2])
    }

    /// Convert to a peniko color, scaling alpha by `alpha`.
    #[inline]
    pub fn to_peniko(self, alpha: f32) -> peniko::Color {
        peniko::Color::from_rgba8(self.red(), self.green(), self.blue(), self.alpha())
            .multiply_alpha(alpha.clamp(0.0, 1.0))
    }
}

impl From<u32> for Argb {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Convert a normalized value in `[0, 1]` into an 8-bit channel, clamping
/// to the valid range.
#[allow(
    clippy::cast_possible_truncation,
    reason = "value is explicitly clamped to [0, 255] before casting"
)]
#[inline]
pub fn unit_to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "result of the rounded division is at most 255"
)]
#[inline]
fn mul_div_255(c: u8, a: u8) -> u8 {
    ((u32::from(c) * u32::from(a) + 127) / 255) as u8
}

/// Premultiply an `[r, g, b, a]` pixel.
#[inline]
pub fn premultiply(rgba: [u8; 4]) -> [u8; 4] {
    let a = rgba[3];
    match a {
        255 => rgba,
        0 => [0, 0, 0, 0],
        _ => [
            mul_div_255(rgba[0], a),
            mul_div_255(rgba[1], a),
            mul_div_255(rgba[2], a),
            a,
        ],
    }
}

/// Undo premultiplication of an `[r, g, b, a]` pixel.
///
/// Channels larger than alpha (invalid premultiplied input) saturate.
#[allow(
    clippy::cast_possible_truncation,
    reason = "value is clamped to 255 before casting"
)]
#[inline]
pub fn unpremultiply(rgba: [u8; 4]) -> [u8; 4] {
    let a = rgba[3];
    match a {
        255 => rgba,
        0 => [0, 0, 0, 0],
        _ => {
            let a32 = u32::from(a);
            let un = |c: u8| ((u32::from(c) * 255 + a32 / 2) / a32).min(255) as u8;
            [un(rgba[0]), un(rgba[1]), un(rgba[2]), a]
        }
    }
}
