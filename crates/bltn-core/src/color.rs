#![forbid(unsafe_code)]

//! Packed RGBA colour used for the activity indicator and card background.

use core::fmt;

/// A colour packed as `0xRRGGBBAA`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Rgba(u32);

impl Rgba {
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Default tint of the activity indicator.
    pub const SYSTEM_GRAY: Self = Self::rgb(142, 142, 147);

    /// Opaque colour from red, green, and blue channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    /// Build from a raw `0xRRGGBBAA` value.
    #[must_use]
    pub const fn from_packed(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn packed(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[must_use]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[must_use]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Replace the alpha channel.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self((self.0 & 0xFFFF_FF00) | a as u32)
    }

    /// Scale the alpha channel by `opacity` (clamped to `[0.0, 1.0]`).
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
        let a = (f32::from(self.a()) * opacity).round() as u8;
        self.with_alpha(a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgba(#{:08x})", self.0)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip_through_packing() {
        let c = Rgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
        assert_eq!(c.packed(), 0x0102_0304);
        assert_eq!(Rgba::from_packed(0x0102_0304), c);
    }

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Rgba::rgb(9, 9, 9).a(), 255);
        assert_eq!(Rgba::TRANSPARENT.a(), 0);
    }

    #[test]
    fn with_opacity_scales_alpha() {
        let c = Rgba::WHITE.with_opacity(0.5);
        assert_eq!(c.a(), 128);
        assert_eq!(c.r(), 255);
        assert_eq!(Rgba::WHITE.with_opacity(2.0).a(), 255);
        assert_eq!(Rgba::WHITE.with_opacity(-1.0).a(), 0);
        assert_eq!(Rgba::WHITE.with_opacity(f32::NAN).a(), 0);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Rgba::rgb(255, 0, 16).to_string(), "#ff0010ff");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_packed_value() {
        let json = serde_json::to_string(&Rgba::rgba(0, 0, 1, 2)).unwrap();
        assert_eq!(json, "258");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::rgba(0, 0, 1, 2));
    }
}
