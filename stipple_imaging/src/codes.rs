// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enumerations with stable numeric codes.
//!
//! Every enumeration that crosses the flat call boundary is exchanged as a
//! `u32`. The codes below are part of the binary interface and must not be
//! renumbered.

use peniko::{Compose, Extend, Fill, ImageQuality, Mix};

macro_rules! numeric_codes {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $code,
            )+
        }

        impl $name {
            /// Look up a value by its numeric code.
            ///
            /// Returns `None` for codes outside the defined range.
            pub const fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// The numeric code of this value.
            pub const fn code(self) -> u32 {
                self as u32
            }
        }
    };
}

numeric_codes! {
    /// Rule deciding which regions of a path count as inside.
    #[derive(Default)]
    pub enum FillType {
        /// Non-zero winding.
        #[default]
        Winding = 0,
        /// Even-odd parity.
        EvenOdd = 1,
        /// Complement of [`FillType::Winding`].
        InverseWinding = 2,
        /// Complement of [`FillType::EvenOdd`].
        InverseEvenOdd = 3,
    }
}

impl FillType {
    /// Whether the fill covers the outside of the path.
    pub const fn is_inverse(self) -> bool {
        matches!(self, Self::InverseWinding | Self::InverseEvenOdd)
    }

    /// The underlying non-inverted rule.
    pub const fn to_fill(self) -> Fill {
        match self {
            Self::Winding | Self::InverseWinding => Fill::NonZero,
            Self::EvenOdd | Self::InverseEvenOdd => Fill::EvenOdd,
        }
    }
}

numeric_codes! {
    /// How geometry is turned into coverage.
    #[derive(Default)]
    pub enum PaintStyle {
        /// Fill the interior.
        #[default]
        Fill = 0,
        /// Stroke the outline.
        Stroke = 1,
        /// Fill, then stroke.
        StrokeAndFill = 2,
    }
}

numeric_codes! {
    /// Shape at the open ends of a stroked contour.
    #[derive(Default)]
    pub enum StrokeCap {
        /// Flat end at the exact end point.
        #[default]
        Butt = 0,
        /// Semicircular end.
        Round = 1,
        /// Square end extending half the stroke width.
        Square = 2,
    }
}

impl StrokeCap {
    /// Equivalent kurbo cap.
    pub const fn to_kurbo(self) -> kurbo::Cap {
        match self {
            Self::Butt => kurbo::Cap::Butt,
            Self::Round => kurbo::Cap::Round,
            Self::Square => kurbo::Cap::Square,
        }
    }
}

numeric_codes! {
    /// Shape at the corners of a stroked contour.
    #[derive(Default)]
    pub enum StrokeJoin {
        /// Sharp corner, limited by the miter limit.
        #[default]
        Miter = 0,
        /// Rounded corner.
        Round = 1,
        /// Cut-off corner.
        Bevel = 2,
    }
}

impl StrokeJoin {
    /// Equivalent kurbo join.
    pub const fn to_kurbo(self) -> kurbo::Join {
        match self {
            Self::Miter => kurbo::Join::Miter,
            Self::Round => kurbo::Join::Round,
            Self::Bevel => kurbo::Join::Bevel,
        }
    }
}

numeric_codes! {
    /// Porter-Duff and separable/non-separable blend modes.
    #[derive(Default)]
    pub enum BlendMode {
        /// Result is transparent.
        Clear = 0,
        /// Source replaces destination.
        Src = 1,
        /// Destination is kept.
        Dst = 2,
        /// Source over destination.
        #[default]
        SrcOver = 3,
        /// Destination over source.
        DstOver = 4,
        /// Source inside destination.
        SrcIn = 5,
        /// Destination inside source.
        DstIn = 6,
        /// Source outside destination.
        SrcOut = 7,
        /// Destination outside source.
        DstOut = 8,
        /// Source atop destination.
        SrcATop = 9,
        /// Destination atop source.
        DstATop = 10,
        /// Exclusive or.
        Xor = 11,
        /// Sum, clamped.
        Plus = 12,
        /// Component-wise product including alpha.
        Modulate = 13,
        /// Screen.
        Screen = 14,
        /// Overlay.
        Overlay = 15,
        /// Darken.
        Darken = 16,
        /// Lighten.
        Lighten = 17,
        /// Color dodge.
        ColorDodge = 18,
        /// Color burn.
        ColorBurn = 19,
        /// Hard light.
        HardLight = 20,
        /// Soft light.
        SoftLight = 21,
        /// Difference.
        Difference = 22,
        /// Exclusion.
        Exclusion = 23,
        /// Multiply.
        Multiply = 24,
        /// Hue of the source, saturation and luminosity of the destination.
        Hue = 25,
        /// Saturation of the source.
        Saturation = 26,
        /// Hue and saturation of the source.
        Color = 27,
        /// Luminosity of the source.
        Luminosity = 28,
    }
}

impl BlendMode {
    /// Equivalent peniko blend mode.
    ///
    /// [`BlendMode::Modulate`] has no direct counterpart and maps to a
    /// multiply mix composited with source-in.
    pub const fn to_peniko(self) -> peniko::BlendMode {
        let (mix, compose) = match self {
            Self::Clear => (Mix::Normal, Compose::Clear),
            Self::Src => (Mix::Normal, Compose::Copy),
            Self::Dst => (Mix::Normal, Compose::Dest),
            Self::SrcOver => (Mix::Normal, Compose::SrcOver),
            Self::DstOver => (Mix::Normal, Compose::DestOver),
            Self::SrcIn => (Mix::Normal, Compose::SrcIn),
            Self::DstIn => (Mix::Normal, Compose::DestIn),
            Self::SrcOut => (Mix::Normal, Compose::SrcOut),
            Self::DstOut => (Mix::Normal, Compose::DestOut),
            Self::SrcATop => (Mix::Normal, Compose::SrcAtop),
            Self::DstATop => (Mix::Normal, Compose::DestAtop),
            Self::Xor => (Mix::Normal, Compose::Xor),
            Self::Plus => (Mix::Normal, Compose::Plus),
            Self::Modulate => (Mix::Multiply, Compose::SrcIn),
            Self::Screen => (Mix::Screen, Compose::SrcOver),
            Self::Overlay => (Mix::Overlay, Compose::SrcOver),
            Self::Darken => (Mix::Darken, Compose::SrcOver),
            Self::Lighten => (Mix::Lighten, Compose::SrcOver),
            Self::ColorDodge => (Mix::ColorDodge, Compose::SrcOver),
            Self::ColorBurn => (Mix::ColorBurn, Compose::SrcOver),
            Self::HardLight => (Mix::HardLight, Compose::SrcOver),
            Self::SoftLight => (Mix::SoftLight, Compose::SrcOver),
            Self::Difference => (Mix::Difference, Compose::SrcOver),
            Self::Exclusion => (Mix::Exclusion, Compose::SrcOver),
            Self::Multiply => (Mix::Multiply, Compose::SrcOver),
            Self::Hue => (Mix::Hue, Compose::SrcOver),
            Self::Saturation => (Mix::Saturation, Compose::SrcOver),
            Self::Color => (Mix::Color, Compose::SrcOver),
            Self::Luminosity => (Mix::Luminosity, Compose::SrcOver),
        };
        peniko::BlendMode::new(mix, compose)
    }
}

numeric_codes! {
    /// Sampling policy for shader coordinates outside `[0, 1]`.
    #[derive(Default)]
    pub enum TileMode {
        /// Repeat the edge color.
        #[default]
        Clamp = 0,
        /// Repeat the pattern.
        Repeat = 1,
        /// Repeat the pattern, mirroring every other copy.
        Mirror = 2,
        /// Transparent outside the pattern.
        Decal = 3,
    }
}

impl TileMode {
    /// Equivalent peniko extend mode.
    ///
    /// Returns `None` for [`TileMode::Decal`], which has to be emulated by
    /// the consumer.
    pub const fn to_extend(self) -> Option<Extend> {
        match self {
            Self::Clamp => Some(Extend::Pad),
            Self::Repeat => Some(Extend::Repeat),
            Self::Mirror => Some(Extend::Reflect),
            Self::Decal => None,
        }
    }
}

numeric_codes! {
    /// How a clip shape combines with the current clip.
    #[derive(Default)]
    pub enum ClipOp {
        /// Remove the shape from the clip.
        Difference = 0,
        /// Keep only the overlap with the shape.
        #[default]
        Intersect = 1,
    }
}

numeric_codes! {
    /// Texel filtering.
    #[derive(Default)]
    pub enum FilterMode {
        /// Nearest texel.
        #[default]
        Nearest = 0,
        /// Bilinear interpolation.
        Linear = 1,
    }
}

numeric_codes! {
    /// Mipmap level selection.
    #[derive(Default)]
    pub enum MipmapMode {
        /// Sample the base level only.
        #[default]
        None = 0,
        /// Nearest level.
        Nearest = 1,
        /// Interpolate between levels.
        Linear = 2,
    }
}

/// Combined image sampling options.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SamplingOptions {
    /// Texel filter.
    pub filter: FilterMode,
    /// Mipmap selection.
    pub mipmap: MipmapMode,
}

impl SamplingOptions {
    /// Create sampling options from their two components.
    pub const fn new(filter: FilterMode, mipmap: MipmapMode) -> Self {
        Self { filter, mipmap }
    }

    /// Closest peniko sampling quality.
    pub const fn quality(self) -> ImageQuality {
        match (self.filter, self.mipmap) {
            (_, MipmapMode::Nearest | MipmapMode::Linear) => ImageQuality::High,
            (FilterMode::Linear, MipmapMode::None) => ImageQuality::Medium,
            (FilterMode::Nearest, MipmapMode::None) => ImageQuality::Low,
        }
    }
}

numeric_codes! {
    /// Base direction of a paragraph.
    #[derive(Default)]
    pub enum TextDirection {
        /// Right to left.
        Rtl = 0,
        /// Left to right.
        #[default]
        Ltr = 1,
    }
}

numeric_codes! {
    /// Horizontal alignment of laid-out lines.
    #[derive(Default)]
    pub enum TextAlign {
        /// Flush left.
        Left = 0,
        /// Flush right.
        Right = 1,
        /// Centered.
        Center = 2,
        /// Stretch inter-word space so every line but the last fills the width.
        Justify = 3,
        /// Flush to the start edge of the paragraph direction.
        #[default]
        Start = 4,
        /// Flush to the end edge of the paragraph direction.
        End = 5,
    }
}

numeric_codes! {
    /// Encoding of text passed as raw bytes.
    #[derive(Default)]
    pub enum TextEncoding {
        /// UTF-8.
        #[default]
        Utf8 = 0,
        /// UTF-16, native byte order.
        Utf16 = 1,
        /// UTF-32, native byte order.
        Utf32 = 2,
        /// 16-bit glyph identifiers, native byte order.
        GlyphId = 3,
    }
}

numeric_codes! {
    /// Encoded image container formats.
    #[derive(Default)]
    pub enum ImageFormat {
        /// Portable Network Graphics.
        #[default]
        Png = 0,
        /// JPEG.
        Jpeg = 1,
        /// WebP.
        Webp = 2,
    }
}
