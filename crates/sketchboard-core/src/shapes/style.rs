//! Shape styles and the theme resolver.
//!
//! A [`ShapeStyle`] is an enumerated description shared by every shape kind.
//! Concrete colors, stroke widths and fonts are only produced when a style is
//! resolved against a theme (light or dark).

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Named palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorStyle {
    White,
    LightGray,
    Gray,
    #[default]
    Black,
    Green,
    Cyan,
    Blue,
    Indigo,
    Violet,
    Red,
    Orange,
    Yellow,
}

impl ColorStyle {
    /// Every palette entry, in menu order.
    pub const ALL: [ColorStyle; 12] = [
        ColorStyle::White,
        ColorStyle::LightGray,
        ColorStyle::Gray,
        ColorStyle::Black,
        ColorStyle::Green,
        ColorStyle::Cyan,
        ColorStyle::Blue,
        ColorStyle::Indigo,
        ColorStyle::Violet,
        ColorStyle::Red,
        ColorStyle::Orange,
        ColorStyle::Yellow,
    ];

    /// Base (light theme) hex value.
    fn base_hex(self) -> u32 {
        match self {
            ColorStyle::White => 0xf0f1f3,
            ColorStyle::LightGray => 0xc6cbd1,
            ColorStyle::Gray => 0x788492,
            ColorStyle::Black => 0x1d1d1d,
            ColorStyle::Green => 0x36b24d,
            ColorStyle::Cyan => 0x0e98ad,
            ColorStyle::Blue => 0x1c7ed6,
            ColorStyle::Indigo => 0x4263eb,
            ColorStyle::Violet => 0x7746f1,
            ColorStyle::Red => 0xff2133,
            ColorStyle::Orange => 0xff9433,
            ColorStyle::Yellow => 0xffc936,
        }
    }

    fn base(self) -> Color {
        hex(self.base_hex())
    }
}

/// Stroke and font size steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeStyle {
    #[default]
    Small,
    Medium,
    Large,
}

impl SizeStyle {
    pub fn stroke_width(self) -> f64 {
        match self {
            SizeStyle::Small => 2.0,
            SizeStyle::Medium => 3.5,
            SizeStyle::Large => 5.0,
        }
    }

    pub fn font_size(self) -> f64 {
        match self {
            SizeStyle::Small => 28.0,
            SizeStyle::Medium => 48.0,
            SizeStyle::Large => 96.0,
        }
    }

    /// Font size used on sticky-like surfaces.
    pub fn sticky_font_size(self) -> f64 {
        match self {
            SizeStyle::Small => 24.0,
            SizeStyle::Medium => 36.0,
            SizeStyle::Large => 48.0,
        }
    }
}

/// Stroke dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DashStyle {
    Draw,
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl DashStyle {
    /// Dash array for a given stroke width (empty = continuous).
    pub fn dashes(self, stroke_width: f64) -> Vec<f64> {
        match self {
            DashStyle::Draw | DashStyle::Solid => Vec::new(),
            DashStyle::Dashed => vec![stroke_width * 2.0, stroke_width * 2.0],
            DashStyle::Dotted => vec![0.0, stroke_width * 4.0],
        }
    }
}

/// Font face family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontStyle {
    #[default]
    Script,
    Sans,
    Serif,
    Mono,
}

impl FontStyle {
    pub fn face(self) -> &'static str {
        match self {
            FontStyle::Script => "\"Caveat Brush\"",
            FontStyle::Sans => "\"Source Sans Pro\"",
            FontStyle::Serif => "\"Crimson Pro\"",
            FontStyle::Mono => "\"Source Code Pro\"",
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlignStyle {
    Start,
    #[default]
    Middle,
    End,
    Justify,
}

/// Enumerated visual style shared by all shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub color: ColorStyle,
    pub size: SizeStyle,
    pub dash: DashStyle,
    pub font: FontStyle,
    pub text_align: AlignStyle,
    pub is_filled: bool,
    pub scale: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: ColorStyle::Black,
            size: SizeStyle::Small,
            dash: DashStyle::Draw,
            font: FontStyle::Script,
            text_align: AlignStyle::Middle,
            is_filled: false,
            scale: 1.0,
        }
    }
}

impl ShapeStyle {
    /// The style text-bearing shapes start with.
    pub fn text() -> Self {
        Self {
            dash: DashStyle::Solid,
            ..Self::default()
        }
    }

    /// Overlay the fields present in `partial`.
    pub fn merged(&self, partial: &StylePartial) -> Self {
        Self {
            color: partial.color.unwrap_or(self.color),
            size: partial.size.unwrap_or(self.size),
            dash: partial.dash.unwrap_or(self.dash),
            font: partial.font.unwrap_or(self.font),
            text_align: partial.text_align.unwrap_or(self.text_align),
            is_filled: partial.is_filled.unwrap_or(self.is_filled),
            scale: partial.scale.unwrap_or(self.scale),
        }
    }
}

/// A style where every field is optional, used for deep merges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StylePartial {
    pub color: Option<ColorStyle>,
    pub size: Option<SizeStyle>,
    pub dash: Option<DashStyle>,
    pub font: Option<FontStyle>,
    pub text_align: Option<AlignStyle>,
    pub is_filled: Option<bool>,
    pub scale: Option<f64>,
}

impl From<ShapeStyle> for StylePartial {
    fn from(style: ShapeStyle) -> Self {
        Self {
            color: Some(style.color),
            size: Some(style.size),
            dash: Some(style.dash),
            font: Some(style.font),
            text_align: Some(style.text_align),
            is_filled: Some(style.is_filled),
            scale: Some(style.scale),
        }
    }
}

/// Canvas background in the light theme.
pub const CANVAS_LIGHT: Color = Color::from_rgba8(0xfa, 0xfa, 0xfa, 0xff);
/// Canvas background in the dark theme.
pub const CANVAS_DARK: Color = Color::from_rgba8(0x34, 0x3d, 0x45, 0xff);

/// Resolved colors and widths for outline shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub stroke: Color,
    pub fill: Color,
    pub stroke_width: f64,
}

/// Resolved colors for sticky-like surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyStyle {
    pub fill: Color,
    pub stroke: Color,
    pub text: Color,
}

/// Resolved font for sticky-like surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub size: f64,
    pub face: &'static str,
}

impl FontSpec {
    /// CSS shorthand, e.g. `24px/1 "Caveat Brush"`.
    pub fn css(&self) -> String {
        format!("{}px/1 {}", self.size, self.face)
    }
}

/// Resolve stroke, fill and stroke width for a style.
pub fn shape_style(style: &ShapeStyle, is_dark_mode: bool) -> ResolvedStyle {
    ResolvedStyle {
        stroke: stroke_color(style.color, is_dark_mode),
        fill: fill_color(style.color, is_dark_mode),
        stroke_width: style.size.stroke_width() * style.scale,
    }
}

/// Resolve colors for sticky-like surfaces (white and black read as yellow).
pub fn sticky_shape_style(style: &ShapeStyle, is_dark_mode: bool) -> StickyStyle {
    let color = match style.color {
        ColorStyle::White | ColorStyle::Black => ColorStyle::Yellow,
        other => other,
    };
    StickyStyle {
        fill: sticky_fill(color, is_dark_mode),
        stroke: stroke_color(color, is_dark_mode),
        text: if is_dark_mode {
            hex(0x1d1d1d)
        } else {
            hex(0x0d0d0d)
        },
    }
}

/// Resolve the font for sticky-like surfaces.
pub fn sticky_font_style(style: &ShapeStyle) -> FontSpec {
    FontSpec {
        size: style.size.sticky_font_size() * style.scale,
        face: style.font.face(),
    }
}

fn stroke_color(color: ColorStyle, is_dark_mode: bool) -> Color {
    match (color, is_dark_mode) {
        (ColorStyle::White, false) => hex(0x1d1d1d),
        (c, false) => c.base(),
        (ColorStyle::White | ColorStyle::Black, true) => hex(0xcecece),
        (c, true) => lerp_color(c.base(), CANVAS_DARK, 0.1),
    }
}

fn fill_color(color: ColorStyle, is_dark_mode: bool) -> Color {
    match (color, is_dark_mode) {
        (ColorStyle::White, false) => hex(0xfefefe),
        (c, false) => lerp_color(c.base(), CANVAS_LIGHT, 0.82),
        (ColorStyle::White, true) => hex(0x1e2125),
        (ColorStyle::Black, true) => hex(0x1e1e1f),
        (c, true) => lerp_color(c.base(), CANVAS_DARK, 0.82),
    }
}

fn sticky_fill(color: ColorStyle, is_dark_mode: bool) -> Color {
    match (color, is_dark_mode) {
        (ColorStyle::White, false) => hex(0xffffff),
        (ColorStyle::Black, false) => hex(0x3d3d3d),
        (c, false) => lerp_color(c.base(), CANVAS_LIGHT, 0.45),
        (ColorStyle::White, true) => hex(0x1d1d1d),
        (ColorStyle::Black, true) => hex(0xbbbbbb),
        (c, true) => lerp_color(
            lerp_color(c.base(), ColorStyle::Gray.base(), 0.3),
            CANVAS_DARK,
            0.4,
        ),
    }
}

/// Build an opaque color from `0xRRGGBB`.
pub fn hex(rgb: u32) -> Color {
    Color::from_rgba8(
        ((rgb >> 16) & 0xff) as u8,
        ((rgb >> 8) & 0xff) as u8,
        (rgb & 0xff) as u8,
        0xff,
    )
}

/// Linear interpolation between two colors in 8-bit sRGB space.
pub fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    let a = a.to_rgba8();
    let b = b.to_rgba8();
    let mix = |x: u8, y: u8| (x as f64 + t * (y as f64 - x as f64)).round().clamp(0.0, 255.0) as u8;
    Color::from_rgba8(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
}

/// Format a color as `#rrggbb` (alpha is dropped).
pub fn to_hex(color: Color) -> String {
    let c = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}
