// File: crates/stockviz-core/src/palette.rs
// Summary: CSS-compatible colors, value-to-color mappings and fixed palettes.

use serde::{Deserialize, Serialize};
use skia_safe as skia;

/// 8-bit RGB color with a fractional alpha, the way CSS `rgba()` spells it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS text: `rgb(r, g, b)` when opaque, `rgba(r, g, b, a)` otherwise.
    pub fn css(&self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }

    /// `#rrggbb`, alpha dropped. SVG attributes take the opacity separately.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_skia(&self) -> skia::Color {
        let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        skia::Color::from_argb(a, self.r, self.g, self.b)
    }

    /// Parse `#rgb`, `#rrggbb`, `rgb(...)` or `rgba(...)`.
    pub fn parse(text: &str) -> Option<Self> {
        let s = text.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let (body, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest.strip_suffix(')')?, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest.strip_suffix(')')?, false)
        } else {
            return None;
        };
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let channel = |p: &str| p.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
        match (parts.as_slice(), has_alpha) {
            ([r, g, b], false) => Some(Self::rgb(channel(r)?, channel(g)?, channel(b)?)),
            ([r, g, b, a], true) => {
                let a = a.parse::<f32>().ok()?.clamp(0.0, 1.0);
                Some(Self::rgba(channel(r)?, channel(g)?, channel(b)?, a))
            }
            _ => None,
        }
    }

    /// Channel-wise linear interpolation, `t` in [0, 1].
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Hex digits only; anything else (signs, non-ASCII) is rejected before slicing.
fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Rgba::rgb(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?)),
        3 => {
            let nib = |i: usize| byte(&hex[i..i + 1]).map(|v| v * 17);
            Some(Rgba::rgb(nib(0)?, nib(1)?, nib(2)?))
        }
        _ => None,
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::parse(&value).ok_or_else(|| format!("invalid color '{value}'"))
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.css()
    }
}

pub const UP: Rgba = Rgba::rgb(0, 150, 136);
pub const DOWN: Rgba = Rgba::rgb(255, 82, 82);

pub const HEAT_STRONG_UP: Rgba = Rgba::rgb(0, 128, 0);
pub const HEAT_UP: Rgba = Rgba::rgb(144, 238, 144);
pub const HEAT_FLAT: Rgba = Rgba::rgb(255, 255, 224);
pub const HEAT_DOWN: Rgba = Rgba::rgb(255, 182, 193);
pub const HEAT_STRONG_DOWN: Rgba = Rgba::rgb(255, 0, 0);

/// Five-bucket color for a signed fractional return, checked top-down.
/// A value exactly on a threshold belongs to the bucket nearer zero on both
/// sides (0.05 is mild up, -0.02 is flat). Anything left over, NaN included,
/// is strong-down.
pub fn heatmap_bucket_color(value: f64) -> Rgba {
    if value > 0.05 {
        HEAT_STRONG_UP
    } else if value > 0.02 {
        HEAT_UP
    } else if value >= -0.02 {
        HEAT_FLAT
    } else if value >= -0.05 {
        HEAT_DOWN
    } else {
        HEAT_STRONG_DOWN
    }
}

/// RdYlGn diverging scheme, red (low) to green (high).
const RD_YL_GN: [Rgba; 11] = [
    Rgba::rgb(0xa5, 0x00, 0x26),
    Rgba::rgb(0xd7, 0x30, 0x27),
    Rgba::rgb(0xf4, 0x6d, 0x43),
    Rgba::rgb(0xfd, 0xae, 0x61),
    Rgba::rgb(0xfe, 0xe0, 0x8b),
    Rgba::rgb(0xff, 0xff, 0xbf),
    Rgba::rgb(0xd9, 0xef, 0x8b),
    Rgba::rgb(0xa6, 0xd9, 0x6a),
    Rgba::rgb(0x66, 0xbd, 0x63),
    Rgba::rgb(0x1a, 0x98, 0x50),
    Rgba::rgb(0x00, 0x68, 0x37),
];

/// Continuous red-yellow-green color for `value` over `[lo, hi]`; values
/// outside the domain clamp to the end colors, NaN maps to the midpoint.
pub fn heatmap_scale_color(value: f64, lo: f64, hi: f64) -> Rgba {
    let span = hi - lo;
    let t = if value.is_nan() || span.abs() < 1e-12 {
        0.5
    } else {
        ((value - lo) / span).clamp(0.0, 1.0)
    };
    let pos = t * (RD_YL_GN.len() - 1) as f64;
    let i = (pos.floor() as usize).min(RD_YL_GN.len() - 2);
    RD_YL_GN[i].lerp(RD_YL_GN[i + 1], (pos - i as f64) as f32)
}

/// Body/wick color of a candle; a flat candle counts as up.
pub fn candle_color(open: f64, close: f64) -> Rgba {
    if close >= open { UP } else { DOWN }
}

/// Volume bar color following the candle direction.
pub fn volume_color(open: f64, close: f64) -> Rgba {
    candle_color(open, close).with_alpha(0.8)
}

pub const PIE_PALETTE: [Rgba; 10] = [
    Rgba::rgba(54, 162, 235, 0.8),
    Rgba::rgba(255, 99, 132, 0.8),
    Rgba::rgba(255, 206, 86, 0.8),
    Rgba::rgba(75, 192, 192, 0.8),
    Rgba::rgba(153, 102, 255, 0.8),
    Rgba::rgba(255, 159, 64, 0.8),
    Rgba::rgba(199, 199, 199, 0.8),
    Rgba::rgba(83, 102, 255, 0.8),
    Rgba::rgba(40, 159, 64, 0.8),
    Rgba::rgba(210, 199, 199, 0.8),
];

/// Slice fill, cycling through the palette.
pub fn pie_color(index: usize) -> Rgba {
    PIE_PALETTE[index % PIE_PALETTE.len()]
}

/// Slice border: the fill color made opaque.
pub fn pie_border(index: usize) -> Rgba {
    pie_color(index).with_alpha(1.0)
}

pub const SENTIMENT_POSITIVE: Rgba = Rgba::rgb(0x27, 0xae, 0x60);
pub const SENTIMENT_NEUTRAL: Rgba = Rgba::rgb(0xf3, 0x9c, 0x12);
pub const SENTIMENT_NEGATIVE: Rgba = Rgba::rgb(0xe7, 0x4c, 0x3c);
/// Sentiment trend stroke; the area below it uses the same color at 0.1 alpha.
pub const SENTIMENT_TREND: Rgba = Rgba::rgb(0x34, 0x98, 0xdb);

pub const BAR_PALETTE: [Rgba; 5] = [
    Rgba::rgb(0x34, 0x98, 0xdb),
    Rgba::rgb(0x2e, 0xcc, 0x71),
    Rgba::rgb(0xe7, 0x4c, 0x3c),
    Rgba::rgb(0xf3, 0x9c, 0x12),
    Rgba::rgb(0x9b, 0x59, 0xb6),
];

/// Bar fill, cycling through the palette.
pub fn bar_color(index: usize) -> Rgba {
    BAR_PALETTE[index % BAR_PALETTE.len()]
}
