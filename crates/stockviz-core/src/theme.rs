// File: crates/stockviz-core/src/theme.rs
// Summary: Light/Dark theming for chart rendering colors.

use crate::palette::{self, Rgba};

pub const FONT_FAMILY: &str = "'Segoe UI', Tahoma, Geneva, Verdana, sans-serif";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Rgba,
    pub text: Rgba,
    pub grid: Rgba,
    pub scale_border: Rgba,
    pub crosshair: Rgba,
    pub line_stroke: Rgba,
    pub candle_up: Rgba,
    pub candle_down: Rgba,
    pub volume: Rgba,
    /// Cell separators in grid charts.
    pub cell_stroke: Rgba,
    pub highlight_stroke: Rgba,
    pub font_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: Rgba::rgb(255, 255, 255),
            text: Rgba::rgb(0x33, 0x33, 0x33),
            grid: Rgba::rgba(197, 203, 206, 0.5),
            scale_border: Rgba::rgba(197, 203, 206, 0.8),
            crosshair: Rgba::rgba(32, 38, 46, 0.1),
            line_stroke: Rgba::rgb(0x29, 0x62, 0xff),
            candle_up: palette::UP,
            candle_down: palette::DOWN,
            volume: Rgba::rgba(76, 175, 80, 0.5),
            cell_stroke: Rgba::rgb(255, 255, 255),
            highlight_stroke: Rgba::rgb(0, 0, 0),
            font_size: 12.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Rgba::rgb(18, 18, 20),
            text: Rgba::rgb(235, 235, 245),
            grid: Rgba::rgb(40, 40, 45),
            scale_border: Rgba::rgb(180, 180, 190),
            crosshair: Rgba::rgb(255, 230, 70),
            line_stroke: Rgba::rgb(64, 160, 255),
            candle_up: Rgba::rgb(40, 200, 120),
            candle_down: Rgba::rgb(220, 80, 80),
            volume: Rgba::rgba(96, 156, 255, 0.5),
            cell_stroke: Rgba::rgb(18, 18, 20),
            highlight_stroke: Rgba::rgb(255, 255, 255),
            font_size: 12.0,
        }
    }

    pub fn high_contrast_dark() -> Self {
        Self {
            name: "high-contrast-dark",
            background: Rgba::rgb(0x00, 0x00, 0x00),
            text: Rgba::rgb(0xff, 0xff, 0xff),
            grid: Rgba::rgb(0x22, 0x22, 0x22),
            scale_border: Rgba::rgb(0xff, 0xff, 0xff),
            crosshair: Rgba::rgb(0xff, 0xff, 0x00),
            line_stroke: Rgba::rgb(0x00, 0xff, 0xff),
            candle_up: Rgba::rgb(0x00, 0xff, 0x00),
            candle_down: Rgba::rgb(0xff, 0x00, 0x00),
            volume: Rgba::rgba(0x00, 0xaa, 0xff, 0.6),
            cell_stroke: Rgba::rgb(0x00, 0x00, 0x00),
            highlight_stroke: Rgba::rgb(0xff, 0xff, 0x00),
            font_size: 12.0,
        }
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark(), Theme::high_contrast_dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    Theme::light()
}
