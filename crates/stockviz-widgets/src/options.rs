// File: crates/stockviz-widgets/src/options.rs
// Summary: Per-call chart options, shallow-merged over the family defaults.

use chrono::NaiveDate;
use stockviz_core::types::WIDTH;
use stockviz_core::{ColorScale, Locale, Rgba, Theme};

use crate::renderer::Family;

/// Caller overrides. Every field left `None` falls back to the family default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub theme: Option<Theme>,
    pub locale: Option<Locale>,
    pub title: Option<String>,
    pub line_color: Option<Rgba>,
    pub line_width: Option<f32>,
    pub up_color: Option<Rgba>,
    pub down_color: Option<Rgba>,
    pub volume_color: Option<Rgba>,
    pub color_scale: Option<ColorScale>,
    pub draw_labels: Option<bool>,
    /// Reference date for default load ranges; today's UTC date when unset.
    pub today: Option<NaiveDate>,
}

impl ChartOptions {
    /// Fields set in `self` win; the rest come from `base`.
    pub fn or(&self, base: &ChartOptions) -> ChartOptions {
        ChartOptions {
            width: self.width.or(base.width),
            height: self.height.or(base.height),
            theme: self.theme.or(base.theme),
            locale: self.locale.clone().or_else(|| base.locale.clone()),
            title: self.title.clone().or_else(|| base.title.clone()),
            line_color: self.line_color.or(base.line_color),
            line_width: self.line_width.or(base.line_width),
            up_color: self.up_color.or(base.up_color),
            down_color: self.down_color.or(base.down_color),
            volume_color: self.volume_color.or(base.volume_color),
            color_scale: self.color_scale.or(base.color_scale),
            draw_labels: self.draw_labels.or(base.draw_labels),
            today: self.today.or(base.today),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale.clone().unwrap_or_default()
    }

    /// Fill in every field for `family` drawn into a container of `container` client size.
    pub fn resolve(&self, family: Family, container: (u32, u32)) -> ResolvedOptions {
        let theme = self.theme.unwrap_or_default();
        let (cw, ch) = container;
        let width = self.width.unwrap_or(if cw > 0 { cw } else { WIDTH as u32 });
        let height = self.height.unwrap_or(if ch > 0 { ch } else { family.default_height() });
        ResolvedOptions {
            family,
            width: width.max(1),
            height: height.max(1),
            locale: self.locale(),
            title: self.title.clone(),
            line_color: self.line_color.unwrap_or(theme.line_stroke),
            line_width: self.line_width.unwrap_or(2.0),
            up_color: self.up_color.unwrap_or(theme.candle_up),
            down_color: self.down_color.unwrap_or(theme.candle_down),
            volume_color: self.volume_color.unwrap_or(theme.volume),
            color_scale: self.color_scale.unwrap_or_default(),
            draw_labels: self.draw_labels.unwrap_or(true),
            theme,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedOptions {
    pub family: Family,
    pub width: u32,
    pub height: u32,
    pub theme: Theme,
    pub locale: Locale,
    pub title: Option<String>,
    pub line_color: Rgba,
    pub line_width: f32,
    pub up_color: Rgba,
    pub down_color: Rgba,
    pub volume_color: Rgba,
    pub color_scale: ColorScale,
    pub draw_labels: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_size_then_family_height() {
        let o = ChartOptions::default().resolve(Family::Volume, (640, 0));
        assert_eq!((o.width, o.height), (640, 300));
        let o = ChartOptions::default().resolve(Family::Combined, (0, 0));
        assert_eq!((o.width, o.height), (800, 500));
        let o = ChartOptions::default().resolve(Family::Line, (640, 220));
        assert_eq!((o.width, o.height), (640, 220));
    }

    #[test]
    fn overrides_are_shallow() {
        let base = ChartOptions { height: Some(250), title: Some("base".into()), ..Default::default() };
        let top = ChartOptions { title: Some("top".into()), line_width: Some(3.0), ..Default::default() };
        let merged = top.or(&base);
        assert_eq!(merged.height, Some(250));
        assert_eq!(merged.title.as_deref(), Some("top"));
        assert_eq!(merged.line_width, Some(3.0));

        let o = merged.resolve(Family::Line, (500, 0));
        assert_eq!((o.width, o.height), (500, 250));
        assert_eq!(o.line_color, Theme::light().line_stroke);
    }
}
