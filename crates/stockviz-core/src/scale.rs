// File: crates/stockviz-core/src/scale.rs
// Summary: Bar-indexed time scale, margin-aware value scale and band scale for grids.

/// Logical X coordinate (bar index).
pub type Logical = f64;
/// Value Y coordinate (e.g., price).
pub type Value = f64;

/// Fractions of the plot height kept free above and below a price scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleMargins {
    pub top: f32,
    pub bottom: f32,
}

impl ScaleMargins {
    pub const fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }
}

impl Default for ScaleMargins {
    fn default() -> Self {
        Self::new(0.1, 0.1)
    }
}

/// Horizontal time scale controlled via logical start and bar spacing (px per logical).
/// Bar `i` is centered at `to_px(i + 0.5)`.
#[derive(Clone, Copy, Debug)]
pub struct TimeScale {
    pub left_px: f32,
    pub start_logical: Logical,
    pub bar_spacing: f32,
}

impl TimeScale {
    pub fn new(left_px: f32, start_logical: Logical, bar_spacing: f32) -> Self {
        Self { left_px, start_logical, bar_spacing: bar_spacing.max(0.01) }
    }

    /// Spread `bars` evenly across `width_px` starting at `left_px`.
    pub fn fit(left_px: f32, width_px: f32, bars: usize) -> Self {
        Self::new(left_px, 0.0, width_px / bars.max(1) as f32)
    }

    #[inline]
    pub fn to_px(&self, x: Logical) -> f32 {
        self.left_px + ((x - self.start_logical) as f32) * self.bar_spacing
    }

    #[inline]
    pub fn from_px(&self, px: f32) -> Logical {
        self.start_logical + ((px - self.left_px) / self.bar_spacing) as f64
    }

    /// Pixel center of bar `index`.
    #[inline]
    pub fn bar_center(&self, index: usize) -> f32 {
        self.to_px(index as f64 + 0.5)
    }

    /// Index of the bar under `px`, if any of `bars` covers it.
    pub fn bar_at(&self, px: f32, bars: usize) -> Option<usize> {
        let logical = self.from_px(px).floor();
        (logical >= 0.0 && (logical as usize) < bars).then_some(logical as usize)
    }
}

/// Vertical value scale mapping a data range to [top, bottom] pixels.
#[derive(Clone, Copy, Debug)]
pub struct ValueScale {
    pub top_px: f32,
    pub bottom_px: f32,
    pub vmin: Value,
    pub vmax: Value,
}

impl ValueScale {
    pub fn new_linear(top_px: f32, bottom_px: f32, vmin: Value, vmax: Value) -> Self {
        let mut s = Self { top_px, bottom_px, vmin, vmax };
        if (s.vmax - s.vmin).abs() < 1e-12 { s.vmax = s.vmin + 1.0; }
        s
    }

    /// Linear scale over the pane `[top_px, bottom_px]` shrunk by `margins`.
    pub fn with_margins(top_px: f32, bottom_px: f32, vmin: Value, vmax: Value, margins: ScaleMargins) -> Self {
        let h = bottom_px - top_px;
        Self::new_linear(top_px + h * margins.top, bottom_px - h * margins.bottom, vmin, vmax)
    }

    #[inline]
    pub fn to_px(&self, y: Value) -> f32 {
        let span = (self.vmax - self.vmin).max(1e-12);
        self.bottom_px - ((y - self.vmin) / span) as f32 * (self.bottom_px - self.top_px)
    }

    #[inline]
    pub fn from_px(&self, py: f32) -> Value {
        let span = (self.vmax - self.vmin).max(1e-12);
        let h = (self.bottom_px - self.top_px).max(1e-6);
        self.vmin + ((self.bottom_px - py) / h) as f64 * span
    }
}

/// Ordinal band scale (d3 `scaleBand` semantics, align 0.5, no rounding).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandScale {
    pub start_px: f32,
    pub step: f32,
    pub bandwidth: f32,
    pub count: usize,
}

impl BandScale {
    /// `padding` is used for both inner and outer padding.
    pub fn new(count: usize, range: (f32, f32), padding: f32) -> Self {
        let (r0, r1) = range;
        let n = count as f32;
        let step = (r1 - r0) / (n - padding + padding * 2.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        Self { start_px: start, step, bandwidth: step * (1.0 - padding), count }
    }

    /// Left/top edge of band `index`.
    pub fn position(&self, index: usize) -> f32 {
        self.start_px + self.step * index as f32
    }

    /// Band containing `px`; gaps between bands count as outside.
    pub fn index_at(&self, px: f32) -> Option<usize> {
        if self.step <= 0.0 {
            return None;
        }
        let rel = px - self.start_px;
        if rel < 0.0 {
            return None;
        }
        let i = (rel / self.step).floor() as usize;
        let offset = rel - self.step * i as f32;
        (i < self.count && offset <= self.bandwidth).then_some(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_scale_matches_d3() {
        // d3.scaleBand().domain([1..12]).range([0, 600]).padding(0.05)
        let b = BandScale::new(12, (0.0, 600.0), 0.05);
        assert!((b.step - 600.0 / 12.05).abs() < 1e-3);
        assert!((b.bandwidth - b.step * 0.95).abs() < 1e-3);
        assert!((b.position(0) - b.step * 0.05).abs() < 1e-3);
        assert_eq!(b.index_at(b.position(3) + 1.0), Some(3));
        assert_eq!(b.index_at(-1.0), None);
        assert_eq!(b.index_at(599.9), None);
    }

    #[test]
    fn margins_shrink_value_range() {
        let s = ValueScale::with_margins(0.0, 100.0, 0.0, 10.0, ScaleMargins::new(0.1, 0.3));
        assert!((s.to_px(10.0) - 10.0).abs() < 1e-4);
        assert!((s.to_px(0.0) - 70.0).abs() < 1e-4);
        assert!((s.from_px(40.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn bar_lookup() {
        let t = TimeScale::fit(10.0, 100.0, 4);
        assert_eq!(t.bar_at(10.0, 4), Some(0));
        assert_eq!(t.bar_at(109.0, 4), Some(3));
        assert_eq!(t.bar_at(111.0, 4), None);
        assert_eq!(t.bar_at(5.0, 4), None);
        assert!((t.bar_center(1) - 47.5).abs() < 1e-4);
    }
}
