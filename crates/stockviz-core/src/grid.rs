// File: crates/stockviz-core/src/grid.rs
// Summary: Price-axis tick values and time-label spacing.

/// "Nice" tick values (1, 2, 5 x 10^k steps) covering `[min, max]` with roughly `count` ticks.
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || count == 0 {
        return Vec::new();
    }
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let span = hi - lo;
    if span < 1e-12 {
        return vec![lo];
    }
    let raw = span / count as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let step = mag * if norm <= 1.0 { 1.0 } else if norm <= 2.0 { 2.0 } else if norm <= 5.0 { 5.0 } else { 10.0 };
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Every `stride`-th bar index so labels sit at least `min_px` apart.
pub fn label_stride(bar_spacing: f32, min_px: f32) -> usize {
    if bar_spacing <= 0.0 { return 1; }
    ((min_px / bar_spacing).ceil() as usize).max(1)
}
