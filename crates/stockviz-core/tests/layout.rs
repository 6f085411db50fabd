// File: crates/stockviz-core/tests/layout.rs
// Purpose: Validate shared time axis, per-scale ranges and crosshair snapping over mixed series.

use stockviz_core::{Candle, Chart, LinePoint, PriceScaleId, RenderOptions, ScaleMargins, Series, SeriesValue, Time};

fn mixed_chart() -> Chart {
    let mut chart = Chart::new();
    chart.add_series(Series::line("line", vec![LinePoint::new(Time(1), 1.0), LinePoint::new(Time(3), 3.0)]));
    chart.add_series(Series::candlestick(
        "candles",
        vec![
            Candle { time: Time(4), open: 4.0, high: 5.5, low: 2.0, close: 2.5 },
            Candle { time: Time(2), open: 2.0, high: 6.0, low: 1.5, close: 4.0 },
        ],
    ));
    chart.add_series(
        Series::histogram("volume", vec![LinePoint::new(Time(2), 500.0), LinePoint::new(Time(4), 1000.0)])
            .on_scale(PriceScaleId::Overlay("volume".into()), ScaleMargins::new(0.8, 0.0)),
    );
    chart
}

#[test]
fn time_axis_is_union_of_series() {
    let chart = mixed_chart();
    let layout = chart.layout(&RenderOptions::sized(800, 400));
    assert_eq!(layout.times, vec![Time(1), Time(2), Time(3), Time(4)]);
    // Plot spans 12..728, four bars of 179 px.
    assert!((layout.time_scale.bar_spacing - 179.0).abs() < 1e-3);
    assert_eq!(layout.x_of(Time(1)), Some(101.5));
    assert_eq!(layout.x_of(Time(9)), None);
}

#[test]
fn right_scale_covers_line_and_candles() {
    let chart = mixed_chart();
    let layout = chart.layout(&RenderOptions::sized(800, 400));
    let right = layout.value_scale(&PriceScaleId::Right).expect("right scale");
    assert_eq!((right.vmin, right.vmax), (1.0, 6.0));
    // 360 px plot with 10% margins top and bottom.
    assert!((right.to_px(6.0) - 48.0).abs() < 1e-3);
    assert!((right.to_px(1.0) - 336.0).abs() < 1e-3);
}

#[test]
fn overlay_scale_sits_in_bottom_fifth() {
    let chart = mixed_chart();
    let layout = chart.layout(&RenderOptions::sized(800, 400));
    let vol = layout.value_scale(&PriceScaleId::Overlay("volume".into())).expect("overlay scale");
    assert_eq!((vol.vmin, vol.vmax), (0.0, 1000.0));
    assert!((vol.to_px(0.0) - 372.0).abs() < 1e-3);
    assert!((vol.to_px(1000.0) - 300.0).abs() < 1e-3);
}

#[test]
fn crosshair_snaps_to_bars() {
    let chart = mixed_chart();
    let opts = RenderOptions::sized(800, 400);

    let ch = chart.crosshair_at(&opts, 110.0, 200.0).expect("inside plot");
    assert_eq!((ch.index, ch.time, ch.x), (0, Time(1), 101.5));
    assert_eq!(ch.value_of("line"), Some(SeriesValue::Value(1.0)));
    assert_eq!(ch.value_of("candles"), None);

    let ch = chart.crosshair_at(&opts, 290.0, 200.0).expect("inside plot");
    assert_eq!(ch.time, Time(2));
    match ch.value_of("candles") {
        Some(SeriesValue::Ohlc(c)) => assert_eq!((c.open, c.close), (2.0, 4.0)),
        other => panic!("expected candle, got {other:?}"),
    }
    assert_eq!(ch.value_of("volume"), Some(SeriesValue::Value(500.0)));

    // Right edge is part of the last bar.
    assert_eq!(chart.crosshair_at(&opts, 728.0, 200.0).map(|c| c.index), Some(3));
}

#[test]
fn crosshair_outside_plot_or_empty() {
    let chart = mixed_chart();
    let opts = RenderOptions::sized(800, 400);
    assert!(chart.crosshair_at(&opts, 5.0, 200.0).is_none());
    assert!(chart.crosshair_at(&opts, 300.0, 390.0).is_none());
    assert!(chart.crosshair_at(&opts, 760.0, 200.0).is_none());
    assert!(Chart::new().crosshair_at(&opts, 300.0, 200.0).is_none());
}
