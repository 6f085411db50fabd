use anyhow::Result;
use stockviz_core::{Candle, Chart, LinePoint, RenderOptions, Series, Time};
use criterion::{criterion_group, criterion_main, Criterion, black_box};

fn build_line_chart(n: usize) -> Chart {
    let mut ch = Chart::new();
    let data = (0..n)
        .map(|i| LinePoint::new(Time(i as i64 * 86_400), (i as f64 * 0.01).sin() * 10.0 + 50.0))
        .collect();
    ch.add_series(Series::line("price", data));
    ch
}

fn build_candle_chart(n: usize) -> Chart {
    let mut ch = Chart::new();
    let data = (0..n)
        .map(|i| {
            let base = 50.0 + (i as f64 * 0.02).sin() * 5.0;
            Candle { time: Time(i as i64 * 86_400), open: base, high: base + 1.0, low: base - 1.0, close: base + 0.5 }
        })
        .collect();
    ch.add_series(Series::candlestick("candles", data));
    ch
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_png_bytes");
    for &n in &[250usize, 1_250usize, 5_000usize] {
        for (name, ch) in [("line", build_line_chart(n)), ("candles", build_candle_chart(n))] {
            group.bench_function(format!("{name}_{n}"), |b| {
                let mut opts = RenderOptions::sized(800, 500);
                opts.draw_labels = false;
                b.iter(|| -> Result<()> {
                    let bytes = ch.render_to_png_bytes(&opts)?;
                    black_box(bytes);
                    Ok(())
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
