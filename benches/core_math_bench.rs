use chart_grid::api::{
    ChartInstance, ChartInstanceOptions, GridConfig, LayoutGrid, LayoutId, SavedLayout,
};
use chart_grid::core::{
    Candle, ChartType, LinearScale, PriceScale, SeriesPoint, TimeScale, Viewport,
    format_series, project_candles,
};
use chart_grid::render::HeadlessSurface;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn generated_candles(count: i64) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let base = 100.0 + i as f64 * 0.05;
            let open = base;
            let close = if i % 2 == 0 { base + 1.0 } else { base - 1.0 };
            let low = open.min(close) - 0.75;
            let high = open.max(close) + 0.75;
            Candle::new(i * 60, open, high, low, close, 1_000.0 + (i % 17) as f64)
                .expect("valid generated candle")
        })
        .collect()
}

fn bench_linear_scale_round_trip(c: &mut Criterion) {
    let viewport = Viewport::new(1920, 1080);
    let scale = LinearScale::new(0.0, 10_000.0).expect("valid scale");

    c.bench_function("linear_scale_round_trip", |b| {
        b.iter(|| {
            let px = scale
                .domain_to_pixel(4_321.123, viewport)
                .expect("to pixel");
            let _ = scale.pixel_to_domain(px, viewport).expect("from pixel");
        })
    });
}

fn bench_format_series_10k(c: &mut Criterion) {
    let candles = generated_candles(10_000);

    c.bench_function("format_series_area_10k", |b| {
        b.iter(|| {
            let _ = format_series(black_box(&candles), black_box(ChartType::Area));
        })
    });
}

fn bench_candle_projection_10k(c: &mut Criterion) {
    let viewport = Viewport::new(1920, 1080);
    let time_scale = TimeScale::new(0.0, 600_060.0).expect("valid time scale");
    let price_scale = PriceScale::new(0.0, 2_500.0).expect("valid price scale");
    let points: Vec<_> = format_series(&generated_candles(10_000), ChartType::Candlestick)
        .iter()
        .filter_map(SeriesPoint::as_ohlc)
        .collect();

    c.bench_function("candle_projection_10k", |b| {
        b.iter(|| {
            let _ = project_candles(
                black_box(&points),
                black_box(time_scale),
                black_box(price_scale),
                black_box(viewport),
                black_box(7.0),
            )
            .expect("projection should succeed");
        })
    });
}

fn bench_chart_type_switch_2k(c: &mut Criterion) {
    let surface = HeadlessSurface::new(Viewport::new(1600, 900)).expect("surface");
    let options = ChartInstanceOptions::new("EURUSD").with_data(generated_candles(2_000));
    let mut chart = ChartInstance::new(surface, options).expect("chart init");
    let mut next = ChartType::ALL.iter().cycle();

    c.bench_function("chart_type_switch_2k", |b| {
        b.iter(|| {
            let chart_type = *next.next().expect("cycle never ends");
            chart.set_chart_type(black_box(chart_type)).expect("switch");
        })
    });
}

fn bench_saved_layout_json_round_trip(c: &mut Criterion) {
    let mut grid = LayoutGrid::new(GridConfig::default()).expect("grid");
    grid.set_layout(LayoutId::Quad);
    let saved = grid.save_layout("bench").expect("save");

    c.bench_function("saved_layout_json_round_trip", |b| {
        b.iter(|| {
            let json = black_box(&saved).to_json_pretty().expect("to json");
            let _ = SavedLayout::from_json_str(&json).expect("from json");
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_round_trip,
    bench_format_series_10k,
    bench_candle_projection_10k,
    bench_chart_type_switch_2k,
    bench_saved_layout_json_round_trip
);
criterion_main!(benches);
