use approx::assert_relative_eq;
use chart_grid::core::{
    Color, OhlcPoint, PriceScale, PriceScaleTuning, TimeScale, TimeScaleTuning, ValuePoint,
    Viewport, VolumePoint, project_area_geometry, project_bars, project_candles,
    project_histogram_bars, project_line_segments,
};

fn viewport() -> Viewport {
    Viewport::new(1000, 500)
}

fn scales() -> (TimeScale, PriceScale) {
    (
        TimeScale::new(0.0, 100.0).expect("time scale"),
        PriceScale::new(0.0, 50.0).expect("price scale"),
    )
}

fn ohlc(time: i64, open: f64, high: f64, low: f64, close: f64) -> OhlcPoint {
    OhlcPoint {
        time,
        open,
        high,
        low,
        close,
    }
}

#[test]
fn candle_projection_maps_body_and_wicks() {
    let (time_scale, price_scale) = scales();
    let projected = project_candles(
        &[ohlc(50, 10.0, 30.0, 5.0, 20.0), ohlc(75, 20.0, 25.0, 10.0, 15.0)],
        time_scale,
        price_scale,
        viewport(),
        8.0,
    )
    .expect("projection");

    let bullish = projected[0];
    assert_relative_eq!(bullish.center_x, 500.0);
    assert_relative_eq!(bullish.body_left, 496.0);
    assert_relative_eq!(bullish.body_right, 504.0);
    assert_relative_eq!(bullish.body_top, 300.0);
    assert_relative_eq!(bullish.body_bottom, 400.0);
    assert_relative_eq!(bullish.wick_top, 200.0);
    assert_relative_eq!(bullish.wick_bottom, 450.0);
    assert!(bullish.is_bullish);

    let bearish = projected[1];
    assert!(!bearish.is_bullish);
    assert_relative_eq!(bearish.body_top, 300.0);
    assert_relative_eq!(bearish.body_bottom, 350.0);
}

#[test]
fn candle_projection_rejects_invalid_body_width() {
    let (time_scale, price_scale) = scales();
    for width in [0.0, -1.0, f64::NAN] {
        assert!(project_candles(&[], time_scale, price_scale, viewport(), width).is_err());
    }
}

#[test]
fn bar_projection_places_open_left_and_close_right() {
    let (time_scale, price_scale) = scales();
    let bars = project_bars(
        &[ohlc(25, 20.0, 40.0, 10.0, 30.0)],
        time_scale,
        price_scale,
        viewport(),
        6.0,
    )
    .expect("bars");

    let bar = bars[0];
    assert_relative_eq!(bar.center_x, 250.0);
    assert_relative_eq!(bar.open_x, 247.0);
    assert_relative_eq!(bar.close_x, 253.0);
    assert_relative_eq!(bar.high_y, 100.0);
    assert_relative_eq!(bar.low_y, 400.0);
    assert_relative_eq!(bar.open_y, 300.0);
    assert_relative_eq!(bar.close_y, 200.0);
    assert!(bar.is_bullish);
}

#[test]
fn line_projection_links_adjacent_points() {
    let (time_scale, price_scale) = scales();
    let points = [
        ValuePoint::new(0, 0.0),
        ValuePoint::new(50, 25.0),
        ValuePoint::new(100, 50.0),
    ];
    let segments =
        project_line_segments(&points, time_scale, price_scale, viewport()).expect("segments");

    assert_eq!(segments.len(), 2);
    assert_relative_eq!(segments[0].x1, 0.0);
    assert_relative_eq!(segments[0].y1, 500.0);
    assert_relative_eq!(segments[0].x2, segments[1].x1);
    assert_relative_eq!(segments[1].x2, 1000.0);
    assert_relative_eq!(segments[1].y2, 0.0);

    let single = project_line_segments(&points[..1], time_scale, price_scale, viewport())
        .expect("single point");
    assert!(single.is_empty());
}

#[test]
fn area_projection_closes_polygon_against_bottom() {
    let (time_scale, price_scale) = scales();
    let points = [ValuePoint::new(10, 10.0), ValuePoint::new(90, 40.0)];
    let area =
        project_area_geometry(&points, time_scale, price_scale, viewport()).expect("area");

    assert_eq!(area.line_points.len(), 2);
    assert_eq!(area.fill_polygon.len(), 5);
    let first = area.fill_polygon[0];
    let last = area.fill_polygon[4];
    assert_eq!(first, last);
    assert_relative_eq!(first.x, 100.0);
    assert_relative_eq!(first.y, 500.0);
    assert_relative_eq!(area.fill_polygon[3].x, 900.0);

    let empty = project_area_geometry(&[], time_scale, price_scale, viewport()).expect("empty");
    assert!(empty.line_points.is_empty());
    assert!(empty.fill_polygon.is_empty());
}

#[test]
fn histogram_bars_scale_against_largest_volume() {
    let (time_scale, _) = scales();
    let green = Color::from_hex("#26a69a").expect("green");
    let red = Color::from_hex("#ef5350").expect("red");
    let points = [
        VolumePoint {
            time: 20,
            value: 50.0,
            color: green,
        },
        VolumePoint {
            time: 40,
            value: 100.0,
            color: red,
        },
    ];

    let bars = project_histogram_bars(&points, time_scale, viewport(), 4.0, 0.2).expect("bars");
    assert_eq!(bars.len(), 2);
    assert_relative_eq!(bars[0].x_left, 198.0);
    assert_relative_eq!(bars[0].x_right, 202.0);
    assert_relative_eq!(bars[0].y_top, 450.0);
    assert_relative_eq!(bars[1].y_top, 400.0);
    assert_relative_eq!(bars[1].y_bottom, 500.0);
    assert_eq!(bars[1].color, red);

    assert!(project_histogram_bars(&points, time_scale, viewport(), 4.0, 1.5).is_err());
    let silent = [VolumePoint {
        time: 20,
        value: 0.0,
        color: green,
    }];
    let none = project_histogram_bars(&silent, time_scale, viewport(), 4.0, 0.2).expect("none");
    assert!(none.is_empty());
}

#[test]
fn time_scale_fit_pads_right_side() {
    let scale = TimeScale::fit_times([100, 200, 300], TimeScaleTuning::default())
        .expect("fit")
        .expect("non-empty");
    assert_eq!(scale.full_range(), (100.0, 300.0));
    let (start, end) = scale.visible_range();
    assert_relative_eq!(start, 100.0);
    assert_relative_eq!(end, 310.0);

    let empty = TimeScale::fit_times(std::iter::empty(), TimeScaleTuning::default())
        .expect("fit empty");
    assert!(empty.is_none());
}

#[test]
fn time_scale_scroll_to_real_time_keeps_span() {
    let mut scale = TimeScale::new(0.0, 100.0).expect("scale");
    scale
        .scroll_to_real_time(1_000, TimeScaleTuning::default())
        .expect("scroll");
    let (start, end) = scale.visible_range();
    assert_relative_eq!(end - start, 100.0, epsilon = 1e-9);
    assert!(end > 1_000.0);
    let x = scale.time_to_pixel(1_000.0, viewport()).expect("pixel");
    assert!(x < 1000.0);
}

#[test]
fn price_scale_from_extents_pads_and_round_trips() {
    let scale = PriceScale::from_extents([(10.0, 20.0), (15.0, 30.0)], PriceScaleTuning::default())
        .expect("scale");
    let (min, max) = scale.domain();
    assert_relative_eq!(min, 8.0);
    assert_relative_eq!(max, 32.0);

    let y = scale.price_to_pixel(21.5, viewport()).expect("pixel");
    let price = scale.pixel_to_price(y, viewport()).expect("price");
    assert_relative_eq!(price, 21.5, epsilon = 1e-9);

    assert!(PriceScale::from_extents(std::iter::empty(), PriceScaleTuning::default()).is_err());
    assert!(PriceScale::from_extents([(f64::NAN, 1.0)], PriceScaleTuning::default()).is_err());
}

#[test]
fn flat_price_extents_expand_to_minimum_span() {
    let scale = PriceScale::from_extents([(1.25, 1.25)], PriceScaleTuning::default())
        .expect("flat scale");
    let (min, max) = scale.domain();
    assert!(max > min);
    assert_relative_eq!((min + max) / 2.0, 1.25, epsilon = 1e-9);
}
