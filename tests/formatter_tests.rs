use chart_grid::core::{
    Candle, ChartTheme, ChartType, Color, SeriesPoint, ValuePoint, VolumeColors,
    canonicalize_candles, canonicalize_values, format_series, format_volume,
    format_volume_default,
};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

fn candle(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
    Candle::new(time, open, high, low, close, volume).expect("valid candle")
}

#[test]
fn area_format_of_single_candle_is_time_and_close() {
    let candles = vec![candle(1, 1.0, 1.1, 0.9, 1.05, 0.0)];
    let formatted = format_series(&candles, ChartType::Area);
    assert_eq!(formatted, vec![SeriesPoint::Value(ValuePoint::new(1, 1.05))]);
}

#[test]
fn ohlc_chart_types_keep_candles_verbatim() {
    let candles = vec![
        candle(10, 5.0, 6.0, 4.0, 5.5, 100.0),
        candle(20, 5.5, 7.0, 5.0, 6.5, 80.0),
    ];
    for chart_type in [ChartType::Bar, ChartType::Candlestick] {
        let formatted = format_series(&candles, chart_type);
        assert_eq!(formatted.len(), 2);
        let first = formatted[0].as_ohlc().expect("ohlc point");
        assert_eq!(
            (first.time, first.open, first.high, first.low, first.close),
            (10, 5.0, 6.0, 4.0, 5.5)
        );
        assert!(formatted[1].as_value().is_none());
    }
}

#[test]
fn empty_input_formats_to_empty_output() {
    for chart_type in ChartType::ALL {
        assert!(format_series(&[], chart_type).is_empty());
    }
    assert!(format_volume_default(&[]).is_empty());
}

#[test]
fn volume_color_follows_candle_direction() {
    let colors = VolumeColors {
        up: Color::rgb(0.0, 1.0, 0.0),
        down: Color::rgb(1.0, 0.0, 0.0),
    };
    let candles = vec![
        candle(1, 1.0, 2.0, 0.5, 1.5, 10.0),
        candle(2, 1.5, 2.0, 0.5, 1.0, 20.0),
        candle(3, 1.0, 1.0, 1.0, 1.0, 30.0),
    ];
    let volume = format_volume(&candles, colors);
    assert_eq!(volume.len(), 3);
    assert_eq!(volume[0].color, colors.up);
    assert_eq!(volume[1].color, colors.down);
    // Flat candles count as up.
    assert_eq!(volume[2].color, colors.up);
    assert_eq!(volume[1].value, 20.0);
}

#[test]
fn default_volume_colors_are_translucent_teal_and_red() {
    let palette = ChartTheme::Dark.palette();
    assert_eq!(palette.volume.up.to_hex(), "#26a69a80");
    assert_eq!(palette.volume.down.to_hex(), "#ef535080");
}

#[test]
fn canonicalize_sorts_drops_invalid_and_keeps_last_duplicate() {
    let mut broken = candle(5, 1.0, 2.0, 0.5, 1.5, 1.0);
    broken.high = f64::NAN;
    let canonical = canonicalize_candles(vec![
        candle(30, 1.0, 2.0, 0.5, 1.5, 1.0),
        candle(10, 1.0, 2.0, 0.5, 1.5, 1.0),
        broken,
        candle(30, 1.0, 3.0, 0.5, 2.5, 9.0),
    ]);
    let times: Vec<i64> = canonical.iter().map(|c| c.time).collect();
    assert_eq!(times, vec![10, 30]);
    assert_eq!(canonical[1].close, 2.5);
}

#[test]
fn canonicalize_values_dedupes_by_time() {
    let canonical = canonicalize_values(vec![
        ValuePoint::new(3, 1.0),
        ValuePoint::new(1, 2.0),
        ValuePoint::new(3, 4.0),
        ValuePoint::new(2, f64::INFINITY),
    ]);
    assert_eq!(canonical, vec![ValuePoint::new(1, 2.0), ValuePoint::new(3, 4.0)]);
}

#[test]
fn candle_constructor_rejects_inconsistent_prices() {
    assert!(Candle::new(1, 3.0, 2.0, 1.0, 1.5, 0.0).is_err());
    assert!(Candle::new(1, 1.5, 1.0, 2.0, 1.5, 0.0).is_err());
    assert!(Candle::new(1, 1.5, 2.0, 1.0, 1.5, -1.0).is_err());
}

#[test]
fn decimal_candles_convert_time_and_prices() {
    let time = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).single().expect("time");
    let candle = Candle::from_decimal_time(
        time,
        Decimal::new(10_500, 4),
        Decimal::new(11_000, 4),
        Decimal::new(9_000, 4),
        Decimal::new(10_250, 4),
        Decimal::new(42, 0),
    )
    .expect("decimal candle");
    assert_eq!(candle.time, time.timestamp());
    assert!((candle.close - 1.025).abs() < 1e-12);
    assert_eq!(candle.volume, 42.0);
}
