use chart_grid::core::{Candle, ChartType, format_series, format_volume_default};
use proptest::prelude::*;

fn ascending_candles() -> impl Strategy<Value = Vec<Candle>> {
    proptest::collection::vec(
        (1i64..10_000, 1.0f64..1_000.0, 0.0f64..50.0, 0.0f64..1.0, 0.0f64..1.0, 0.0f64..1e6),
        0..64,
    )
    .prop_map(|rows| {
        let mut time = 0_i64;
        rows.into_iter()
            .map(|(step, low, range, open_at, close_at, volume)| {
                time += step;
                let high = low + range;
                Candle::new(
                    time,
                    low + range * open_at,
                    high,
                    low,
                    low + range * close_at,
                    volume,
                )
                .expect("generated candle")
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn line_format_keeps_length_order_and_close(candles in ascending_candles()) {
        let formatted = format_series(&candles, ChartType::Line);
        prop_assert_eq!(formatted.len(), candles.len());
        for (point, candle) in formatted.iter().zip(&candles) {
            let value = point.as_value().expect("line point");
            prop_assert_eq!(value.time, candle.time);
            prop_assert_eq!(value.value, candle.close);
        }
    }

    #[test]
    fn ohlc_format_is_verbatim(candles in ascending_candles()) {
        let formatted = format_series(&candles, ChartType::Candlestick);
        prop_assert_eq!(formatted.len(), candles.len());
        for (point, candle) in formatted.iter().zip(&candles) {
            let ohlc = point.as_ohlc().expect("ohlc point");
            prop_assert_eq!(ohlc.time, candle.time);
            prop_assert_eq!(ohlc.open, candle.open);
            prop_assert_eq!(ohlc.high, candle.high);
            prop_assert_eq!(ohlc.low, candle.low);
            prop_assert_eq!(ohlc.close, candle.close);
        }
    }

    #[test]
    fn volume_format_is_per_candle(candles in ascending_candles()) {
        let volume = format_volume_default(&candles);
        prop_assert_eq!(volume.len(), candles.len());
        for (point, candle) in volume.iter().zip(&candles) {
            prop_assert_eq!(point.time, candle.time);
            prop_assert_eq!(point.value, candle.volume);
        }
    }
}
