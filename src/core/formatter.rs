use crate::core::{
    Candle, ChartType, OhlcPoint, SeriesPoint, ValuePoint, VolumeColors, VolumePoint,
};

/// Formats raw candles into the point shape required by `chart_type`.
///
/// Line and area charts take the close price; bar and candlestick charts
/// carry OHLC verbatim. Output order and length match the input. Empty input
/// yields an empty vector, which callers apply as a no-op.
#[must_use]
pub fn format_series(candles: &[Candle], chart_type: ChartType) -> Vec<SeriesPoint> {
    if chart_type.is_single_value() {
        candles
            .iter()
            .map(|candle| SeriesPoint::Value(ValuePoint::new(candle.time, candle.close)))
            .collect()
    } else {
        candles
            .iter()
            .map(|candle| {
                SeriesPoint::Ohlc(OhlcPoint {
                    time: candle.time,
                    open: candle.open,
                    high: candle.high,
                    low: candle.low,
                    close: candle.close,
                })
            })
            .collect()
    }
}

/// Formats candle volumes into colored histogram samples.
///
/// The color depends only on the candle itself: `up` when
/// `close >= open`, `down` otherwise.
#[must_use]
pub fn format_volume(candles: &[Candle], colors: VolumeColors) -> Vec<VolumePoint> {
    candles
        .iter()
        .map(|candle| VolumePoint {
            time: candle.time,
            value: candle.volume,
            color: if candle.is_bullish() {
                colors.up
            } else {
                colors.down
            },
        })
        .collect()
}

#[must_use]
pub fn format_volume_default(candles: &[Candle]) -> Vec<VolumePoint> {
    format_volume(candles, VolumeColors::default())
}
