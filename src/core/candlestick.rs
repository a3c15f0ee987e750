use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::{OhlcPoint, PriceScale, TimeScale, Viewport};
use crate::error::{ChartError, ChartResult};

/// Projected candle geometry in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleGeometry {
    pub center_x: f64,
    pub body_left: f64,
    pub body_right: f64,
    pub body_top: f64,
    pub body_bottom: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub is_bullish: bool,
}

/// Projects OHLC samples into candlestick geometry.
pub fn project_candles(
    points: &[OhlcPoint],
    time_scale: TimeScale,
    price_scale: PriceScale,
    viewport: Viewport,
    body_width_px: f64,
) -> ChartResult<Vec<CandleGeometry>> {
    if !body_width_px.is_finite() || body_width_px <= 0.0 {
        return Err(ChartError::InvalidData(
            "body width must be finite and > 0".to_owned(),
        ));
    }

    #[cfg(feature = "parallel-projection")]
    {
        points
            .par_iter()
            .map(|point| {
                project_single_candle(*point, time_scale, price_scale, viewport, body_width_px)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        points
            .iter()
            .map(|point| {
                project_single_candle(*point, time_scale, price_scale, viewport, body_width_px)
            })
            .collect()
    }
}

fn project_single_candle(
    point: OhlcPoint,
    time_scale: TimeScale,
    price_scale: PriceScale,
    viewport: Viewport,
    body_width_px: f64,
) -> ChartResult<CandleGeometry> {
    let half = body_width_px / 2.0;
    let center_x = time_scale.time_to_pixel(point.time as f64, viewport)?;
    let open_y = price_scale.price_to_pixel(point.open, viewport)?;
    let close_y = price_scale.price_to_pixel(point.close, viewport)?;

    Ok(CandleGeometry {
        center_x,
        body_left: center_x - half,
        body_right: center_x + half,
        body_top: open_y.min(close_y),
        body_bottom: open_y.max(close_y),
        wick_top: price_scale.price_to_pixel(point.high, viewport)?,
        wick_bottom: price_scale.price_to_pixel(point.low, viewport)?,
        is_bullish: point.close >= point.open,
    })
}
