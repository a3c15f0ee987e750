use crate::core::{Color, TimeScale, Viewport, VolumePoint};
use crate::error::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};

/// Volume bar geometry, anchored at the bottom of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBar {
    pub x_left: f64,
    pub x_right: f64,
    pub y_top: f64,
    pub y_bottom: f64,
    pub color: Color,
}

/// Projects volume samples into bars occupying the lower
/// `height_ratio` of the viewport, scaled against the largest volume.
pub fn project_histogram_bars(
    points: &[VolumePoint],
    time_scale: TimeScale,
    viewport: Viewport,
    bar_width_px: f64,
    height_ratio: f64,
) -> ChartResult<Vec<HistogramBar>> {
    if !bar_width_px.is_finite() || bar_width_px <= 0.0 {
        return Err(ChartError::InvalidData(
            "histogram bar width must be finite and > 0".to_owned(),
        ));
    }
    if !height_ratio.is_finite() || !(0.0..=1.0).contains(&height_ratio) {
        return Err(ChartError::InvalidData(
            "histogram height ratio must be in [0, 1]".to_owned(),
        ));
    }

    let max_value = points.iter().map(|point| point.value).fold(0.0_f64, f64::max);
    if points.is_empty() || max_value <= 0.0 {
        return Ok(Vec::new());
    }

    let baseline_y = f64::from(viewport.height);
    let band_px = baseline_y * height_ratio;
    let half_width = bar_width_px * 0.5;

    let mut bars = Vec::with_capacity(points.len());
    for point in points {
        let x_center = time_scale.time_to_pixel(point.time as f64, viewport)?;
        bars.push(HistogramBar {
            x_left: x_center - half_width,
            x_right: x_center + half_width,
            y_top: baseline_y - band_px * (point.value / max_value),
            y_bottom: baseline_y,
            color: point.color,
        });
    }

    Ok(bars)
}
