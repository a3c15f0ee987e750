use crate::core::{PriceScale, TimeScale, ValuePoint, Viewport};
use crate::error::ChartResult;
use serde::{Deserialize, Serialize};

/// Projected line segment in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Projects value points into adjacent line segments.
///
/// Fewer than two points produce no segments.
pub fn project_line_segments(
    points: &[ValuePoint],
    time_scale: TimeScale,
    price_scale: PriceScale,
    viewport: Viewport,
) -> ChartResult<Vec<LineSegment>> {
    if points.len() < 2 {
        return Ok(Vec::new());
    }

    let mut mapped = Vec::with_capacity(points.len());
    for point in points {
        let x = time_scale.time_to_pixel(point.time as f64, viewport)?;
        let y = price_scale.price_to_pixel(point.value, viewport)?;
        mapped.push((x, y));
    }

    Ok(mapped
        .windows(2)
        .map(|pair| LineSegment {
            x1: pair[0].0,
            y1: pair[0].1,
            x2: pair[1].0,
            y2: pair[1].1,
        })
        .collect())
}
