use crate::core::{PriceScale, TimeScale, ValuePoint, Viewport};
use crate::error::ChartResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaVertex {
    pub x: f64,
    pub y: f64,
}

/// Area-series geometry.
///
/// `line_points` follows the mapped data points.
/// `fill_polygon` is an explicitly closed polygon against the viewport bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaGeometry {
    pub line_points: Vec<AreaVertex>,
    pub fill_polygon: Vec<AreaVertex>,
}

pub fn project_area_geometry(
    points: &[ValuePoint],
    time_scale: TimeScale,
    price_scale: PriceScale,
    viewport: Viewport,
) -> ChartResult<AreaGeometry> {
    if points.is_empty() {
        return Ok(AreaGeometry::default());
    }

    let mut line_points = Vec::with_capacity(points.len());
    for point in points {
        line_points.push(AreaVertex {
            x: time_scale.time_to_pixel(point.time as f64, viewport)?,
            y: price_scale.price_to_pixel(point.value, viewport)?,
        });
    }

    let baseline_y = f64::from(viewport.height);
    let first_x = line_points[0].x;
    let last_x = line_points[line_points.len() - 1].x;

    let mut fill_polygon = Vec::with_capacity(line_points.len() + 3);
    fill_polygon.push(AreaVertex {
        x: first_x,
        y: baseline_y,
    });
    fill_polygon.extend(line_points.iter().copied());
    fill_polygon.push(AreaVertex {
        x: last_x,
        y: baseline_y,
    });
    // Closing vertex repeats the first baseline vertex.
    fill_polygon.push(AreaVertex {
        x: first_x,
        y: baseline_y,
    });

    Ok(AreaGeometry {
        line_points,
        fill_polygon,
    })
}
