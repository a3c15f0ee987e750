use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{ChartType, Color, SeriesPoint, ThemePalette, Viewport, VolumePoint};
use crate::error::{ChartError, ChartResult};

/// Surface-local handle of one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(pub u64);

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "series#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Candlestick,
    Bar,
    Line,
    Area,
    Histogram,
}

impl From<ChartType> for SeriesKind {
    fn from(chart_type: ChartType) -> Self {
        match chart_type {
            ChartType::Candlestick => Self::Candlestick,
            ChartType::Bar => Self::Bar,
            ChartType::Line => Self::Line,
            ChartType::Area => Self::Area,
        }
    }
}

pub const RIGHT_PRICE_SCALE: &str = "right";
pub const VOLUME_PRICE_SCALE: &str = "volume";

/// Visual options of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub color: Color,
    pub up_color: Color,
    pub down_color: Color,
    pub top_color: Color,
    pub bottom_color: Color,
    pub line_width: f64,
    pub price_scale_id: String,
}

impl SeriesStyle {
    /// Style of the main price series for the given chart type and theme.
    #[must_use]
    pub fn main(chart_type: ChartType, palette: &ThemePalette) -> Self {
        Self {
            color: palette.line,
            up_color: palette.up,
            down_color: palette.down,
            top_color: palette.area_top,
            bottom_color: palette.area_bottom,
            line_width: if chart_type.is_single_value() { 2.0 } else { 1.0 },
            price_scale_id: RIGHT_PRICE_SCALE.to_owned(),
        }
    }

    /// Style of the volume histogram; per-bar colors travel with the data.
    #[must_use]
    pub fn volume(palette: &ThemePalette) -> Self {
        Self {
            color: palette.volume.up,
            up_color: palette.volume.up,
            down_color: palette.volume.down,
            top_color: palette.volume.up,
            bottom_color: palette.volume.down,
            line_width: 1.0,
            price_scale_id: VOLUME_PRICE_SCALE.to_owned(),
        }
    }

    /// Single-color overlay line.
    #[must_use]
    pub fn overlay(color: Color, line_width: f64, price_scale_id: impl Into<String>) -> Self {
        Self {
            color,
            up_color: color,
            down_color: color,
            top_color: color,
            bottom_color: color,
            line_width,
            price_scale_id: price_scale_id.into(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        for color in [
            self.color,
            self.up_color,
            self.down_color,
            self.top_color,
            self.bottom_color,
        ] {
            color.validate()?;
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "series line width must be finite and > 0".to_owned(),
            ));
        }
        if self.price_scale_id.trim().is_empty() {
            return Err(ChartError::InvalidData(
                "series price scale id must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Data pushed into one series. Always ascending by time without duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeriesData {
    Points(Vec<SeriesPoint>),
    Volume(Vec<VolumePoint>),
}

impl SeriesData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Points(points) => points.len(),
            Self::Volume(points) => points.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn times(&self) -> Box<dyn Iterator<Item = i64> + '_> {
        match self {
            Self::Points(points) => Box::new(points.iter().map(SeriesPoint::time)),
            Self::Volume(points) => Box::new(points.iter().map(|point| point.time)),
        }
    }

    #[must_use]
    pub fn last_time(&self) -> Option<i64> {
        match self {
            Self::Points(points) => points.last().map(SeriesPoint::time),
            Self::Volume(points) => points.last().map(|point| point.time),
        }
    }

    /// Rejects data a surface cannot draw: unsorted or duplicated timestamps.
    pub fn validate_order(&self) -> ChartResult<()> {
        let mut previous: Option<i64> = None;
        for time in self.times() {
            if previous.is_some_and(|prev| time <= prev) {
                return Err(ChartError::InvalidData(format!(
                    "series data must be strictly ascending by time (at t={time})"
                )));
            }
            previous = Some(time);
        }
        Ok(())
    }
}

/// Surface-level visual options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceOptions {
    pub background: Color,
    pub grid: Color,
    pub text: Color,
    /// Reduced label density for small grid cells.
    pub compact: bool,
    pub watermark: Option<String>,
}

impl SurfaceOptions {
    #[must_use]
    pub fn from_palette(palette: &ThemePalette, compact: bool) -> Self {
        Self {
            background: palette.background,
            grid: palette.grid,
            text: palette.text,
            compact,
            watermark: None,
        }
    }

    #[must_use]
    pub fn with_watermark(mut self, watermark: impl Into<String>) -> Self {
        self.watermark = Some(watermark.into());
        self
    }

    #[must_use]
    pub fn font_size_px(&self) -> f64 {
        if self.compact { 10.0 } else { 12.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotFormat {
    Png,
    /// Pretty JSON dump of the surface scene.
    SceneJson,
}

/// Captured image of one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub viewport: Viewport,
    pub format: ScreenshotFormat,
    pub bytes: Vec<u8>,
}
