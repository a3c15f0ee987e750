use serde::{Deserialize, Serialize};

use crate::core::{Candle, ChartTheme, ChartType, Color, Timeframe, ValuePoint, Viewport};
use crate::error::{ChartError, ChartResult};

use super::IndicatorSeries;

/// User drawing attached to a chart (trend line, horizontal level, ...).
///
/// Drawings are carried with the instance so hosts can round-trip them, but
/// the chart instance does not render them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub kind: String,
    #[serde(default)]
    pub points: Vec<ValuePoint>,
    #[serde(default)]
    pub color: Option<Color>,
}

/// Construction-time configuration of one chart instance.
///
/// Serializable so hosts can keep chart setup in config files; callbacks are
/// registered on the instance itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartInstanceOptions {
    pub symbol: String,
    #[serde(default)]
    pub timeframe: Timeframe,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Candle>,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_true")]
    pub show_toolbar: bool,
    #[serde(default = "default_true")]
    pub show_legend: bool,
    #[serde(default = "default_true")]
    pub show_volume: bool,
    #[serde(default)]
    pub theme: ChartTheme,
    #[serde(default)]
    pub chart_type: ChartType,
    #[serde(default)]
    pub compact: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indicators: Vec<IndicatorSeries>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drawings: Vec<Drawing>,
}

impl ChartInstanceOptions {
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: Timeframe::default(),
            data: Vec::new(),
            width: default_width(),
            height: default_height(),
            show_toolbar: true,
            show_legend: true,
            show_volume: true,
            theme: ChartTheme::default(),
            chart_type: ChartType::default(),
            compact: false,
            indicators: Vec::new(),
            drawings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Vec<Candle>) -> Self {
        self.data = data;
        self
    }

    /// Initial surface size. Width follows the host afterwards; height stays.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_chart_type(mut self, chart_type: ChartType) -> Self {
        self.chart_type = chart_type;
        self
    }

    #[must_use]
    pub fn with_toolbar(mut self, show: bool) -> Self {
        self.show_toolbar = show;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    #[must_use]
    pub fn with_volume(mut self, show: bool) -> Self {
        self.show_volume = show;
        self
    }

    #[must_use]
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    #[must_use]
    pub fn with_indicator(mut self, indicator: IndicatorSeries) -> Self {
        self.indicators.push(indicator);
        self
    }

    #[must_use]
    pub fn with_drawing(mut self, drawing: Drawing) -> Self {
        self.drawings.push(drawing);
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(ChartError::InvalidData(
                "chart symbol must not be empty".to_owned(),
            ));
        }
        if !self.viewport().is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Serializes options to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize options: {e}")))
    }

    /// Deserializes options from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse options: {e}")))
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    400
}

fn default_true() -> bool {
    true
}
