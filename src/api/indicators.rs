use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Color, ThemePalette, ValuePoint};
use crate::render::{RIGHT_PRICE_SCALE, SeriesId, SeriesStyle};

/// Optional overrides for an indicator overlay.
///
/// Unset fields fall back to the theme line color, a 1px line and the right
/// price scale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_scale_id: Option<String>,
}

impl IndicatorOptions {
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = Some(line_width);
        self
    }

    #[must_use]
    pub fn with_price_scale_id(mut self, price_scale_id: impl Into<String>) -> Self {
        self.price_scale_id = Some(price_scale_id.into());
        self
    }

    #[must_use]
    pub fn resolve(&self, palette: &ThemePalette) -> SeriesStyle {
        SeriesStyle::overlay(
            self.color.unwrap_or(palette.line),
            self.line_width.unwrap_or(1.0),
            self.price_scale_id
                .clone()
                .unwrap_or_else(|| RIGHT_PRICE_SCALE.to_owned()),
        )
    }
}

/// Named overlay line owned by one chart instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub name: String,
    #[serde(flatten)]
    pub options: IndicatorOptions,
    #[serde(default)]
    pub data: Vec<ValuePoint>,
}

impl IndicatorSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<ValuePoint>) -> Self {
        Self {
            name: name.into(),
            options: IndicatorOptions::default(),
            data,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: IndicatorOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RegisteredIndicator {
    pub series_id: SeriesId,
    pub indicator: IndicatorSeries,
}

/// Name-keyed indicators of one instance, in registration order.
#[derive(Debug, Clone, Default)]
pub(crate) struct IndicatorRegistry {
    entries: IndexMap<String, RegisteredIndicator>,
}

impl IndicatorRegistry {
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredIndicator> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, series_id: SeriesId, indicator: IndicatorSeries) {
        self.entries.insert(
            indicator.name.clone(),
            RegisteredIndicator {
                series_id,
                indicator,
            },
        );
    }

    pub fn remove(&mut self, name: &str) -> Option<RegisteredIndicator> {
        self.entries.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredIndicator> {
        self.entries.values()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = RegisteredIndicator> + '_ {
        self.entries.drain(..).map(|(_, entry)| entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChartTheme;

    #[test]
    fn unset_options_fall_back_to_theme_defaults() {
        let palette = ChartTheme::Dark.palette();
        let style = IndicatorOptions::default().resolve(&palette);
        assert_eq!(style.color, palette.line);
        assert_eq!(style.line_width, 1.0);
        assert_eq!(style.price_scale_id, RIGHT_PRICE_SCALE);
    }

    #[test]
    fn explicit_options_override_defaults() {
        let palette = ChartTheme::Light.palette();
        let color = Color::rgb(1.0, 0.5, 0.0);
        let style = IndicatorOptions::default()
            .with_color(color)
            .with_line_width(3.0)
            .with_price_scale_id("left")
            .resolve(&palette);
        assert_eq!(style.color, color);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.price_scale_id, "left");
    }
}
