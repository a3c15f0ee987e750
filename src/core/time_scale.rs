use crate::core::{LinearScale, Viewport};
use crate::error::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};

/// Padding applied when fitting the visible range to content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScaleTuning {
    pub left_padding_ratio: f64,
    pub right_padding_ratio: f64,
    pub min_span_absolute: f64,
}

impl Default for TimeScaleTuning {
    fn default() -> Self {
        Self {
            left_padding_ratio: 0.0,
            right_padding_ratio: 0.05,
            min_span_absolute: 1.0,
        }
    }
}

impl TimeScaleTuning {
    fn validate(self) -> ChartResult<Self> {
        if !self.left_padding_ratio.is_finite()
            || !self.right_padding_ratio.is_finite()
            || self.left_padding_ratio < 0.0
            || self.right_padding_ratio < 0.0
        {
            return Err(ChartError::InvalidData(
                "time scale padding ratios must be finite and >= 0".to_owned(),
            ));
        }

        if !self.min_span_absolute.is_finite() || self.min_span_absolute <= 0.0 {
            return Err(ChartError::InvalidData(
                "time scale min span must be finite and > 0".to_owned(),
            ));
        }

        Ok(self)
    }
}

/// Time axis model with separate content and visible ranges.
///
/// `full_*` tracks the extent of the data last fitted.
/// `visible_*` is what the surface currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    full_start: f64,
    full_end: f64,
    visible_start: f64,
    visible_end: f64,
}

impl Default for TimeScale {
    fn default() -> Self {
        Self {
            full_start: 0.0,
            full_end: 1.0,
            visible_start: 0.0,
            visible_end: 1.0,
        }
    }
}

impl TimeScale {
    /// Creates a scale with matching full and visible ranges.
    pub fn new(time_start: f64, time_end: f64) -> ChartResult<Self> {
        let (start, end) = normalize_range(time_start, time_end, 1.0)?;
        Ok(Self {
            full_start: start,
            full_end: end,
            visible_start: start,
            visible_end: end,
        })
    }

    /// Builds a scale whose visible range fits `times` plus tuning padding.
    ///
    /// Returns `Ok(None)` for an empty iterator: there is nothing to fit.
    pub fn fit_times(
        times: impl IntoIterator<Item = i64>,
        tuning: TimeScaleTuning,
    ) -> ChartResult<Option<Self>> {
        let tuning = tuning.validate()?;
        let mut min = i64::MAX;
        let mut max = i64::MIN;
        let mut any = false;
        for time in times {
            any = true;
            min = min.min(time);
            max = max.max(time);
        }
        if !any {
            return Ok(None);
        }

        let (full_start, full_end) =
            normalize_range(min as f64, max as f64, tuning.min_span_absolute)?;
        let full_span = full_end - full_start;
        Ok(Some(Self {
            full_start,
            full_end,
            visible_start: full_start - full_span * tuning.left_padding_ratio,
            visible_end: full_end + full_span * tuning.right_padding_ratio,
        }))
    }

    #[must_use]
    pub fn full_range(self) -> (f64, f64) {
        (self.full_start, self.full_end)
    }

    #[must_use]
    pub fn visible_range(self) -> (f64, f64) {
        (self.visible_start, self.visible_end)
    }

    /// Overrides the visible range without modifying the full fitted range.
    pub fn set_visible_range(&mut self, start: f64, end: f64) -> ChartResult<()> {
        let (start, end) = normalize_range(start, end, 1e-9)?;
        self.visible_start = start;
        self.visible_end = end;
        Ok(())
    }

    /// Pans the visible range by an additive time delta.
    pub fn pan_visible_by_delta(&mut self, delta_time: f64) -> ChartResult<()> {
        if !delta_time.is_finite() {
            return Err(ChartError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }

        self.visible_start += delta_time;
        self.visible_end += delta_time;
        Ok(())
    }

    /// Keeps the visible span and moves it so the latest sample sits at the
    /// right edge, preserving the current right-side padding ratio.
    pub fn scroll_to_real_time(
        &mut self,
        latest_time: i64,
        tuning: TimeScaleTuning,
    ) -> ChartResult<()> {
        let tuning = tuning.validate()?;
        let span = self.visible_end - self.visible_start;
        let latest = latest_time as f64;
        let right_padding = span * tuning.right_padding_ratio / (1.0 + tuning.right_padding_ratio);
        let end = latest + right_padding;
        self.set_visible_range(end - span, end)
    }

    pub fn time_to_pixel(self, time: f64, viewport: Viewport) -> ChartResult<f64> {
        self.visible_linear()?.domain_to_pixel(time, viewport)
    }

    pub fn pixel_to_time(self, pixel: f64, viewport: Viewport) -> ChartResult<f64> {
        self.visible_linear()?.pixel_to_domain(pixel, viewport)
    }

    fn visible_linear(self) -> ChartResult<LinearScale> {
        LinearScale::new(self.visible_start, self.visible_end)
    }
}

fn normalize_range(start: f64, end: f64, min_span: f64) -> ChartResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidData(
            "scale range must be finite".to_owned(),
        ));
    }

    if start == end {
        let half = min_span / 2.0;
        return Ok((start - half, end + half));
    }

    Ok((start.min(end), start.max(end)))
}
