use crate::core::{LinearScale, Viewport};
use crate::error::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};

/// Tuning controls for price-domain autoscaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScaleTuning {
    pub top_padding_ratio: f64,
    pub bottom_padding_ratio: f64,
    pub min_span_absolute: f64,
}

impl Default for PriceScaleTuning {
    fn default() -> Self {
        Self {
            top_padding_ratio: 0.10,
            bottom_padding_ratio: 0.10,
            min_span_absolute: 0.000_001,
        }
    }
}

impl PriceScaleTuning {
    fn validate(self) -> ChartResult<Self> {
        if !self.top_padding_ratio.is_finite()
            || !self.bottom_padding_ratio.is_finite()
            || self.top_padding_ratio < 0.0
            || self.bottom_padding_ratio < 0.0
        {
            return Err(ChartError::InvalidData(
                "price scale padding ratios must be finite and >= 0".to_owned(),
            ));
        }

        if !self.min_span_absolute.is_finite() || self.min_span_absolute <= 0.0 {
            return Err(ChartError::InvalidData(
                "price scale min span must be finite and > 0".to_owned(),
            ));
        }

        Ok(self)
    }
}

/// Price axis model mapped to an inverted Y pixel axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    linear: LinearScale,
}

impl PriceScale {
    /// Creates a price scale from explicit min/max values.
    pub fn new(price_min: f64, price_max: f64) -> ChartResult<Self> {
        Ok(Self {
            linear: LinearScale::new(price_min, price_max)?,
        })
    }

    /// Computes a tuned price domain from `(low, high)` extents.
    pub fn from_extents(
        extents: impl IntoIterator<Item = (f64, f64)>,
        tuning: PriceScaleTuning,
    ) -> ChartResult<Self> {
        let tuning = tuning.validate()?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (low, high) in extents {
            if !low.is_finite() || !high.is_finite() {
                return Err(ChartError::InvalidData(
                    "price values must be finite".to_owned(),
                ));
            }
            min = min.min(low);
            max = max.max(high);
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(ChartError::InvalidData(
                "price scale cannot be built from empty data".to_owned(),
            ));
        }

        let mut span = max - min;
        if span < tuning.min_span_absolute {
            let center = (min + max) / 2.0;
            span = tuning.min_span_absolute;
            min = center - span / 2.0;
            max = center + span / 2.0;
        }
        Self::new(
            min - span * tuning.bottom_padding_ratio,
            max + span * tuning.top_padding_ratio,
        )
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.linear.domain()
    }

    pub fn price_to_pixel(self, price: f64, viewport: Viewport) -> ChartResult<f64> {
        self.linear.domain_to_pixel_y(price, viewport)
    }

    pub fn pixel_to_price(self, pixel: f64, viewport: Viewport) -> ChartResult<f64> {
        self.linear.pixel_y_to_domain(pixel, viewport)
    }
}
