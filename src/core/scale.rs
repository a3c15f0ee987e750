use crate::core::types::Viewport;
use crate::error::{ChartError, ChartResult};

/// Linear mapping between a value domain and a pixel extent.
///
/// Horizontal mapping grows left to right over the viewport width; vertical
/// mapping grows bottom to top over the viewport height, so larger values land
/// on smaller `y` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn domain_to_pixel(self, value: f64, viewport: Viewport) -> ChartResult<f64> {
        let normalized = self.normalize(value, viewport)?;
        Ok(normalized * f64::from(viewport.width))
    }

    pub fn pixel_to_domain(self, pixel: f64, viewport: Viewport) -> ChartResult<f64> {
        ensure_viewport(viewport)?;
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let normalized = pixel / f64::from(viewport.width);
        Ok(self.domain_start + normalized * self.span())
    }

    pub fn domain_to_pixel_y(self, value: f64, viewport: Viewport) -> ChartResult<f64> {
        let normalized = self.normalize(value, viewport)?;
        Ok((1.0 - normalized) * f64::from(viewport.height))
    }

    pub fn pixel_y_to_domain(self, pixel: f64, viewport: Viewport) -> ChartResult<f64> {
        ensure_viewport(viewport)?;
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let normalized = 1.0 - pixel / f64::from(viewport.height);
        Ok(self.domain_start + normalized * self.span())
    }

    fn span(self) -> f64 {
        self.domain_end - self.domain_start
    }

    fn normalize(self, value: f64, viewport: Viewport) -> ChartResult<f64> {
        ensure_viewport(viewport)?;
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }
        Ok((value - self.domain_start) / self.span())
    }
}

fn ensure_viewport(viewport: Viewport) -> ChartResult<()> {
    if viewport.is_valid() {
        Ok(())
    } else {
        Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        })
    }
}
