mod headless_surface;
mod series;
mod series_store;

pub use crate::core::Color;
pub use headless_surface::HeadlessSurface;
pub use series::{
    RIGHT_PRICE_SCALE, Screenshot, ScreenshotFormat, SeriesData, SeriesId, SeriesKind,
    SeriesStyle, SurfaceOptions, VOLUME_PRICE_SCALE,
};
pub use series_store::{SeriesStore, StoredSeries, SurfaceScene};

use crate::core::{InstanceId, Viewport};
use crate::error::{ChartError, ChartResult};

/// Contract implemented by any rendering surface a chart instance draws on.
///
/// A surface owns the visual series objects; the chart instance only keeps
/// the `SeriesId` handles it was given. Series data handed to a surface is
/// always ascending by time without duplicates.
pub trait ChartSurface {
    fn viewport(&self) -> Viewport;

    fn apply_options(&mut self, options: &SurfaceOptions) -> ChartResult<()>;

    fn add_series(&mut self, kind: SeriesKind, style: &SeriesStyle) -> ChartResult<SeriesId>;

    fn remove_series(&mut self, id: SeriesId) -> ChartResult<()>;

    fn apply_series_style(&mut self, id: SeriesId, style: &SeriesStyle) -> ChartResult<()>;

    fn set_series_data(&mut self, id: SeriesId, data: SeriesData) -> ChartResult<()>;

    /// Re-fits the visible time range to the current data extent.
    fn fit_content(&mut self);

    fn scroll_to_real_time(&mut self);

    fn resize(&mut self, viewport: Viewport) -> ChartResult<()>;

    /// Captures the surface. Surfaces without a capture capability return
    /// `ChartError::Unsupported`.
    fn take_screenshot(&mut self) -> ChartResult<Screenshot> {
        Err(ChartError::Unsupported(
            "surface does not support screenshots".to_owned(),
        ))
    }
}

/// Creates the surface for a newly added grid cell.
pub trait SurfaceFactory<S: ChartSurface> {
    fn create_surface(&mut self, instance_id: InstanceId, viewport: Viewport) -> ChartResult<S>;
}

impl<S, F> SurfaceFactory<S> for F
where
    S: ChartSurface,
    F: FnMut(InstanceId, Viewport) -> ChartResult<S>,
{
    fn create_surface(&mut self, instance_id: InstanceId, viewport: Viewport) -> ChartResult<S> {
        self(instance_id, viewport)
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_surface;
#[cfg(feature = "cairo-backend")]
pub use cairo_surface::{CairoRenderStats, CairoSurface};
