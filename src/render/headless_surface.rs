use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ChartSurface, Screenshot, ScreenshotFormat, SeriesData, SeriesId, SeriesKind, SeriesStore,
    SeriesStyle, SurfaceOptions,
};

/// In-memory surface used by tests and headless hosts.
///
/// It validates everything it receives like a real backend would and keeps
/// the resulting scene inspectable. Scene capture is opt-in; without it
/// `take_screenshot` reports the capability as unsupported.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    store: SeriesStore,
    scene_capture: bool,
}

impl HeadlessSurface {
    pub fn new(viewport: Viewport) -> ChartResult<Self> {
        Ok(Self {
            store: SeriesStore::new(viewport)?,
            scene_capture: false,
        })
    }

    /// Enables `take_screenshot` as a pretty JSON dump of the scene.
    #[must_use]
    pub fn with_scene_capture(mut self) -> Self {
        self.scene_capture = true;
        self
    }

    #[must_use]
    pub fn store(&self) -> &SeriesStore {
        &self.store
    }
}

impl ChartSurface for HeadlessSurface {
    fn viewport(&self) -> Viewport {
        self.store.viewport()
    }

    fn apply_options(&mut self, options: &SurfaceOptions) -> ChartResult<()> {
        self.store.apply_options(options)
    }

    fn add_series(&mut self, kind: SeriesKind, style: &SeriesStyle) -> ChartResult<SeriesId> {
        self.store.add_series(kind, style)
    }

    fn remove_series(&mut self, id: SeriesId) -> ChartResult<()> {
        self.store.remove_series(id)
    }

    fn apply_series_style(&mut self, id: SeriesId, style: &SeriesStyle) -> ChartResult<()> {
        self.store.apply_series_style(id, style)
    }

    fn set_series_data(&mut self, id: SeriesId, data: SeriesData) -> ChartResult<()> {
        self.store.set_series_data(id, data)
    }

    fn fit_content(&mut self) {
        self.store.fit_content();
    }

    fn scroll_to_real_time(&mut self) {
        self.store.scroll_to_real_time();
    }

    fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.store.resize(viewport)
    }

    fn take_screenshot(&mut self) -> ChartResult<Screenshot> {
        if !self.scene_capture {
            return Err(ChartError::Unsupported(
                "headless surface has scene capture disabled".to_owned(),
            ));
        }
        let bytes = serde_json::to_vec_pretty(&self.store.scene())
            .map_err(|e| ChartError::Surface(format!("failed to serialize scene: {e}")))?;
        Ok(Screenshot {
            viewport: self.store.viewport(),
            format: ScreenshotFormat::SceneJson,
            bytes,
        })
    }
}
