use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{TimeScale, TimeScaleTuning, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{SeriesData, SeriesId, SeriesKind, SeriesStyle, SurfaceOptions};

/// One series as held by a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSeries {
    pub kind: SeriesKind,
    pub style: SeriesStyle,
    pub data: SeriesData,
}

/// Serializable view of everything a surface currently shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceScene {
    pub viewport: Viewport,
    pub options: Option<SurfaceOptions>,
    pub time_visible_range: (f64, f64),
    pub series: Vec<(SeriesId, StoredSeries)>,
}

/// Series bookkeeping shared by the surface backends.
///
/// Keeps insertion order so backends draw series in creation order.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    viewport: Viewport,
    options: Option<SurfaceOptions>,
    series: IndexMap<SeriesId, StoredSeries>,
    next_id: u64,
    time_scale: TimeScale,
    time_tuning: TimeScaleTuning,
    fit_content_count: usize,
    scroll_to_real_time_count: usize,
}

impl SeriesStore {
    pub fn new(viewport: Viewport) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(Self {
            viewport,
            options: None,
            series: IndexMap::new(),
            next_id: 1,
            time_scale: TimeScale::default(),
            time_tuning: TimeScaleTuning::default(),
            fit_content_count: 0,
            scroll_to_real_time_count: 0,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn options(&self) -> Option<&SurfaceOptions> {
        self.options.as_ref()
    }

    #[must_use]
    pub fn time_scale(&self) -> TimeScale {
        self.time_scale
    }

    #[must_use]
    pub fn series(&self, id: SeriesId) -> Option<&StoredSeries> {
        self.series.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SeriesId, &StoredSeries)> {
        self.series.iter().map(|(id, series)| (*id, series))
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn fit_content_count(&self) -> usize {
        self.fit_content_count
    }

    #[must_use]
    pub fn scroll_to_real_time_count(&self) -> usize {
        self.scroll_to_real_time_count
    }

    pub fn apply_options(&mut self, options: &SurfaceOptions) -> ChartResult<()> {
        options.background.validate()?;
        options.grid.validate()?;
        options.text.validate()?;
        self.options = Some(options.clone());
        debug!(compact = options.compact, "surface options applied");
        Ok(())
    }

    pub fn add_series(&mut self, kind: SeriesKind, style: &SeriesStyle) -> ChartResult<SeriesId> {
        style.validate()?;
        let id = SeriesId(self.next_id);
        self.next_id += 1;
        let data = match kind {
            SeriesKind::Histogram => SeriesData::Volume(Vec::new()),
            _ => SeriesData::Points(Vec::new()),
        };
        self.series.insert(
            id,
            StoredSeries {
                kind,
                style: style.clone(),
                data,
            },
        );
        debug!(%id, ?kind, "series added");
        Ok(id)
    }

    pub fn remove_series(&mut self, id: SeriesId) -> ChartResult<()> {
        if self.series.shift_remove(&id).is_none() {
            return Err(unknown_series(id));
        }
        debug!(%id, "series removed");
        Ok(())
    }

    pub fn apply_series_style(&mut self, id: SeriesId, style: &SeriesStyle) -> ChartResult<()> {
        style.validate()?;
        let series = self.series.get_mut(&id).ok_or_else(|| unknown_series(id))?;
        series.style = style.clone();
        Ok(())
    }

    pub fn set_series_data(&mut self, id: SeriesId, data: SeriesData) -> ChartResult<()> {
        data.validate_order()?;
        let series = self.series.get_mut(&id).ok_or_else(|| unknown_series(id))?;
        let matches_kind = matches!(
            (series.kind, &data),
            (SeriesKind::Histogram, SeriesData::Volume(_))
                | (
                    SeriesKind::Candlestick
                        | SeriesKind::Bar
                        | SeriesKind::Line
                        | SeriesKind::Area,
                    SeriesData::Points(_)
                )
        );
        if !matches_kind {
            return Err(ChartError::InvalidData(format!(
                "data shape does not match {:?} series",
                series.kind
            )));
        }
        trace!(%id, len = data.len(), "series data set");
        series.data = data;
        Ok(())
    }

    /// Fits the visible time range to the extent of every series' data.
    /// Leaves the range untouched when no series holds data.
    pub fn fit_content(&mut self) {
        self.fit_content_count += 1;
        let times = self.series.values().flat_map(|series| series.data.times());
        match TimeScale::fit_times(times, self.time_tuning) {
            Ok(Some(fitted)) => self.time_scale = fitted,
            Ok(None) => trace!("fit content skipped: no data"),
            Err(err) => debug!(error = %err, "fit content skipped"),
        }
    }

    pub fn scroll_to_real_time(&mut self) {
        self.scroll_to_real_time_count += 1;
        let Some(latest) = self
            .series
            .values()
            .filter_map(|series| series.data.last_time())
            .max()
        else {
            return;
        };
        if let Err(err) = self.time_scale.scroll_to_real_time(latest, self.time_tuning) {
            debug!(error = %err, "scroll to real time skipped");
        }
    }

    pub fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = viewport;
        Ok(())
    }

    #[must_use]
    pub fn scene(&self) -> SurfaceScene {
        SurfaceScene {
            viewport: self.viewport,
            options: self.options.clone(),
            time_visible_range: self.time_scale.visible_range(),
            series: self
                .series
                .iter()
                .map(|(id, series)| (*id, series.clone()))
                .collect(),
        }
    }
}

fn unknown_series(id: SeriesId) -> ChartError {
    ChartError::InvalidData(format!("unknown {id}"))
}
