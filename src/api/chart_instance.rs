use std::fmt;

use tracing::{debug, trace, warn};

use crate::core::{
    Candle, ChartTheme, ChartType, SeriesPoint, ThemePalette, Timeframe, ValuePoint, Viewport,
    canonicalize_candles, canonicalize_values, format_series, format_volume,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{CrosshairPoint, CrosshairState, LegendValues};
use crate::render::{
    ChartSurface, Screenshot, SeriesData, SeriesId, SeriesKind, SeriesStyle, SurfaceOptions,
};

use super::indicators::IndicatorRegistry;
use super::{ChartInstanceOptions, Drawing, IndicatorOptions, IndicatorSeries};

type SymbolCallback = Box<dyn FnMut(&str)>;
type TimeframeCallback = Box<dyn FnMut(Timeframe)>;

/// Surface handles currently owned by one chart instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeriesIds {
    pub main: SeriesId,
    pub volume: Option<SeriesId>,
    pub indicators: Vec<(String, SeriesId)>,
}

/// Controller for one grid cell: a surface plus every series drawn on it.
///
/// The instance owns the main price series, the optional volume histogram
/// and all indicator overlays. Held candles are always canonical, so every
/// series pushed to the surface is ascending by time without duplicates.
pub struct ChartInstance<S: ChartSurface> {
    surface: S,
    symbol: String,
    timeframe: Timeframe,
    theme: ChartTheme,
    chart_type: ChartType,
    height: u32,
    show_toolbar: bool,
    show_legend: bool,
    compact: bool,
    candles: Vec<Candle>,
    main_series: SeriesId,
    volume_series: Option<SeriesId>,
    indicators: IndicatorRegistry,
    drawings: Vec<Drawing>,
    crosshair: CrosshairState,
    symbol_change: Option<SymbolCallback>,
    timeframe_change: Option<TimeframeCallback>,
    disposed: bool,
}

impl<S: ChartSurface> ChartInstance<S> {
    /// Sets up `surface` from `options`: theme, size, main and volume series,
    /// initial data and initial indicators.
    pub fn new(mut surface: S, options: ChartInstanceOptions) -> ChartResult<Self> {
        options.validate()?;
        let palette = options.theme.palette();

        surface.resize(options.viewport())?;
        surface.apply_options(&surface_options(&palette, options.compact, &options.symbol))?;
        let main_series = surface.add_series(
            SeriesKind::from(options.chart_type),
            &SeriesStyle::main(options.chart_type, &palette),
        )?;
        let volume_series = if options.show_volume {
            Some(surface.add_series(SeriesKind::Histogram, &SeriesStyle::volume(&palette))?)
        } else {
            None
        };

        let ChartInstanceOptions {
            symbol,
            timeframe,
            data,
            height,
            show_toolbar,
            show_legend,
            theme,
            chart_type,
            compact,
            indicators,
            drawings,
            ..
        } = options;

        let mut instance = Self {
            surface,
            symbol,
            timeframe,
            theme,
            chart_type,
            height,
            show_toolbar,
            show_legend,
            compact,
            candles: Vec::new(),
            main_series,
            volume_series,
            indicators: IndicatorRegistry::default(),
            drawings,
            crosshair: CrosshairState::Idle,
            symbol_change: None,
            timeframe_change: None,
            disposed: false,
        };
        instance.set_data(data)?;
        for indicator in indicators {
            instance.add_indicator(indicator.name, indicator.data, indicator.options)?;
        }

        debug!(
            symbol = %instance.symbol,
            timeframe = %instance.timeframe,
            chart_type = %instance.chart_type,
            candles = instance.candles.len(),
            "chart instance created"
        );
        Ok(instance)
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    #[must_use]
    pub fn theme(&self) -> ChartTheme {
        self.theme
    }

    #[must_use]
    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    #[must_use]
    pub fn show_toolbar(&self) -> bool {
        self.show_toolbar
    }

    #[must_use]
    pub fn is_compact(&self) -> bool {
        self.compact
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Canonical candles currently held.
    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Drawings passed at construction. They are kept for the host and not
    /// drawn by the instance.
    #[must_use]
    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    #[must_use]
    pub fn crosshair(&self) -> CrosshairState {
        self.crosshair
    }

    /// The underlying surface.
    #[must_use]
    pub fn chart(&self) -> &S {
        &self.surface
    }

    pub fn chart_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn series(&self) -> ChartSeriesIds {
        ChartSeriesIds {
            main: self.main_series,
            volume: self.volume_series,
            indicators: self
                .indicators
                .iter()
                .map(|entry| (entry.indicator.name.clone(), entry.series_id))
                .collect(),
        }
    }

    #[must_use]
    pub fn indicator(&self, name: &str) -> Option<&IndicatorSeries> {
        self.indicators.get(name).map(|entry| &entry.indicator)
    }

    pub fn indicator_names(&self) -> impl Iterator<Item = &str> {
        self.indicators
            .iter()
            .map(|entry| entry.indicator.name.as_str())
    }

    /// Replaces the main series with one of `chart_type` and re-formats the
    /// held candles into it.
    ///
    /// The replacement series is created and filled before the old one is
    /// removed, so a failing surface leaves the previous type in place.
    pub fn set_chart_type(&mut self, chart_type: ChartType) -> ChartResult<()> {
        self.ensure_live()?;
        let palette = self.theme.palette();
        let replacement = self.surface.add_series(
            SeriesKind::from(chart_type),
            &SeriesStyle::main(chart_type, &palette),
        )?;
        let points = format_series(&self.candles, chart_type);
        if let Err(err) = self
            .surface
            .set_series_data(replacement, SeriesData::Points(points))
        {
            if let Err(cleanup) = self.surface.remove_series(replacement) {
                warn!(error = %cleanup, "failed to drop replacement main series");
            }
            return Err(err);
        }

        let previous = std::mem::replace(&mut self.main_series, replacement);
        let previous_type = std::mem::replace(&mut self.chart_type, chart_type);
        self.surface.remove_series(previous)?;
        self.surface.fit_content();
        debug!(from = %previous_type, to = %chart_type, "chart type switched");
        Ok(())
    }

    /// Re-applies surface and series styling for `theme`. Data is untouched
    /// apart from volume bar colors, which derive from the theme.
    pub fn set_theme(&mut self, theme: ChartTheme) -> ChartResult<()> {
        self.ensure_live()?;
        let palette = theme.palette();
        self.surface
            .apply_options(&surface_options(&palette, self.compact, &self.symbol))?;
        self.surface.apply_series_style(
            self.main_series,
            &SeriesStyle::main(self.chart_type, &palette),
        )?;
        if let Some(volume) = self.volume_series {
            self.surface
                .apply_series_style(volume, &SeriesStyle::volume(&palette))?;
            self.surface.set_series_data(
                volume,
                SeriesData::Volume(format_volume(&self.candles, palette.volume)),
            )?;
        }
        for entry in self.indicators.iter() {
            self.surface
                .apply_series_style(entry.series_id, &entry.indicator.options.resolve(&palette))?;
        }
        self.theme = theme;
        debug!(?theme, "chart theme applied");
        Ok(())
    }

    /// Switches the reduced-density presentation used in multi-cell grids.
    pub fn set_compact(&mut self, compact: bool) -> ChartResult<()> {
        self.ensure_live()?;
        if compact == self.compact {
            return Ok(());
        }
        let palette = self.theme.palette();
        self.surface
            .apply_options(&surface_options(&palette, compact, &self.symbol))?;
        self.compact = compact;
        Ok(())
    }

    /// Replaces the held candles and redraws main and volume series.
    ///
    /// Input is canonicalized first. When nothing valid remains the call is
    /// a no-op: held candles, series and view stay as they are.
    pub fn set_data(&mut self, candles: Vec<Candle>) -> ChartResult<()> {
        self.ensure_live()?;
        let candles = canonicalize_candles(candles);
        if candles.is_empty() {
            debug!(symbol = %self.symbol, "empty candle set ignored");
            return Ok(());
        }
        self.candles = candles;
        self.crosshair = self.crosshair.leave();
        let palette = self.theme.palette();
        self.push_price_data(&palette)?;
        self.surface.fit_content();
        trace!(candles = self.candles.len(), "chart data replaced");
        Ok(())
    }

    /// Drops every held candle and empties the main and volume series.
    /// Indicators are left in place.
    pub fn clear(&mut self) -> ChartResult<()> {
        self.ensure_live()?;
        self.candles.clear();
        self.crosshair = self.crosshair.leave();
        let palette = self.theme.palette();
        self.push_price_data(&palette)?;
        self.surface.fit_content();
        debug!(symbol = %self.symbol, "chart data cleared");
        Ok(())
    }

    /// Adds an overlay line named `name`.
    ///
    /// Names are unique per instance; a second add under the same name fails
    /// with `ChartError::DuplicateIndicator` until the first is removed.
    pub fn add_indicator(
        &mut self,
        name: impl Into<String>,
        data: Vec<ValuePoint>,
        options: IndicatorOptions,
    ) -> ChartResult<SeriesId> {
        self.ensure_live()?;
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ChartError::InvalidData(
                "indicator name must not be empty".to_owned(),
            ));
        }
        if self.indicators.contains(&name) {
            return Err(ChartError::DuplicateIndicator { name });
        }

        let style = options.resolve(&self.theme.palette());
        let series_id = self.surface.add_series(SeriesKind::Line, &style)?;
        let data = canonicalize_values(data);
        let points = data.iter().copied().map(SeriesPoint::Value).collect();
        if let Err(err) = self
            .surface
            .set_series_data(series_id, SeriesData::Points(points))
        {
            if let Err(cleanup) = self.surface.remove_series(series_id) {
                warn!(error = %cleanup, indicator = %name, "failed to drop indicator series");
            }
            return Err(err);
        }

        debug!(indicator = %name, %series_id, points = data.len(), "indicator added");
        self.indicators.insert(
            series_id,
            IndicatorSeries {
                name,
                options,
                data,
            },
        );
        Ok(series_id)
    }

    /// Removes the indicator named `name`. Returns `false` when absent.
    pub fn remove_indicator(&mut self, name: &str) -> bool {
        let Some(entry) = self.indicators.remove(name) else {
            trace!(indicator = name, "remove of unknown indicator ignored");
            return false;
        };
        if let Err(err) = self.surface.remove_series(entry.series_id) {
            warn!(error = %err, indicator = name, "surface failed to remove indicator series");
        }
        debug!(indicator = name, "indicator removed");
        true
    }

    /// Feeds a crosshair event from the surface. `None` means the pointer
    /// left the plot.
    pub fn on_crosshair_move(&mut self, point: Option<CrosshairPoint>) {
        self.crosshair = match point {
            Some(point) => self.crosshair.hover(point, &self.candles),
            None => self.crosshair.leave(),
        };
    }

    /// Values the legend shows, or `None` when the legend is hidden or there
    /// is nothing to show.
    #[must_use]
    pub fn legend(&self) -> Option<LegendValues> {
        if !self.show_legend {
            return None;
        }
        self.crosshair.legend(&self.candles)
    }

    /// Follows the host cell width. Height stays at its construction value.
    pub fn on_viewport_width_changed(&mut self, width: u32) -> ChartResult<()> {
        self.ensure_live()?;
        if width == 0 {
            debug!("zero viewport width ignored");
            return Ok(());
        }
        self.surface.resize(Viewport::new(width, self.height))
    }

    /// Registers the callback run after the displayed symbol changes.
    pub fn on_symbol_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.symbol_change = Some(Box::new(callback));
    }

    /// Registers the callback run after the displayed timeframe changes.
    pub fn on_timeframe_change(&mut self, callback: impl FnMut(Timeframe) + 'static) {
        self.timeframe_change = Some(Box::new(callback));
    }

    pub fn set_symbol(&mut self, symbol: &str) -> ChartResult<()> {
        self.ensure_live()?;
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ChartError::InvalidData(
                "chart symbol must not be empty".to_owned(),
            ));
        }
        if symbol == self.symbol {
            return Ok(());
        }
        let palette = self.theme.palette();
        self.surface
            .apply_options(&surface_options(&palette, self.compact, symbol))?;
        self.symbol = symbol.to_owned();
        debug!(symbol = %self.symbol, "chart symbol changed");
        if let Some(callback) = self.symbol_change.as_mut() {
            callback(&self.symbol);
        }
        Ok(())
    }

    pub fn set_timeframe(&mut self, timeframe: Timeframe) -> ChartResult<()> {
        self.ensure_live()?;
        if timeframe == self.timeframe {
            return Ok(());
        }
        self.timeframe = timeframe;
        debug!(%timeframe, "chart timeframe changed");
        if let Some(callback) = self.timeframe_change.as_mut() {
            callback(timeframe);
        }
        Ok(())
    }

    pub fn fit_content(&mut self) {
        if !self.disposed {
            self.surface.fit_content();
        }
    }

    pub fn scroll_to_real_time(&mut self) {
        if !self.disposed {
            self.surface.scroll_to_real_time();
        }
    }

    /// Captures the surface. Returns `ChartError::Unsupported` when the
    /// surface has no capture capability.
    pub fn take_screenshot(&mut self) -> ChartResult<Screenshot> {
        self.ensure_live()?;
        self.surface.take_screenshot()
    }

    /// Removes every owned series from the surface. Idempotent; later
    /// commands fail with `ChartError::Disposed`.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let mut owned = vec![self.main_series];
        owned.extend(self.volume_series);
        owned.extend(self.indicators.drain().map(|entry| entry.series_id));
        for series_id in owned {
            if let Err(err) = self.surface.remove_series(series_id) {
                warn!(error = %err, %series_id, "failed to remove series on dispose");
            }
        }
        self.crosshair = CrosshairState::Idle;
        self.disposed = true;
        debug!(symbol = %self.symbol, "chart instance disposed");
    }

    /// Disposes the instance and hands the surface back to the caller.
    #[must_use]
    pub fn into_surface(mut self) -> S {
        self.dispose();
        self.surface
    }

    fn push_price_data(&mut self, palette: &ThemePalette) -> ChartResult<()> {
        let points = format_series(&self.candles, self.chart_type);
        self.surface
            .set_series_data(self.main_series, SeriesData::Points(points))?;
        if let Some(volume) = self.volume_series {
            self.surface.set_series_data(
                volume,
                SeriesData::Volume(format_volume(&self.candles, palette.volume)),
            )?;
        }
        Ok(())
    }

    fn ensure_live(&self) -> ChartResult<()> {
        if self.disposed {
            return Err(ChartError::Disposed);
        }
        Ok(())
    }
}

impl<S: ChartSurface> fmt::Debug for ChartInstance<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartInstance")
            .field("symbol", &self.symbol)
            .field("timeframe", &self.timeframe)
            .field("chart_type", &self.chart_type)
            .field("theme", &self.theme)
            .field("candles", &self.candles.len())
            .field("series", &self.series())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

fn surface_options(palette: &ThemePalette, compact: bool, symbol: &str) -> SurfaceOptions {
    SurfaceOptions::from_palette(palette, compact).with_watermark(symbol)
}
