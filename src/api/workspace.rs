use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::{Candle, ChartTheme, ChartType, InstanceId, Timeframe};
use crate::error::{ChartError, ChartResult};
use crate::render::{ChartSurface, Screenshot, SurfaceFactory};

use super::{
    ChartHandle, ChartInstance, ChartInstanceOptions, FullscreenHost, GridConfig, LayoutChange,
    LayoutGrid, LayoutId, MarketDataSource, Notification, Notifier, SavedLayout, TracingNotifier,
};

/// A layout grid with one live chart per cell.
///
/// Charts are kept in an arena keyed by instance id. Grid operations are
/// applied to the grid first and then dispatched to the chart with the same
/// id, so removed cells never leave a chart behind.
pub struct ChartWorkspace<S, F, M>
where
    S: ChartSurface,
    F: SurfaceFactory<S>,
    M: MarketDataSource,
{
    grid: LayoutGrid,
    charts: IndexMap<InstanceId, ChartHandle<S>>,
    factory: F,
    market_data: M,
    notifier: Box<dyn Notifier>,
    theme: ChartTheme,
}

impl<S, F, M> ChartWorkspace<S, F, M>
where
    S: ChartSurface,
    F: SurfaceFactory<S>,
    M: MarketDataSource,
{
    pub fn new(config: GridConfig, factory: F, market_data: M) -> ChartResult<Self> {
        Self::with_notifier(config, factory, market_data, TracingNotifier)
    }

    pub fn with_notifier(
        config: GridConfig,
        factory: F,
        market_data: M,
        notifier: impl Notifier + 'static,
    ) -> ChartResult<Self> {
        let theme = config.theme;
        let grid = LayoutGrid::new(config)?;
        let mut workspace = Self {
            grid,
            charts: IndexMap::new(),
            factory,
            market_data,
            notifier: Box::new(notifier),
            theme,
        };
        let ids: Vec<InstanceId> = workspace.grid.instances().iter().map(|i| i.id()).collect();
        workspace.create_charts(&ids)?;
        Ok(workspace)
    }

    #[must_use]
    pub fn grid(&self) -> &LayoutGrid {
        &self.grid
    }

    #[must_use]
    pub fn theme(&self) -> ChartTheme {
        self.theme
    }

    /// Command handle of the chart in cell `id`.
    pub fn handle(&self, id: InstanceId) -> ChartResult<ChartHandle<S>> {
        self.charts
            .get(&id)
            .cloned()
            .ok_or(ChartError::UnknownInstance { id })
    }

    /// Handles in grid order.
    pub fn handles(&self) -> impl Iterator<Item = (InstanceId, &ChartHandle<S>)> {
        self.charts.iter().map(|(id, handle)| (*id, handle))
    }

    /// Changes the grid shape, creating charts for new cells and disposing
    /// charts of removed ones.
    ///
    /// When a new surface cannot be created the grid and charts are left as
    /// they were.
    pub fn set_layout(&mut self, layout: LayoutId) -> ChartResult<LayoutChange> {
        let previous = self.grid.clone();
        let change = self.grid.set_layout(layout);
        if let Err(err) = self.create_charts(&change.added) {
            self.rollback(previous, &change.added);
            return Err(err);
        }
        self.dispose_charts(&change.removed);
        self.refresh_compact_mode()?;
        Ok(change)
    }

    /// Reassigns cell `id` and reloads its data. The chart is borrowed
    /// before the grid changes, so a busy chart leaves both untouched.
    pub fn set_symbol(&mut self, id: InstanceId, symbol: &str) -> ChartResult<()> {
        let handle = self.handle(id)?;
        {
            let mut instance = handle.instance_mut()?;
            let previous = instance.symbol().to_owned();
            self.grid.set_symbol(id, symbol)?;
            if let Err(err) = instance.set_symbol(symbol) {
                if let Err(rollback) = self.grid.set_symbol(id, &previous) {
                    warn!(%id, error = %rollback, "grid symbol rollback failed");
                }
                return Err(err);
            }
        }
        self.reload(id)
    }

    pub fn set_timeframe(&mut self, id: InstanceId, timeframe: Timeframe) -> ChartResult<()> {
        let handle = self.handle(id)?;
        {
            let mut instance = handle.instance_mut()?;
            let previous = instance.timeframe();
            self.grid.set_timeframe(id, timeframe)?;
            if let Err(err) = instance.set_timeframe(timeframe) {
                if let Err(rollback) = self.grid.set_timeframe(id, previous) {
                    warn!(%id, error = %rollback, "grid timeframe rollback failed");
                }
                return Err(err);
            }
        }
        self.reload(id)
    }

    pub fn set_active_instance(&mut self, id: InstanceId) -> ChartResult<()> {
        self.grid.set_active_instance(id)
    }

    /// Assigns `symbol` to the active cell and reloads its data.
    pub fn apply_quick_symbol(&mut self, symbol: &str) -> ChartResult<InstanceId> {
        let id = self.grid.active_instance();
        self.set_symbol(id, symbol)?;
        Ok(id)
    }

    pub fn set_chart_type(&mut self, id: InstanceId, chart_type: ChartType) -> ChartResult<()> {
        self.handle(id)?.instance_mut()?.set_chart_type(chart_type)
    }

    /// Applies `theme` to every chart and to charts created later.
    pub fn set_theme(&mut self, theme: ChartTheme) -> ChartResult<()> {
        for handle in self.charts.values() {
            handle.instance_mut()?.set_theme(theme)?;
        }
        self.theme = theme;
        Ok(())
    }

    pub fn save_layout(&self, name: &str) -> ChartResult<SavedLayout> {
        self.grid.save_layout(name)
    }

    /// Replaces every cell with the contents of `saved`.
    pub fn load_layout(&mut self, saved: &SavedLayout) -> ChartResult<()> {
        let previous = self.grid.clone();
        let previous_charts = std::mem::take(&mut self.charts);
        let change = self.grid.load_layout(saved);
        if let Err(err) = self.create_charts(&change.added) {
            self.rollback(previous, &change.added);
            self.charts = previous_charts;
            return Err(err);
        }
        for (id, handle) in previous_charts {
            dispose_handle(id, &handle);
        }
        self.refresh_compact_mode()?;
        debug!(name = %saved.name, charts = self.charts.len(), "workspace layout loaded");
        Ok(())
    }

    pub fn toggle_fullscreen(&self, host: &mut dyn FullscreenHost) -> bool {
        self.grid.toggle_fullscreen(host, self.notifier.as_ref())
    }

    /// Captures every chart in grid order, one result per cell.
    ///
    /// Failed captures are also reported through the notifier.
    pub fn take_screenshots(&mut self) -> Vec<(InstanceId, ChartResult<Screenshot>)> {
        let mut captures = Vec::with_capacity(self.charts.len());
        for (id, handle) in &self.charts {
            let capture = handle
                .instance_mut()
                .and_then(|mut instance| instance.take_screenshot());
            if let Err(err) = &capture {
                warn!(%id, error = %err, "chart screenshot failed");
                self.notifier.notify(Notification::warning(format!(
                    "Screenshot of chart {id} failed: {err}"
                )));
            }
            captures.push((*id, capture));
        }
        captures
    }

    fn create_charts(&mut self, ids: &[InstanceId]) -> ChartResult<()> {
        let compact = self.grid.shape().instance_count() > 1;
        for &id in ids {
            let Some(config) = self.grid.instance(id) else {
                return Err(ChartError::UnknownInstance { id });
            };
            let symbol = config.symbol().to_owned();
            let timeframe = config.timeframe();
            let grid_config = self.grid.config();
            let options = ChartInstanceOptions::new(symbol.clone())
                .with_timeframe(timeframe)
                .with_size(grid_config.width, grid_config.height)
                .with_theme(self.theme)
                .with_compact(compact);
            let surface = self.factory.create_surface(id, options.viewport())?;
            let data = self.fetch_candles(&symbol, timeframe);
            let instance = ChartInstance::new(surface, options.with_data(data))?;
            self.charts.insert(id, ChartHandle::new(instance));
            debug!(%id, %symbol, %timeframe, "chart created for cell");
        }
        Ok(())
    }

    fn reload(&mut self, id: InstanceId) -> ChartResult<()> {
        let handle = self.handle(id)?;
        let (symbol, timeframe) = {
            let instance = handle.instance()?;
            (instance.symbol().to_owned(), instance.timeframe())
        };
        let data = self.fetch_candles(&symbol, timeframe);
        let mut instance = handle.instance_mut()?;
        // Candles of the previous assignment must not stay on screen.
        if data.is_empty() {
            instance.clear()
        } else {
            instance.set_data(data)
        }
    }

    /// Market data failures leave the chart empty and are surfaced to the user.
    fn fetch_candles(&mut self, symbol: &str, timeframe: Timeframe) -> Vec<Candle> {
        match self.market_data.candles(symbol, timeframe) {
            Ok(candles) => candles,
            Err(err) => {
                warn!(symbol, %timeframe, error = %err, "market data request failed");
                self.notifier.notify(Notification::warning(format!(
                    "No data for {symbol} {timeframe}: {err}"
                )));
                Vec::new()
            }
        }
    }

    fn dispose_charts(&mut self, ids: &[InstanceId]) {
        for id in ids {
            if let Some(handle) = self.charts.shift_remove(id) {
                dispose_handle(*id, &handle);
            }
        }
    }

    fn rollback(&mut self, previous: LayoutGrid, created: &[InstanceId]) {
        self.dispose_charts(created);
        self.grid = previous;
        warn!("layout change rolled back");
    }

    fn refresh_compact_mode(&mut self) -> ChartResult<()> {
        let compact = self.grid.shape().instance_count() > 1;
        for handle in self.charts.values() {
            handle.instance_mut()?.set_compact(compact)?;
        }
        Ok(())
    }
}

fn dispose_handle<S: ChartSurface>(id: InstanceId, handle: &ChartHandle<S>) {
    match handle.instance_mut() {
        Ok(mut instance) => instance.dispose(),
        Err(err) => warn!(%id, error = %err, "chart busy, not disposed"),
    }
}
