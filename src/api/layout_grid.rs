use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{ChartTheme, InstanceId, Timeframe};
use crate::error::{ChartError, ChartResult};

use super::{
    FullscreenHost, LayoutId, LayoutShape, Notification, Notifier, SavedInstance, SavedLayout,
};

/// Defaults used when the grid creates cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Symbols handed out round-robin to new cells.
    pub default_symbols: Vec<String>,
    #[serde(default)]
    pub default_timeframe: Timeframe,
    #[serde(default = "default_cell_width")]
    pub width: u32,
    #[serde(default = "default_cell_height")]
    pub height: u32,
    #[serde(default)]
    pub theme: ChartTheme,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_symbols: ["EURUSD", "GBPUSD", "USDJPY", "XAUUSD"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            default_timeframe: Timeframe::H1,
            width: default_cell_width(),
            height: default_cell_height(),
            theme: ChartTheme::default(),
        }
    }
}

impl GridConfig {
    #[must_use]
    pub fn with_default_symbols<I, T>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.default_symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_default_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.default_timeframe = timeframe;
        self
    }

    #[must_use]
    pub fn with_cell_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.default_symbols.is_empty() {
            return Err(ChartError::InvalidData(
                "default symbol pool must not be empty".to_owned(),
            ));
        }
        if self.default_symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(ChartError::InvalidData(
                "default symbol pool must not contain blank symbols".to_owned(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Symbol for the cell at `index` when the grid grows.
    fn pool_symbol(&self, index: usize) -> String {
        self.default_symbols[index % self.default_symbols.len()].clone()
    }

    /// Parses a config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse grid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_cell_width() -> u32 {
    640
}

fn default_cell_height() -> u32 {
    400
}

/// Assignment of one grid cell. The id never changes once issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartInstanceConfig {
    id: InstanceId,
    symbol: String,
    timeframe: Timeframe,
}

impl ChartInstanceConfig {
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }
}

/// Instances that appeared or disappeared in one grid mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutChange {
    pub added: Vec<InstanceId>,
    pub removed: Vec<InstanceId>,
}

impl LayoutChange {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Rows by cols grid of chart cell assignments.
///
/// `instances().len()` always equals the shape's cell count. Cells are in
/// row-major order; growing appends and shrinking truncates from the end.
#[derive(Debug, Clone)]
pub struct LayoutGrid {
    config: GridConfig,
    shape: LayoutShape,
    instances: Vec<ChartInstanceConfig>,
    active: InstanceId,
    next_id: u32,
}

impl LayoutGrid {
    /// Starts as a single cell holding the first pool symbol.
    pub fn new(config: GridConfig) -> ChartResult<Self> {
        config.validate()?;
        let first = ChartInstanceConfig {
            id: InstanceId(1),
            symbol: config.pool_symbol(0),
            timeframe: config.default_timeframe,
        };
        Ok(Self {
            config,
            shape: LayoutShape::default(),
            instances: vec![first],
            active: InstanceId(1),
            next_id: 2,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[must_use]
    pub fn shape(&self) -> LayoutShape {
        self.shape
    }

    #[must_use]
    pub fn instances(&self) -> &[ChartInstanceConfig] {
        &self.instances
    }

    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<&ChartInstanceConfig> {
        self.instances.iter().find(|instance| instance.id == id)
    }

    #[must_use]
    pub fn active_instance(&self) -> InstanceId {
        self.active
    }

    /// Resizes the grid to `layout`. Surviving cells keep their assignment.
    pub fn set_layout(&mut self, layout: LayoutId) -> LayoutChange {
        let shape = LayoutShape::from_id(layout);
        let target = shape.instance_count();
        let mut change = LayoutChange::default();

        if target < self.instances.len() {
            change.removed = self
                .instances
                .drain(target..)
                .map(|instance| instance.id)
                .collect();
        }
        for index in self.instances.len()..target {
            let id = self.issue_id();
            self.instances.push(ChartInstanceConfig {
                id,
                symbol: self.config.pool_symbol(index),
                timeframe: self.config.default_timeframe,
            });
            change.added.push(id);
        }
        if change.removed.contains(&self.active) {
            self.active = self.instances[0].id;
        }
        self.shape = shape;

        debug!(
            layout = %layout,
            added = change.added.len(),
            removed = change.removed.len(),
            "layout shape changed"
        );
        change
    }

    pub fn set_symbol(&mut self, id: InstanceId, symbol: &str) -> ChartResult<()> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ChartError::InvalidData(
                "chart symbol must not be empty".to_owned(),
            ));
        }
        let instance = self.instance_mut(id)?;
        instance.symbol = symbol.to_owned();
        debug!(%id, symbol, "instance symbol set");
        Ok(())
    }

    pub fn set_timeframe(&mut self, id: InstanceId, timeframe: Timeframe) -> ChartResult<()> {
        self.instance_mut(id)?.timeframe = timeframe;
        debug!(%id, %timeframe, "instance timeframe set");
        Ok(())
    }

    pub fn set_active_instance(&mut self, id: InstanceId) -> ChartResult<()> {
        self.instance_mut(id)?;
        self.active = id;
        Ok(())
    }

    /// Assigns `symbol` to the active cell. Returns the cell's id.
    pub fn apply_quick_symbol(&mut self, symbol: &str) -> ChartResult<InstanceId> {
        let active = self.active;
        self.set_symbol(active, symbol)?;
        Ok(active)
    }

    /// Snapshots shape and assignments under `name` (trimmed).
    pub fn save_layout(&self, name: &str) -> ChartResult<SavedLayout> {
        self.save_layout_at(name, Utc::now())
    }

    pub fn save_layout_at(
        &self,
        name: &str,
        created_at: DateTime<Utc>,
    ) -> ChartResult<SavedLayout> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChartError::EmptyLayoutName);
        }
        let layout = SavedLayout {
            name: name.to_owned(),
            layout: self.shape.id,
            instances: self
                .instances
                .iter()
                .map(|instance| SavedInstance {
                    symbol: instance.symbol.clone(),
                    timeframe: instance.timeframe,
                })
                .collect(),
            created_at,
        };
        debug!(name, layout = %layout.layout, "layout saved");
        Ok(layout)
    }

    /// Replaces the whole grid with `saved`. Ids restart at 1 and the first
    /// cell becomes active.
    ///
    /// A saved instance list that does not match its shape is padded from the
    /// symbol pool or truncated.
    pub fn load_layout(&mut self, saved: &SavedLayout) -> LayoutChange {
        let shape = LayoutShape::from_id(saved.layout);
        let target = shape.instance_count();
        if saved.instances.len() != target {
            warn!(
                name = %saved.name,
                layout = %saved.layout,
                saved = saved.instances.len(),
                expected = target,
                "saved layout instance count normalized"
            );
        }

        let mut instances = Vec::with_capacity(target);
        for index in 0..target {
            let (symbol, timeframe) = match saved.instances.get(index) {
                Some(instance) if !instance.symbol.trim().is_empty() => {
                    (instance.symbol.trim().to_owned(), instance.timeframe)
                }
                _ => (self.config.pool_symbol(index), self.config.default_timeframe),
            };
            instances.push(ChartInstanceConfig {
                id: InstanceId(index as u32 + 1),
                symbol,
                timeframe,
            });
        }

        let removed = self.instances.iter().map(|instance| instance.id).collect();
        let added = instances.iter().map(|instance| instance.id).collect();
        self.instances = instances;
        self.shape = shape;
        self.active = InstanceId(1);
        self.next_id = target as u32 + 1;
        debug!(name = %saved.name, layout = %saved.layout, "layout loaded");
        LayoutChange { added, removed }
    }

    /// Flips the host's fullscreen state and returns whether the host is
    /// fullscreen afterwards. Failures are reported through `notifier`.
    pub fn toggle_fullscreen(
        &self,
        host: &mut dyn FullscreenHost,
        notifier: &dyn Notifier,
    ) -> bool {
        let entering = !host.is_fullscreen();
        let result = if entering {
            host.enter_fullscreen()
        } else {
            host.exit_fullscreen()
        };
        if let Err(err) = result {
            let action = if entering { "enter" } else { "exit" };
            warn!(error = %err, action, "fullscreen toggle failed");
            notifier.notify(Notification::error(format!("Could not {action} fullscreen: {err}")));
        }
        host.is_fullscreen()
    }

    fn issue_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        id
    }

    fn instance_mut(&mut self, id: InstanceId) -> ChartResult<&mut ChartInstanceConfig> {
        self.instances
            .iter_mut()
            .find(|instance| instance.id == id)
            .ok_or(ChartError::UnknownInstance { id })
    }
}
