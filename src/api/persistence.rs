use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::Timeframe;
use crate::error::{ChartError, ChartResult};

use super::LayoutId;

pub const SAVED_LAYOUTS_JSON_SCHEMA_V1: u32 = 1;

/// Symbol/timeframe assignment of one grid cell inside a saved layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedInstance {
    pub symbol: String,
    pub timeframe: Timeframe,
}

/// Named snapshot of a grid's shape and per-cell assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedLayout {
    pub name: String,
    pub layout: LayoutId,
    pub instances: Vec<SavedInstance>,
    pub created_at: DateTime<Utc>,
}

/// Persisted form of one chart cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedChartRecord {
    pub symbol: String,
    pub timeframe: String,
}

/// Persisted form of a saved layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLayoutRecord {
    pub name: String,
    pub layout: String,
    pub charts: Vec<SavedChartRecord>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLayoutsJsonContractV1 {
    pub schema_version: u32,
    pub layouts: Vec<SavedLayoutRecord>,
}

impl SavedLayout {
    #[must_use]
    pub fn to_record(&self) -> SavedLayoutRecord {
        SavedLayoutRecord {
            name: self.name.clone(),
            layout: self.layout.to_string(),
            charts: self
                .instances
                .iter()
                .map(|instance| SavedChartRecord {
                    symbol: instance.symbol.clone(),
                    timeframe: instance.timeframe.to_string(),
                })
                .collect(),
            created_at: self.created_at,
        }
    }

    pub fn from_record(record: SavedLayoutRecord) -> ChartResult<Self> {
        let name = record.name.trim();
        if name.is_empty() {
            return Err(ChartError::EmptyLayoutName);
        }
        let layout = record.layout.parse::<LayoutId>()?;
        let instances = record
            .charts
            .into_iter()
            .map(|chart| {
                if chart.symbol.trim().is_empty() {
                    return Err(ChartError::InvalidData(format!(
                        "layout `{name}` has a chart without symbol"
                    )));
                }
                Ok(SavedInstance {
                    symbol: chart.symbol,
                    timeframe: chart.timeframe.parse()?,
                })
            })
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(Self {
            name: name.to_owned(),
            layout,
            instances,
            created_at: record.created_at,
        })
    }

    /// Serializes the record form to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self.to_record())
            .map_err(|e| ChartError::Persistence(format!("failed to serialize layout: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let record: SavedLayoutRecord = serde_json::from_str(input)
            .map_err(|e| ChartError::Persistence(format!("failed to parse layout json: {e}")))?;
        Self::from_record(record)
    }
}

/// Serializes `layouts` as the versioned collection contract.
pub fn saved_layouts_to_json_contract_v1_pretty(layouts: &[SavedLayout]) -> ChartResult<String> {
    let payload = SavedLayoutsJsonContractV1 {
        schema_version: SAVED_LAYOUTS_JSON_SCHEMA_V1,
        layouts: layouts.iter().map(SavedLayout::to_record).collect(),
    };
    serde_json::to_string_pretty(&payload).map_err(|e| {
        ChartError::Persistence(format!("failed to serialize saved layouts contract v1: {e}"))
    })
}

/// Parses a bare array of layout records or the versioned wrapper.
///
/// The top-level JSON type picks the form, so parse errors describe the form
/// that was actually stored.
pub fn saved_layouts_from_json_compat_str(input: &str) -> ChartResult<Vec<SavedLayout>> {
    let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
        ChartError::Persistence(format!("failed to parse saved layouts json payload: {e}"))
    })?;
    let records = if value.is_array() {
        serde_json::from_value::<Vec<SavedLayoutRecord>>(value).map_err(|e| {
            ChartError::Persistence(format!("failed to parse saved layouts array: {e}"))
        })?
    } else {
        let payload: SavedLayoutsJsonContractV1 = serde_json::from_value(value).map_err(|e| {
            ChartError::Persistence(format!("failed to parse saved layouts contract v1: {e}"))
        })?;
        if payload.schema_version != SAVED_LAYOUTS_JSON_SCHEMA_V1 {
            return Err(ChartError::Persistence(format!(
                "unsupported saved layouts schema version: {}",
                payload.schema_version
            )));
        }
        payload.layouts
    };
    records.into_iter().map(SavedLayout::from_record).collect()
}

/// Storage for named layouts. Saving under an existing name replaces it.
pub trait LayoutStore {
    fn save(&mut self, layout: &SavedLayout) -> ChartResult<()>;

    fn load(&self, name: &str) -> ChartResult<Option<SavedLayout>>;

    /// Stored layouts in save order.
    fn list(&self) -> ChartResult<Vec<SavedLayout>>;

    fn delete(&mut self, name: &str) -> ChartResult<bool>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryLayoutStore {
    layouts: IndexMap<String, SavedLayout>,
}

impl InMemoryLayoutStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutStore for InMemoryLayoutStore {
    fn save(&mut self, layout: &SavedLayout) -> ChartResult<()> {
        self.layouts.insert(layout.name.clone(), layout.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> ChartResult<Option<SavedLayout>> {
        Ok(self.layouts.get(name.trim()).cloned())
    }

    fn list(&self) -> ChartResult<Vec<SavedLayout>> {
        Ok(self.layouts.values().cloned().collect())
    }

    fn delete(&mut self, name: &str) -> ChartResult<bool> {
        Ok(self.layouts.shift_remove(name.trim()).is_some())
    }
}

/// Keeps all layouts in one JSON file using the versioned contract.
///
/// The file is read on every call and rewritten on every mutation. A missing
/// file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileLayoutStore {
    path: PathBuf,
}

impl JsonFileLayoutStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> ChartResult<IndexMap<String, SavedLayout>> {
        let input = match fs::read_to_string(&self.path) {
            Ok(input) => input,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(IndexMap::new());
            }
            Err(err) => {
                return Err(ChartError::Persistence(format!(
                    "failed to read `{}`: {err}",
                    self.path.display()
                )));
            }
        };
        let layouts = saved_layouts_from_json_compat_str(&input)?;
        let mut by_name = IndexMap::with_capacity(layouts.len());
        for layout in layouts {
            if by_name.insert(layout.name.clone(), layout).is_some() {
                warn!(path = %self.path.display(), "duplicate layout name in store, last wins");
            }
        }
        Ok(by_name)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "layouts.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_all(&self, layouts: &IndexMap<String, SavedLayout>) -> ChartResult<()> {
        let layouts: Vec<SavedLayout> = layouts.values().cloned().collect();
        let json = saved_layouts_to_json_contract_v1_pretty(&layouts)?;
        // Written beside the store and renamed over it, so readers never see
        // a partially written file.
        let staging = self.staging_path();
        fs::write(&staging, json).map_err(|e| {
            ChartError::Persistence(format!("failed to write `{}`: {e}", staging.display()))
        })?;
        if let Err(e) = fs::rename(&staging, &self.path) {
            if let Err(cleanup) = fs::remove_file(&staging) {
                warn!(path = %staging.display(), error = %cleanup, "staging file left behind");
            }
            return Err(ChartError::Persistence(format!(
                "failed to replace `{}`: {e}",
                self.path.display()
            )));
        }
        debug!(path = %self.path.display(), layouts = layouts.len(), "layout store written");
        Ok(())
    }
}

impl LayoutStore for JsonFileLayoutStore {
    fn save(&mut self, layout: &SavedLayout) -> ChartResult<()> {
        let mut layouts = self.read_all()?;
        layouts.insert(layout.name.clone(), layout.clone());
        self.write_all(&layouts)
    }

    fn load(&self, name: &str) -> ChartResult<Option<SavedLayout>> {
        Ok(self.read_all()?.shift_remove(name.trim()))
    }

    fn list(&self) -> ChartResult<Vec<SavedLayout>> {
        Ok(self.read_all()?.into_values().collect())
    }

    fn delete(&mut self, name: &str) -> ChartResult<bool> {
        let mut layouts = self.read_all()?;
        let removed = layouts.shift_remove(name.trim()).is_some();
        if removed {
            self.write_all(&layouts)?;
        }
        Ok(removed)
    }
}
