mod chart_commands;
mod chart_instance;
mod host;
mod indicators;
mod instance_options;
mod layout_grid;
mod layout_shape;
mod persistence;
mod workspace;

pub use chart_commands::{ChartCommands, ChartHandle};
pub use chart_instance::{ChartInstance, ChartSeriesIds};
pub use host::{
    FullscreenHost, MarketDataSource, NoMarketData, Notification, NotificationLevel, Notifier,
    RecordingNotifier, TracingNotifier,
};
pub use indicators::{IndicatorOptions, IndicatorSeries};
pub use instance_options::{ChartInstanceOptions, Drawing};
pub use layout_grid::{ChartInstanceConfig, GridConfig, LayoutChange, LayoutGrid};
pub use layout_shape::{LayoutId, LayoutShape};
pub use persistence::{
    InMemoryLayoutStore, JsonFileLayoutStore, LayoutStore, SAVED_LAYOUTS_JSON_SCHEMA_V1,
    SavedChartRecord, SavedInstance, SavedLayout, SavedLayoutRecord, SavedLayoutsJsonContractV1,
    saved_layouts_from_json_compat_str, saved_layouts_to_json_contract_v1_pretty,
};
pub use workspace::ChartWorkspace;
