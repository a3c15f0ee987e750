//! chart-grid: multi-instrument charting and layout engine.
//!
//! Candles flow from a host-provided source through the series formatter
//! into per-cell `ChartInstance` controllers, each owning the series on one
//! `ChartSurface`. A `LayoutGrid` arranges those cells in rows by cols and
//! snapshots them as named layouts; `ChartWorkspace` ties the two together.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{ChartHandle, ChartInstance, ChartInstanceOptions, ChartWorkspace, LayoutGrid};
pub use error::{ChartError, ChartResult};
