pub mod area_series;
pub mod bar_series;
pub mod candle;
pub mod candlestick;
pub mod color;
pub mod formatter;
pub mod histogram_series;
pub mod line_series;
pub mod price_scale;
pub mod primitives;
pub mod scale;
pub mod series;
pub mod theme;
pub mod time_scale;
pub mod timeframe;
pub mod types;

pub use area_series::{AreaGeometry, AreaVertex, project_area_geometry};
pub use bar_series::{BarGeometry, project_bars};
pub use candle::{Candle, canonicalize_candles, canonicalize_values};
pub use candlestick::{CandleGeometry, project_candles};
pub use color::Color;
pub use formatter::{format_series, format_volume, format_volume_default};
pub use histogram_series::{HistogramBar, project_histogram_bars};
pub use line_series::{LineSegment, project_line_segments};
pub use price_scale::{PriceScale, PriceScaleTuning};
pub use scale::LinearScale;
pub use series::{ChartType, OhlcPoint, SeriesPoint, ValuePoint, VolumePoint};
pub use theme::{ChartTheme, ThemePalette, VolumeColors};
pub use time_scale::{TimeScale, TimeScaleTuning};
pub use timeframe::Timeframe;
pub use types::{InstanceId, Viewport};
