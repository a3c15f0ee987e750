//! Capabilities the host application lends to the layout layer.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::core::{Candle, Timeframe};
use crate::error::ChartResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// User-facing message (toast, status bar line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Routes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => info!(text = %notification.message, "notification"),
            NotificationLevel::Warning => warn!(text = %notification.message, "notification"),
            NotificationLevel::Error => error!(text = %notification.message, "notification"),
        }
    }
}

/// Keeps every notification in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    entries: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.entries.borrow().clone()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.entries.borrow_mut().push(notification);
    }
}

/// Window-level fullscreen capability.
pub trait FullscreenHost {
    fn is_fullscreen(&self) -> bool;

    fn enter_fullscreen(&mut self) -> ChartResult<()>;

    fn exit_fullscreen(&mut self) -> ChartResult<()>;
}

/// Supplies candles for a symbol/timeframe pair.
pub trait MarketDataSource {
    fn candles(&mut self, symbol: &str, timeframe: Timeframe) -> ChartResult<Vec<Candle>>;
}

impl<F> MarketDataSource for F
where
    F: FnMut(&str, Timeframe) -> ChartResult<Vec<Candle>>,
{
    fn candles(&mut self, symbol: &str, timeframe: Timeframe) -> ChartResult<Vec<Candle>> {
        self(symbol, timeframe)
    }
}

/// Source for hosts that push data into charts themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMarketData;

impl MarketDataSource for NoMarketData {
    fn candles(&mut self, _symbol: &str, _timeframe: Timeframe) -> ChartResult<Vec<Candle>> {
        Ok(Vec::new())
    }
}
