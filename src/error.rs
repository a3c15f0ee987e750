use thiserror::Error;

use crate::core::InstanceId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("indicator `{name}` already exists on this chart")]
    DuplicateIndicator { name: String },

    #[error("unknown chart instance id: {id}")]
    UnknownInstance { id: InstanceId },

    #[error("chart instance has been disposed")]
    Disposed,

    #[error("chart instance is busy with another command")]
    Busy,

    #[error("layout name must not be blank")]
    EmptyLayoutName,

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("layout persistence error: {0}")]
    Persistence(String),
}
