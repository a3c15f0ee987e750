use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Supported grid shapes, written `<rows>x<cols>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LayoutId {
    #[default]
    Single,
    /// One row, two columns.
    OneByTwo,
    /// Two rows, one column.
    TwoByOne,
    Quad,
    /// One row, three columns.
    OneByThree,
    /// Three rows, one column.
    ThreeByOne,
}

impl LayoutId {
    pub const ALL: [Self; 6] = [
        Self::Single,
        Self::OneByTwo,
        Self::TwoByOne,
        Self::Quad,
        Self::OneByThree,
        Self::ThreeByOne,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "1x1",
            Self::OneByTwo => "1x2",
            Self::TwoByOne => "2x1",
            Self::Quad => "2x2",
            Self::OneByThree => "1x3",
            Self::ThreeByOne => "3x1",
        }
    }

    #[must_use]
    pub fn shape(self) -> LayoutShape {
        LayoutShape::from_id(self)
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutId {
    type Err = ChartError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown layout `{input}`")))
    }
}

impl TryFrom<String> for LayoutId {
    type Error = ChartError;

    fn try_from(value: String) -> ChartResult<Self> {
        value.parse()
    }
}

impl From<LayoutId> for String {
    fn from(id: LayoutId) -> Self {
        id.as_str().to_owned()
    }
}

/// Grid dimensions for one `LayoutId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutShape {
    pub id: LayoutId,
    pub rows: usize,
    pub cols: usize,
}

impl LayoutShape {
    #[must_use]
    pub fn from_id(id: LayoutId) -> Self {
        let (rows, cols) = match id {
            LayoutId::Single => (1, 1),
            LayoutId::OneByTwo => (1, 2),
            LayoutId::TwoByOne => (2, 1),
            LayoutId::Quad => (2, 2),
            LayoutId::OneByThree => (1, 3),
            LayoutId::ThreeByOne => (3, 1),
        };
        Self { id, rows, cols }
    }

    #[must_use]
    pub fn instance_count(self) -> usize {
        self.rows * self.cols
    }

    /// `(row, col)` of the cell at `index` in row-major order.
    #[must_use]
    pub fn cell_position(self, index: usize) -> Option<(usize, usize)> {
        (index < self.instance_count()).then(|| (index / self.cols, index % self.cols))
    }
}

impl Default for LayoutShape {
    fn default() -> Self {
        Self::from_id(LayoutId::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_parse_their_own_labels() {
        for id in LayoutId::ALL {
            assert_eq!(id.as_str().parse::<LayoutId>().expect("parse"), id);
        }
        assert!("4x4".parse::<LayoutId>().is_err());
    }

    #[test]
    fn shapes_read_rows_by_cols() {
        let wide = LayoutShape::from_id(LayoutId::OneByThree);
        assert_eq!((wide.rows, wide.cols), (1, 3));
        let tall = LayoutShape::from_id(LayoutId::ThreeByOne);
        assert_eq!((tall.rows, tall.cols), (3, 1));
        assert_eq!(LayoutShape::from_id(LayoutId::Quad).instance_count(), 4);
        assert_eq!(LayoutShape::from_id(LayoutId::Quad).cell_position(3), Some((1, 1)));
        assert_eq!(wide.cell_position(3), None);
    }
}
