//! Sort key vocabulary shared by the state machine and the sorter

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::{Result, RowsortError};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Orient an ascending comparison result for this direction
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortDirection {
    type Err = RowsortError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(RowsortError::InvalidSortKey(format!(
                "unknown direction '{}'",
                other
            ))),
        }
    }
}

/// One active sort criterion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    /// Column to sort by
    pub column_id: String,
    /// Sort direction
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }

    pub fn asc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Asc)
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Desc)
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.column_id, self.direction)
    }
}

/// Parses `column` or `column:direction`
impl FromStr for SortKey {
    type Err = RowsortError;

    fn from_str(s: &str) -> Result<Self> {
        // A suffix that is not a direction belongs to the column id
        let (column, direction) = match s.rsplit_once(':') {
            Some((column, suffix)) => match suffix.parse::<SortDirection>() {
                Ok(direction) => (column.trim(), direction),
                Err(_) => (s.trim(), SortDirection::Asc),
            },
            None => (s.trim(), SortDirection::Asc),
        };
        if column.is_empty() {
            return Err(RowsortError::InvalidSortKey(format!(
                "missing column id in '{}'",
                s
            )));
        }
        Ok(Self::new(column, direction))
    }
}

/// One state of a column's toggle cycle, as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleStep {
    Asc,
    Desc,
    Unsorted,
}

impl From<ToggleStep> for Option<SortDirection> {
    fn from(step: ToggleStep) -> Self {
        match step {
            ToggleStep::Asc => Some(SortDirection::Asc),
            ToggleStep::Desc => Some(SortDirection::Desc),
            ToggleStep::Unsorted => None,
        }
    }
}

impl From<Option<SortDirection>> for ToggleStep {
    fn from(state: Option<SortDirection>) -> Self {
        match state {
            Some(SortDirection::Asc) => ToggleStep::Asc,
            Some(SortDirection::Desc) => ToggleStep::Desc,
            None => ToggleStep::Unsorted,
        }
    }
}

/// The cycle a column walks through on repeated toggles
///
/// `None` stands for "not sorted by this column". The default cycle is
/// `asc -> desc -> unsorted`. A state missing from the cycle advances to its
/// first entry. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ToggleStep>", into = "Vec<ToggleStep>")]
pub struct ToggleOrder(Vec<Option<SortDirection>>);

impl ToggleOrder {
    pub fn new(steps: Vec<Option<SortDirection>>) -> Result<Self> {
        if steps.is_empty() {
            return Err(RowsortError::Configuration(
                "toggle order must contain at least one step".to_string(),
            ));
        }
        Ok(Self(steps))
    }

    /// The state that follows `current`
    pub fn next(&self, current: Option<SortDirection>) -> Option<SortDirection> {
        let next_ix = self
            .0
            .iter()
            .position(|step| *step == current)
            .map_or(0, |ix| (ix + 1) % self.0.len());
        self.0[next_ix]
    }

    pub fn steps(&self) -> &[Option<SortDirection>] {
        &self.0
    }
}

impl Default for ToggleOrder {
    fn default() -> Self {
        Self(vec![Some(SortDirection::Asc), Some(SortDirection::Desc), None])
    }
}

impl TryFrom<Vec<ToggleStep>> for ToggleOrder {
    type Error = RowsortError;

    fn try_from(steps: Vec<ToggleStep>) -> Result<Self> {
        Self::new(steps.into_iter().map(Into::into).collect())
    }
}

impl From<ToggleOrder> for Vec<ToggleStep> {
    fn from(order: ToggleOrder) -> Self {
        order.0.into_iter().map(ToggleStep::from).collect()
    }
}
