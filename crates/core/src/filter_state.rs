//! Draft filter state shared by every list page.
//!
//! ```text
//! Idle ──select──▶ ColumnSelected ──type──▶ Ready ──apply──▶ Applied
//!   ▲                                                           │
//!   └────────────────────────── reset ◀─────────────────────────┘
//! ```
//!
//! The machine only tracks what the user has typed. The filter a list is
//! actually fetched with is owned by the list controller and changes only
//! on a successful [`FilterState::apply`] or a reset.

use serde::Serialize;

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FilterState {
    #[default]
    Idle,
    ColumnSelected {
        column: String,
    },
    Ready {
        column: String,
        value: String,
    },
    Applied {
        column: String,
        value: String,
    },
}

impl FilterState {
    /// Record a draft column and raw value.
    ///
    /// An empty column returns to `Idle`; a blank value leaves only the
    /// column selected.
    pub fn set_filter(&mut self, column: &str, value: &str) {
        let column = column.trim();
        *self = if column.is_empty() {
            Self::Idle
        } else if value.trim().is_empty() {
            Self::ColumnSelected {
                column: column.to_string(),
            }
        } else {
            Self::Ready {
                column: column.to_string(),
                value: value.to_string(),
            }
        };
    }

    /// Choose a column, keeping any value already typed.
    pub fn select_column(&mut self, column: &str) {
        let value = self.value().unwrap_or_default().to_string();
        self.set_filter(column, &value);
    }

    /// Update the typed value for the selected column.
    ///
    /// Typing without a column selected is ignored, matching the disabled
    /// input in the UI.
    pub fn set_value(&mut self, value: &str) {
        if let Some(column) = self.column().map(str::to_string) {
            self.set_filter(&column, value);
        }
    }

    /// Whether the apply action is enabled.
    pub fn can_apply(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Move `Ready` to `Applied` and return the trimmed `(column, value)`.
    ///
    /// Any other state is rejected and left untouched.
    pub fn apply(&mut self) -> Result<(String, String), CoreError> {
        match self {
            Self::Ready { column, value } => {
                let column = column.clone();
                let value = value.trim().to_string();
                *self = Self::Applied {
                    column: column.clone(),
                    value: value.clone(),
                };
                Ok((column, value))
            }
            Self::Idle | Self::ColumnSelected { .. } => Err(CoreError::Validation(
                "Select a column and enter a search value first".to_string(),
            )),
            Self::Applied { .. } => Err(CoreError::Validation(
                "Filter is already applied".to_string(),
            )),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::ColumnSelected { column }
            | Self::Ready { column, .. }
            | Self::Applied { column, .. } => Some(column),
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Ready { value, .. } | Self::Applied { value, .. } => Some(value),
            Self::Idle | Self::ColumnSelected { .. } => None,
        }
    }
}
