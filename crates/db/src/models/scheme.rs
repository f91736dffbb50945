//! Welfare scheme catalogue rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use welfare_core::types::{DbId, Timestamp};

/// A row from the `schemes` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Scheme {
    pub scheme_id: DbId,
    pub scheme_code: String,
    pub scheme_name: String,
    pub department: Option<String>,
    pub description: Option<String>,
    /// States the scheme applies in; `None` means nationwide.
    pub regional_scope: Option<Vec<String>>,
    pub created_at: Timestamp,
}
