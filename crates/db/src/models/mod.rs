//! Read-model row structs and insert DTOs.
//!
//! Each submodule contains `FromRow` + `Serialize` structs matching a table
//! or view, plus a `Deserialize` DTO where the console writes rows.

pub mod campaign;
pub mod citizen;
pub mod dashboard;
pub mod eligibility;
pub mod scheme;
