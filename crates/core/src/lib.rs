//! Domain logic for the welfare governance console.
//!
//! Everything here is pure: no database, no network. Gateways and
//! controllers in the other crates feed pre-loaded data into these
//! functions and types.

pub mod campaign;
pub mod eligibility;
pub mod error;
pub mod filter_state;
pub mod geo;
pub mod insights;
pub mod listing;
pub mod types;
