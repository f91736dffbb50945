//! Console-side controllers for the welfare dashboard.
//!
//! Each page owns a [`list::ListController`] over one [`list::ListSource`]
//! and talks to the data service through an `Arc<dyn DataGateway>`: either
//! [`http_gateway::HttpGateway`] against `welfare-api`, or any other
//! gateway injected at startup.

pub mod campaigns;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod http_gateway;
pub mod list;
pub mod overview;
pub mod sources;
