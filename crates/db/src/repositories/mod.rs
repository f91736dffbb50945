//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod campaign_repo;
pub mod citizen_repo;
pub mod dashboard_repo;
pub mod district_repo;
pub mod eligibility_repo;
pub mod filter_sql;
pub mod scheme_repo;

pub use campaign_repo::CampaignRepo;
pub use citizen_repo::CitizenRepo;
pub use dashboard_repo::DashboardRepo;
pub use district_repo::DistrictRepo;
pub use eligibility_repo::EligibilityRepo;
pub use scheme_repo::SchemeRepo;
