pub mod campaigns;
pub mod citizens;
pub mod eligibility;
pub mod overview;
pub mod schemes;
