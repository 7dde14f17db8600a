pub mod app_state;
pub mod loader;
pub mod records;
pub mod validate;

pub use app_state::AppState;
pub use records::{IndustrialFacility, LicenseRegistrant, ResearchRegistrant};
