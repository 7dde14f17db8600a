pub mod animals;
pub mod category;
pub mod type_mapper;

pub use category::{FacilityCategory, FacilityClass, LicenseType};
pub use type_mapper::{classify_facility_type, default_class, matching_rule};
