pub mod address;
pub mod classifier;
pub mod country;
pub mod registry;

pub use address::{parse_city_state_zip, region_from_city_state_zip, CityStateZip};
pub use classifier::{
    classify, classify_country, country_for_region_code, german_region_from_establishment_id,
    in_germany_bbox, matches_region, GeoClass, Locatable,
};
pub use country::Country;
pub use registry::{belongs_to, display_name, region_name, regions_of};
