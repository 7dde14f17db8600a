//! Startup-loaded application state for the server, CLI and filter engine.
//! Load once, share via `Arc`; nothing here is mutated after construction.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::data::loader::{load_industrial, load_license, load_research};
use crate::data::records::{IndustrialFacility, LicenseRegistrant, ResearchRegistrant};
use crate::error::Result;
use crate::geo::{classify, display_name, Country, Locatable};

/// Read-only record sets, one per source dataset.
#[derive(Debug, Default)]
pub struct AppState {
    pub industrial: Vec<IndustrialFacility>,
    pub research: Vec<ResearchRegistrant>,
    pub license: Vec<LicenseRegistrant>,
}

impl AppState {
    /// Load all three datasets from the configured data directory. Missing
    /// files are empty datasets; a file that exists but cannot be read at all
    /// is an error.
    pub fn load(config: &AppConfig) -> Result<Arc<AppState>> {
        let industrial = load_industrial(&config.industrial_path())?;
        let research = load_research(&config.research_path())?;
        let license = load_license(&config.license_path())?;

        tracing::info!(
            industrial = industrial.len(),
            research = research.len(),
            license = license.len(),
            data_dir = %config.data_dir.display(),
            "datasets loaded"
        );

        Ok(Arc::new(Self::from_records(industrial, research, license)))
    }

    /// State over in-memory records, for tests and embedding.
    pub fn from_records(
        industrial: Vec<IndustrialFacility>,
        research: Vec<ResearchRegistrant>,
        license: Vec<LicenseRegistrant>,
    ) -> Self {
        Self {
            industrial,
            research,
            license,
        }
    }

    pub fn total_records(&self) -> usize {
        self.industrial.len() + self.research.len() + self.license.len()
    }

    /// Sorted, de-duplicated `(code, display name)` pairs of the regions that
    /// occur in the loaded data for `country`.
    pub fn region_options(&self, country: Country) -> Vec<(String, String)> {
        let records = self
            .industrial
            .iter()
            .map(|r| r as &dyn Locatable)
            .chain(self.research.iter().map(|r| r as &dyn Locatable))
            .chain(self.license.iter().map(|r| r as &dyn Locatable));

        let mut options = BTreeMap::new();
        for record in records {
            let class = classify(record);
            if class.country == country && !options.contains_key(&class.region) {
                let name = display_name(&class.region);
                options.insert(class.region, name);
            }
        }
        options.into_iter().collect()
    }
}
