//! Classification, filtering and export of regulatory animal-facility datasets
//! (slaughterhouses, processing plants, research registrants and
//! breeder/dealer/exhibitor licensees) for a multi-country facility map.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod facility;
pub mod filter;
pub mod geo;
pub mod server;

pub use error::{CagemapError, Result};
