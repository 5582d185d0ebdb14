pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{LocalStorage, NominatimClient, ViaCepClient};
pub use core::{
    batch::BatchRunner,
    etl::{EtlEngine, RunReport},
    normalizer::normalize,
    pipeline::GeocodePipeline,
    resolver::CoordinateResolver,
};
pub use utils::error::{GeocodeError, Result};
