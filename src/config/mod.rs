pub mod toml_config;

use crate::core::rate_limiter::DEFAULT_RECORD_DELAY;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation;

#[cfg(feature = "cli")]
use crate::adapters::nominatim::DEFAULT_NOMINATIM_ENDPOINT;
#[cfg(feature = "cli")]
use crate::adapters::viacep::DEFAULT_VIACEP_ENDPOINT;
#[cfg(feature = "cli")]
use crate::core::resolver::{DEFAULT_COUNTRY, DEFAULT_FALLBACK_SUFFIX};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::time::Duration;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_OUTPUT_FILENAME: &str = "franquias-com-coordenadas.csv";
pub const DEFAULT_USER_AGENT: &str = concat!("cep-geocoder/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_DELAY_MS: u64 = DEFAULT_RECORD_DELAY.as_millis() as u64;

/// Checks shared by every configuration source.
pub fn validate_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_csv_path("input", config.input_path())?;
    validation::validate_path("output.path", config.output_path())?;
    validation::validate_non_empty_string("output.filename", config.output_filename())?;
    validation::validate_endpoint("services.address.endpoint", config.address_endpoint())?;
    validation::validate_endpoint("services.geocoding.endpoint", config.geocoding_endpoint())?;
    validation::validate_non_empty_string("services.user_agent", config.user_agent())?;
    validation::validate_range(
        "services.timeout_seconds",
        config.request_timeout().as_secs(),
        1,
        300,
    )?;
    validation::validate_range(
        "batch.delay_ms",
        config.record_delay().as_millis() as u64,
        0,
        60_000,
    )?;
    validation::validate_non_empty_string("batch.country", config.country())?;
    validation::validate_digits("batch.fallback_suffix", config.fallback_suffix(), 3)?;
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cep-geocoder")]
#[command(about = "Enrich a CSV of Brazilian postal codes (CEP) with latitude and longitude")]
pub struct CliConfig {
    /// CSV file with the columns id, nome, cep
    #[arg(short, long)]
    pub input: Option<String>,

    /// TOML configuration file; when given, its settings replace the flags below except --input
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILENAME)]
    pub output_filename: String,

    #[arg(long, default_value = DEFAULT_VIACEP_ENDPOINT)]
    pub address_endpoint: String,

    #[arg(long, default_value = DEFAULT_NOMINATIM_ENDPOINT)]
    pub geocoding_endpoint: String,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout for both upstream services
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// Pause after each record, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    #[arg(long, default_value = DEFAULT_COUNTRY)]
    pub country: String,

    /// Disable the city-level fallback for codes ending in 000
    #[arg(long)]
    pub no_fallback: bool,

    #[arg(long, default_value = DEFAULT_FALLBACK_SUFFIX)]
    pub fallback_suffix: String,

    /// Show the effective configuration and exit
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_filename(&self) -> &str {
        &self.output_filename
    }

    fn address_endpoint(&self) -> &str {
        &self.address_endpoint
    }

    fn geocoding_endpoint(&self) -> &str {
        &self.geocoding_endpoint
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn record_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    fn country(&self) -> &str {
        &self.country
    }

    fn fallback_enabled(&self) -> bool {
        !self.no_fallback
    }

    fn fallback_suffix(&self) -> &str {
        &self.fallback_suffix
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_required_field("input", &self.input)?;
        validate_settings(self)
    }
}
