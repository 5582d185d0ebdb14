use crate::adapters::nominatim::DEFAULT_NOMINATIM_ENDPOINT;
use crate::adapters::viacep::DEFAULT_VIACEP_ENDPOINT;
use crate::config::{
    validate_settings, DEFAULT_DELAY_MS, DEFAULT_OUTPUT_FILENAME, DEFAULT_OUTPUT_PATH,
    DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT,
};
use crate::core::resolver::{DEFAULT_COUNTRY, DEFAULT_FALLBACK_SUFFIX};
use crate::core::ConfigProvider;
use crate::utils::error::{GeocodeError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// File-based configuration. Every table is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_output_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub address: AddressServiceConfig,
    #[serde(default)]
    pub geocoding: GeocodingServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressServiceConfig {
    #[serde(default = "default_address_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingServiceConfig {
    #[serde(default = "default_geocoding_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,
    #[serde(default = "default_fallback_suffix")]
    pub fallback_suffix: String,
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_output_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_address_endpoint() -> String {
    DEFAULT_VIACEP_ENDPOINT.to_string()
}

fn default_geocoding_endpoint() -> String {
    DEFAULT_NOMINATIM_ENDPOINT.to_string()
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_fallback_suffix() -> String {
    DEFAULT_FALLBACK_SUFFIX.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            filename: default_output_filename(),
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout_seconds(),
            address: AddressServiceConfig::default(),
            geocoding: GeocodingServiceConfig::default(),
        }
    }
}

impl Default for AddressServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_address_endpoint(),
        }
    }
}

impl Default for GeocodingServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocoding_endpoint(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            country: default_country(),
            fallback_enabled: true,
            fallback_suffix: default_fallback_suffix(),
        }
    }
}

impl TomlConfig {
    /// Loads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GeocodeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        Self::substitute_vars(content, |name| std::env::var(name).ok())
    }

    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| GeocodeError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// `--input` on the command line wins over `[input] path`.
    pub fn with_input(mut self, input: Option<String>) -> Self {
        if input.is_some() {
            self.input.path = input;
        }
        self
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_required_field("input.path", &self.input.path)?;
        validate_settings(self)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        self.input.path.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_filename(&self) -> &str {
        &self.output.filename
    }

    fn address_endpoint(&self) -> &str {
        &self.services.address.endpoint
    }

    fn geocoding_endpoint(&self) -> &str {
        &self.services.geocoding.endpoint
    }

    fn user_agent(&self) -> &str {
        &self.services.user_agent
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.services.timeout_seconds)
    }

    fn record_delay(&self) -> Duration {
        Duration::from_millis(self.batch.delay_ms)
    }

    fn country(&self) -> &str {
        &self.batch.country
    }

    fn fallback_enabled(&self) -> bool {
        self.batch.fallback_enabled
    }

    fn fallback_suffix(&self) -> &str {
        &self.batch.fallback_suffix
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
