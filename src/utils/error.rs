use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{service} responded with status {status}")]
    UpstreamStatusError { service: String, status: u16 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Input data error: {message}")]
    InputError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GeocodeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GeocodeError::HttpError(_) | GeocodeError::UpstreamStatusError { .. } => {
                ErrorCategory::Network
            }
            GeocodeError::CsvError(_)
            | GeocodeError::SerializationError(_)
            | GeocodeError::InputError { .. } => ErrorCategory::Data,
            GeocodeError::ConfigError { .. }
            | GeocodeError::ConfigValidationError { .. }
            | GeocodeError::InvalidConfigValueError { .. }
            | GeocodeError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GeocodeError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GeocodeError::HttpError(e) if e.is_timeout() => {
                "An upstream service took too long to answer".to_string()
            }
            GeocodeError::HttpError(_) | GeocodeError::UpstreamStatusError { .. } => {
                format!("Could not reach an upstream service: {}", self)
            }
            GeocodeError::CsvError(e) => format!("The CSV file could not be processed: {}", e),
            GeocodeError::IoError(e) => format!("File system error: {}", e),
            GeocodeError::SerializationError(e) => format!("Could not encode data: {}", e),
            GeocodeError::InputError { message } => format!("Invalid input: {}", message),
            _ => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and the service endpoints, then try again",
            ErrorCategory::Data => "Make sure the input is a CSV file with the columns id, nome, cep",
            ErrorCategory::Configuration => "Review the command-line flags or the TOML configuration file",
            ErrorCategory::System => "Check that the paths exist and that you have permission to use them",
        }
    }

    /// Process exit code for a failed run.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, GeocodeError>;
