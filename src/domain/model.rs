use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Placeholder for coordinates that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Outcome of resolving one postal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolutionStatus {
    #[default]
    NotProcessed,
    InvalidPostalCode,
    PostalCodeNotFound,
    PostalCodeServiceError,
    AddressNotFound,
    GeocodingServiceError,
    Success,
    ApproximateSuccess,
}

impl ResolutionStatus {
    pub const ALL: [ResolutionStatus; 8] = [
        ResolutionStatus::NotProcessed,
        ResolutionStatus::InvalidPostalCode,
        ResolutionStatus::PostalCodeNotFound,
        ResolutionStatus::PostalCodeServiceError,
        ResolutionStatus::AddressNotFound,
        ResolutionStatus::GeocodingServiceError,
        ResolutionStatus::Success,
        ResolutionStatus::ApproximateSuccess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStatus::NotProcessed => "not yet processed",
            ResolutionStatus::InvalidPostalCode => "invalid postal code: expected 8 digits",
            ResolutionStatus::PostalCodeNotFound => "postal code not found",
            ResolutionStatus::PostalCodeServiceError => "postal-code service error",
            ResolutionStatus::AddressNotFound => "address not found",
            ResolutionStatus::GeocodingServiceError => "geocoding service error",
            ResolutionStatus::Success => "success",
            ResolutionStatus::ApproximateSuccess => "success (approximate, city-level)",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ResolutionStatus::Success | ResolutionStatus::ApproximateSuccess
        )
    }
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResolutionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One input row plus the coordinates resolved for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub name: Option<String>,
    pub postal_code: String,
    pub latitude: String,
    pub longitude: String,
    pub status: ResolutionStatus,
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

impl Record {
    pub fn new(id: impl Into<String>, name: Option<String>, postal_code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name,
            postal_code: postal_code.into(),
            latitude: not_available(),
            longitude: not_available(),
            status: ResolutionStatus::NotProcessed,
        }
    }

    /// Copy with coordinates and status reset to their placeholders.
    pub fn pending(&self) -> Self {
        Self {
            latitude: not_available(),
            longitude: not_available(),
            status: ResolutionStatus::NotProcessed,
            ..self.clone()
        }
    }

    /// Builds the output record for `self` from a resolution.
    pub fn resolved(&self, postal_code: String, result: ResolutionResult) -> Self {
        Self {
            postal_code,
            latitude: result.latitude,
            longitude: result.longitude,
            status: result.status,
            ..self.clone()
        }
    }
}

/// Canonical 8-digit CEP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPostalCode {
    digits: String,
}

impl NormalizedPostalCode {
    /// `digits` must already be exactly eight ASCII digits.
    pub(crate) fn from_digits(digits: String) -> Self {
        debug_assert!(digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit()));
        Self { digits }
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn prefix(&self) -> &str {
        &self.digits[..5]
    }

    pub fn suffix(&self) -> &str {
        &self.digits[5..]
    }

    /// `XXXXX-XXX`
    pub fn formatted(&self) -> String {
        format!("{}-{}", self.prefix(), self.suffix())
    }

    /// Generic codes ending in `000` cover a whole city rather than a street.
    pub fn is_city_level(&self) -> bool {
        self.suffix() == "000"
    }

    /// Same prefix with another 3-digit suffix. Returns `None` unless `suffix` is three digits.
    pub fn with_suffix(&self, suffix: &str) -> Option<Self> {
        if suffix.len() != 3 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self::from_digits(format!("{}{}", self.prefix(), suffix)))
    }
}

impl fmt::Display for NormalizedPostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix(), self.suffix())
    }
}

/// Address components returned by the postal-code service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub region: String,
}

impl Address {
    /// Free-text query for the geocoder. Blank components are left out.
    pub fn to_query(&self, country: &str) -> String {
        [
            self.street.as_str(),
            self.city.as_str(),
            self.region.as_str(),
            country,
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// City-only query used by the city-level fallback.
    pub fn to_city_query(&self, country: &str) -> Option<String> {
        if self.city.trim().is_empty() || self.region.trim().is_empty() {
            return None;
        }
        Some(format!(
            "{}, {}, {}",
            self.city.trim(),
            self.region.trim(),
            country
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressLookup {
    Found(Address),
    NotFound,
}

/// One geocoder hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoPoint {
    pub lat: String,
    pub lon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    pub latitude: String,
    pub longitude: String,
    pub status: ResolutionStatus,
}

impl ResolutionResult {
    pub fn failed(status: ResolutionStatus) -> Self {
        Self {
            latitude: not_available(),
            longitude: not_available(),
            status,
        }
    }

    pub fn located(point: &GeoPoint, status: ResolutionStatus) -> Self {
        Self {
            latitude: decimal_point(&point.lat),
            longitude: decimal_point(&point.lon),
            status,
        }
    }
}

fn decimal_point(value: &str) -> String {
    value.trim().replace(',', ".")
}

/// Per-status tally of a finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub counts: Vec<(ResolutionStatus, usize)>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchSummary {
    pub fn from_records(
        records: &[Record],
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let counts = ResolutionStatus::ALL
            .iter()
            .map(|status| {
                let n = records.iter().filter(|r| r.status == *status).count();
                (*status, n)
            })
            .filter(|(_, n)| *n > 0)
            .collect();

        Self {
            total: records.len(),
            counts,
            started_at,
            finished_at,
        }
    }

    pub fn count(&self, status: ResolutionStatus) -> usize {
        self.counts
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn succeeded(&self) -> usize {
        self.count(ResolutionStatus::Success) + self.count(ResolutionStatus::ApproximateSuccess)
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<Record>,
    pub summary: BatchSummary,
}
