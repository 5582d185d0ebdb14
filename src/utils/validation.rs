use crate::utils::error::{GeocodeError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: &str, reason: impl Into<String>) -> GeocodeError {
    GeocodeError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Service endpoints must be absolute http(s) URLs with a host.
pub fn validate_endpoint(field_name: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).map_err(|e| {
        invalid(
            field_name,
            endpoint,
            format!("not a valid service URL ({})", e),
        )
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            endpoint,
            format!("service URLs must use http or https, not {}", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field_name, endpoint, "service URL has no host"));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "path contains a NUL byte"));
    }
    Ok(())
}

/// The franchise list must be a `.csv` file (any case).
pub fn validate_csv_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;

    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(()),
        Some(ext) => Err(invalid(
            field_name,
            path,
            format!("expected a .csv file, got .{}", ext),
        )),
        None => Err(invalid(field_name, path, "expected a .csv file")),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| GeocodeError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "value cannot be blank"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Checks that `value` is made of exactly `len` ASCII digits, as in a CEP suffix.
pub fn validate_digits(field_name: &str, value: &str, len: usize) -> Result<()> {
    if value.len() != len || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(
            field_name,
            value,
            format!("must be exactly {} digits", len),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("services.address.endpoint", "https://viacep.com.br/ws").is_ok());
        assert!(validate_endpoint("services.geocoding.endpoint", "http://127.0.0.1:8080/search").is_ok());
        assert!(validate_endpoint("services.address.endpoint", "").is_err());
        assert!(validate_endpoint("services.address.endpoint", "viacep.com.br/ws").is_err());
        assert!(validate_endpoint("services.address.endpoint", "ftp://viacep.com.br").is_err());
    }

    #[test]
    fn test_validate_csv_path() {
        assert!(validate_csv_path("input", "franquias.csv").is_ok());
        assert!(validate_csv_path("input", "dados/LOJAS.CSV").is_ok());
        assert!(validate_csv_path("input", "franquias.xlsx").is_err());
        assert!(validate_csv_path("input", "franquias").is_err());
        assert!(validate_csv_path("input", "  ").is_err());
    }

    #[test]
    fn test_error_names_the_config_key() {
        let err = validate_range("services.timeout_seconds", 0u64, 1, 300).unwrap_err();
        match err {
            GeocodeError::InvalidConfigValueError { field, value, .. } => {
                assert_eq!(field, "services.timeout_seconds");
                assert_eq!(value, "0");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("batch.delay_ms", 0u64, 0, 60_000).is_ok());
        assert!(validate_range("batch.delay_ms", 60_001u64, 0, 60_000).is_err());
    }

    #[test]
    fn test_validate_digits() {
        assert!(validate_digits("batch.fallback_suffix", "010", 3).is_ok());
        assert!(validate_digits("batch.fallback_suffix", "01", 3).is_err());
        assert!(validate_digits("batch.fallback_suffix", "0a0", 3).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("franquias.csv".to_string());
        let missing: Option<String> = None;
        assert_eq!(
            validate_required_field("input.path", &present).unwrap(),
            "franquias.csv"
        );
        assert!(matches!(
            validate_required_field("input.path", &missing),
            Err(GeocodeError::MissingConfigError { .. })
        ));
    }
}
