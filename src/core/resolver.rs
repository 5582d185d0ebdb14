use crate::core::normalizer;
use crate::domain::model::{AddressLookup, NormalizedPostalCode, ResolutionResult, ResolutionStatus};
use crate::domain::ports::{AddressService, GeocodingService};

pub const DEFAULT_COUNTRY: &str = "Brasil";
pub const DEFAULT_FALLBACK_SUFFIX: &str = "010";

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Appended to every geocoder query.
    pub country: String,
    pub fallback_enabled: bool,
    /// Suffix probed when a city-level (`XXXXX-000`) lookup fails.
    pub fallback_suffix: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            fallback_enabled: true,
            fallback_suffix: DEFAULT_FALLBACK_SUFFIX.to_string(),
        }
    }
}

/// Turns a raw CEP into coordinates: postal-code lookup first, then geocoding.
///
/// Every failure is reported through [`ResolutionStatus`]; `resolve` never errors.
pub struct CoordinateResolver<A: AddressService, G: GeocodingService> {
    address_service: A,
    geocoding_service: G,
    options: ResolverOptions,
}

impl<A: AddressService, G: GeocodingService> CoordinateResolver<A, G> {
    pub fn new(address_service: A, geocoding_service: G) -> Self {
        Self::with_options(address_service, geocoding_service, ResolverOptions::default())
    }

    pub fn with_options(address_service: A, geocoding_service: G, options: ResolverOptions) -> Self {
        Self {
            address_service,
            geocoding_service,
            options,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn address_service(&self) -> &A {
        &self.address_service
    }

    pub fn geocoding_service(&self) -> &G {
        &self.geocoding_service
    }

    pub async fn resolve(&self, raw_postal_code: &str) -> ResolutionResult {
        match normalizer::parse(raw_postal_code) {
            Some(code) => self.resolve_code(&code).await,
            None => {
                tracing::debug!("Invalid postal code: {:?}", raw_postal_code);
                ResolutionResult::failed(ResolutionStatus::InvalidPostalCode)
            }
        }
    }

    pub async fn resolve_code(&self, code: &NormalizedPostalCode) -> ResolutionResult {
        let (query, status) = match self.address_service.lookup(code).await {
            Ok(AddressLookup::Found(address)) => {
                (address.to_query(&self.options.country), ResolutionStatus::Success)
            }
            Ok(AddressLookup::NotFound) => {
                tracing::warn!("Postal code not found: {}", code);
                return ResolutionResult::failed(ResolutionStatus::PostalCodeNotFound);
            }
            Err(e) => {
                tracing::warn!("Postal-code lookup failed for {}: {}", code, e);
                match self.city_fallback(code).await {
                    Some(query) => (query, ResolutionStatus::ApproximateSuccess),
                    None => return ResolutionResult::failed(ResolutionStatus::PostalCodeServiceError),
                }
            }
        };

        self.geocode(&query, status).await
    }

    /// Best effort: a sibling code under the same prefix usually names the same city.
    async fn city_fallback(&self, code: &NormalizedPostalCode) -> Option<String> {
        if !self.options.fallback_enabled || !code.is_city_level() {
            return None;
        }
        let probe = code.with_suffix(&self.options.fallback_suffix)?;

        tracing::info!("🔁 Trying city-level fallback {} for {}", probe, code);
        match self.address_service.lookup(&probe).await {
            Ok(AddressLookup::Found(address)) => address.to_city_query(&self.options.country),
            Ok(AddressLookup::NotFound) => {
                tracing::debug!("Fallback probe {} not found", probe);
                None
            }
            Err(e) => {
                tracing::debug!("Fallback probe {} failed: {}", probe, e);
                None
            }
        }
    }

    async fn geocode(&self, query: &str, status: ResolutionStatus) -> ResolutionResult {
        tracing::debug!("Geocoding {:?}", query);
        match self.geocoding_service.search(query, 1).await {
            Ok(points) => match points.first() {
                Some(point) if point.lat.trim().is_empty() || point.lon.trim().is_empty() => {
                    tracing::warn!("Geocoding result without coordinates for {:?}", query);
                    ResolutionResult::failed(ResolutionStatus::AddressNotFound)
                }
                Some(point) => ResolutionResult::located(point, status),
                None => {
                    tracing::warn!("No geocoding result for {:?}", query);
                    ResolutionResult::failed(ResolutionStatus::AddressNotFound)
                }
            },
            Err(e) => {
                tracing::warn!("Geocoding failed for {:?}: {}", query, e);
                ResolutionResult::failed(ResolutionStatus::GeocodingServiceError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{address, point, AddressAnswer, StubAddressService, StubGeocoder};
    use crate::domain::model::NOT_AVAILABLE;

    fn paulista() -> AddressAnswer {
        AddressAnswer::Found(address("Avenida Paulista", "São Paulo", "SP"))
    }

    #[tokio::test]
    async fn test_invalid_postal_code_makes_no_calls() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new(),
            StubGeocoder::returning(vec![point("1", "2")]),
        );

        let result = resolver.resolve("abc").await;

        assert_eq!(result.status, ResolutionStatus::InvalidPostalCode);
        assert!(result.status.to_string().starts_with("invalid postal code"));
        assert_eq!(result.latitude, NOT_AVAILABLE);
        assert_eq!(result.longitude, NOT_AVAILABLE);
        assert_eq!(resolver.address_service.calls(), 0);
        assert_eq!(resolver.geocoding_service.calls(), 0);
    }

    #[tokio::test]
    async fn test_not_found_postal_code() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new().with("12345678", AddressAnswer::NotFound),
            StubGeocoder::returning(vec![point("1", "2")]),
        );

        let result = resolver.resolve("12345-678").await;

        assert_eq!(result.status, ResolutionStatus::PostalCodeNotFound);
        assert_eq!(result.status.to_string(), "postal code not found");
        assert_eq!(result.latitude, NOT_AVAILABLE);
        assert_eq!(result.longitude, NOT_AVAILABLE);
        assert_eq!(resolver.geocoding_service.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_normalizes_decimal_comma() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new().with("01310100", paulista()),
            StubGeocoder::returning(vec![point("-23,55", "-46,63")]),
        );

        let result = resolver.resolve("01310-100").await;

        assert_eq!(result.status, ResolutionStatus::Success);
        assert_eq!(result.latitude, "-23.55");
        assert_eq!(result.longitude, "-46.63");
        assert_eq!(
            resolver.geocoding_service.queries(),
            vec![("Avenida Paulista, São Paulo, SP, Brasil".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_first_geocoding_result_wins() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new().with("01310100", paulista()),
            StubGeocoder::returning(vec![point("-23.5", "-46.6"), point("0", "0")]),
        );

        let result = resolver.resolve("01310100").await;

        assert_eq!(result.latitude, "-23.5");
        assert_eq!(result.longitude, "-46.6");
    }

    #[tokio::test]
    async fn test_blank_street_is_left_out_of_query() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new().with(
                "13010000",
                AddressAnswer::Found(address("", "Campinas", "SP")),
            ),
            StubGeocoder::returning(vec![point("-22.9", "-47.06")]),
        );

        let result = resolver.resolve("13010-000").await;

        assert_eq!(result.status, ResolutionStatus::Success);
        assert_eq!(
            resolver.geocoding_service.queries()[0].0,
            "Campinas, SP, Brasil"
        );
    }

    #[tokio::test]
    async fn test_empty_geocoding_result() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new().with("01310100", paulista()),
            StubGeocoder::returning(vec![]),
        );

        let result = resolver.resolve("01310100").await;

        assert_eq!(result.status, ResolutionStatus::AddressNotFound);
        assert_eq!(result.latitude, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_geocoding_failure() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new().with("01310100", paulista()),
            StubGeocoder::failing(),
        );

        let result = resolver.resolve("01310100").await;

        assert_eq!(result.status, ResolutionStatus::GeocodingServiceError);
        assert_eq!(result.longitude, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_city_level_fallback_success() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new()
                .with("13010000", AddressAnswer::Fail)
                .with(
                    "13010010",
                    AddressAnswer::Found(address("Rua Barão de Jaguara", "Campinas", "SP")),
                ),
            StubGeocoder::returning(vec![point("-22,90", "-47,06")]),
        );

        let result = resolver.resolve("13010-000").await;

        assert_eq!(result.status, ResolutionStatus::ApproximateSuccess);
        assert_eq!(result.status.to_string(), "success (approximate, city-level)");
        assert_eq!(result.latitude, "-22.90");
        assert_eq!(result.longitude, "-47.06");
        assert_eq!(
            resolver.address_service.seen(),
            vec!["13010000".to_string(), "13010010".to_string()]
        );
        // The street of the probe code must not leak into the query.
        assert_eq!(
            resolver.geocoding_service.queries()[0].0,
            "Campinas, SP, Brasil"
        );
    }

    #[tokio::test]
    async fn test_failed_fallback_reports_service_error() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new()
                .with("13010000", AddressAnswer::Fail)
                .with("13010010", AddressAnswer::NotFound),
            StubGeocoder::returning(vec![point("1", "2")]),
        );

        let result = resolver.resolve("13010-000").await;

        assert_eq!(result.status, ResolutionStatus::PostalCodeServiceError);
        assert_eq!(resolver.address_service.calls(), 2);
        assert_eq!(resolver.geocoding_service.calls(), 0);
    }

    #[tokio::test]
    async fn test_fallback_lookup_error_is_absorbed() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new()
                .with("13010000", AddressAnswer::Fail)
                .with("13010010", AddressAnswer::Fail),
            StubGeocoder::returning(vec![point("1", "2")]),
        );

        let result = resolver.resolve("13010-000").await;

        assert_eq!(result.status, ResolutionStatus::PostalCodeServiceError);
        assert_eq!(result.latitude, NOT_AVAILABLE);
        assert_eq!(resolver.address_service.calls(), 2);
        assert_eq!(resolver.geocoding_service.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_coordinates_are_not_a_hit() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new().with("01310100", paulista()),
            StubGeocoder::returning(vec![point("", " ")]),
        );

        let result = resolver.resolve("01310100").await;

        assert_eq!(result.status, ResolutionStatus::AddressNotFound);
        assert_eq!(result.latitude, NOT_AVAILABLE);
        assert_eq!(result.longitude, NOT_AVAILABLE);

        let resolver = CoordinateResolver::new(
            StubAddressService::new().with("01310100", paulista()),
            StubGeocoder::returning(vec![point("-23.5", "")]),
        );
        assert_eq!(
            resolver.resolve("01310100").await.status,
            ResolutionStatus::AddressNotFound
        );
    }

    #[tokio::test]
    async fn test_fallback_needs_city_and_region() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new()
                .with("13010000", AddressAnswer::Fail)
                .with(
                    "13010010",
                    AddressAnswer::Found(address("Rua X", "Campinas", "")),
                ),
            StubGeocoder::returning(vec![point("1", "2")]),
        );

        let result = resolver.resolve("13010000").await;

        assert_eq!(result.status, ResolutionStatus::PostalCodeServiceError);
        assert_eq!(resolver.geocoding_service.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_fallback_for_street_level_codes() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new().with("01310100", AddressAnswer::Fail),
            StubGeocoder::returning(vec![point("1", "2")]),
        );

        let result = resolver.resolve("01310-100").await;

        assert_eq!(result.status, ResolutionStatus::PostalCodeServiceError);
        assert_eq!(resolver.address_service.calls(), 1);
    }

    #[tokio::test]
    async fn test_fallback_can_be_disabled() {
        let options = ResolverOptions {
            fallback_enabled: false,
            ..ResolverOptions::default()
        };
        let resolver = CoordinateResolver::with_options(
            StubAddressService::new()
                .with("13010000", AddressAnswer::Fail)
                .with("13010010", AddressAnswer::Found(address("", "Campinas", "SP"))),
            StubGeocoder::returning(vec![point("1", "2")]),
            options,
        );

        let result = resolver.resolve("13010000").await;

        assert_eq!(result.status, ResolutionStatus::PostalCodeServiceError);
        assert_eq!(resolver.address_service.calls(), 1);
    }

    #[tokio::test]
    async fn test_custom_country_and_suffix() {
        let options = ResolverOptions {
            country: "Brazil".to_string(),
            fallback_enabled: true,
            fallback_suffix: "900".to_string(),
        };
        let resolver = CoordinateResolver::with_options(
            StubAddressService::new()
                .with("13010000", AddressAnswer::Fail)
                .with("13010900", AddressAnswer::Found(address("", "Campinas", "SP"))),
            StubGeocoder::returning(vec![point("1", "2")]),
            options,
        );

        let result = resolver.resolve("13010000").await;

        assert_eq!(result.status, ResolutionStatus::ApproximateSuccess);
        assert_eq!(resolver.geocoding_service.queries()[0].0, "Campinas, SP, Brazil");
    }

    #[tokio::test]
    async fn test_fallback_geocoding_failure_is_geocoding_error() {
        let resolver = CoordinateResolver::new(
            StubAddressService::new()
                .with("13010000", AddressAnswer::Fail)
                .with("13010010", AddressAnswer::Found(address("", "Campinas", "SP"))),
            StubGeocoder::failing(),
        );

        let result = resolver.resolve("13010000").await;

        assert_eq!(result.status, ResolutionStatus::GeocodingServiceError);
    }
}
