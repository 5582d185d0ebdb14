use crate::adapters::csv_io;
use crate::adapters::{NominatimClient, ViaCepClient};
use crate::core::batch::BatchRunner;
use crate::core::resolver::{CoordinateResolver, ResolverOptions};
use crate::core::{
    AddressService, ConfigProvider, GeocodingService, Pipeline, Record, Storage, TransformResult,
};
use crate::utils::error::{GeocodeError, Result};
use std::path::Path;

/// CSV in, batch resolution, CSV out.
pub struct GeocodePipeline<S: Storage, C: ConfigProvider, A: AddressService, G: GeocodingService> {
    storage: S,
    config: C,
    runner: BatchRunner<A, G>,
}

impl<S: Storage, C: ConfigProvider> GeocodePipeline<S, C, ViaCepClient, NominatimClient> {
    /// Wires the ViaCEP and Nominatim clients from `config`.
    pub fn new(storage: S, config: C) -> Result<Self> {
        let address_service = ViaCepClient::new(
            config.address_endpoint(),
            config.user_agent(),
            config.request_timeout(),
        )?;
        let geocoding_service = NominatimClient::new(
            config.geocoding_endpoint(),
            config.user_agent(),
            config.request_timeout(),
        )?;
        Ok(Self::with_services(
            storage,
            config,
            address_service,
            geocoding_service,
        ))
    }
}

impl<S: Storage, C: ConfigProvider, A: AddressService, G: GeocodingService>
    GeocodePipeline<S, C, A, G>
{
    pub fn with_services(storage: S, config: C, address_service: A, geocoding_service: G) -> Self {
        let options = ResolverOptions {
            country: config.country().to_string(),
            fallback_enabled: config.fallback_enabled(),
            fallback_suffix: config.fallback_suffix().to_string(),
        };
        let resolver = CoordinateResolver::with_options(address_service, geocoding_service, options);
        let runner = BatchRunner::new(resolver, config.record_delay());

        Self {
            storage,
            config,
            runner,
        }
    }

    fn output_file(&self) -> String {
        Path::new(self.config.output_path())
            .join(self.config.output_filename())
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, A: AddressService, G: GeocodingService> Pipeline
    for GeocodePipeline<S, C, A, G>
{
    async fn extract(&self) -> Result<Vec<Record>> {
        let input = self.config.input_path();
        tracing::info!("📥 Reading records from: {}", input);

        let data = self.storage.read_file(input).await?;
        let records = csv_io::read_records(&data)?;

        if records.is_empty() {
            return Err(GeocodeError::InputError {
                message: format!("{} contains no records", input),
            });
        }

        tracing::info!("📊 Extracted {} records", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        tracing::info!(
            "🔧 Resolving coordinates for {} records ({:?} between records)",
            data.len(),
            self.config.record_delay()
        );

        let mut last_reported = 0u8;
        let result = self
            .runner
            .run(&data, |percent| {
                if percent != last_reported {
                    last_reported = percent;
                    tracing::info!("⏳ {}% complete", percent);
                }
            })
            .await;

        tracing::info!(
            "✅ Resolved {} of {} records",
            result.summary.succeeded(),
            result.summary.total
        );
        Ok(result)
    }

    async fn load(&self, result: &TransformResult) -> Result<String> {
        let output_file = self.output_file();
        let data = csv_io::write_records(&result.records)?;

        tracing::debug!("Writing CSV ({} bytes) to storage", data.len());
        self.storage.write_file(&output_file, &data).await?;

        tracing::info!("💾 Output saved: {}", output_file);
        Ok(output_file)
    }
}
