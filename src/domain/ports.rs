use crate::domain::model::{
    AddressLookup, GeoPoint, NormalizedPostalCode, Record, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_filename(&self) -> &str;
    fn address_endpoint(&self) -> &str;
    fn geocoding_endpoint(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn record_delay(&self) -> Duration;
    fn country(&self) -> &str;
    fn fallback_enabled(&self) -> bool;
    fn fallback_suffix(&self) -> &str;
}

/// Postal code to address lookup (ViaCEP in production).
///
/// `Ok(AddressLookup::NotFound)` means the service answered and knows no such
/// code; `Err` means the call itself failed.
#[async_trait]
pub trait AddressService: Send + Sync {
    async fn lookup(&self, postal_code: &NormalizedPostalCode) -> Result<AddressLookup>;
}

/// Free-text address to coordinates (Nominatim in production).
#[async_trait]
pub trait GeocodingService: Send + Sync {
    async fn search(&self, address: &str, max_results: usize) -> Result<Vec<GeoPoint>>;
}

#[async_trait]
impl<T: AddressService + ?Sized> AddressService for std::sync::Arc<T> {
    async fn lookup(&self, postal_code: &NormalizedPostalCode) -> Result<AddressLookup> {
        (**self).lookup(postal_code).await
    }
}

#[async_trait]
impl<T: GeocodingService + ?Sized> GeocodingService for std::sync::Arc<T> {
    async fn search(&self, address: &str, max_results: usize) -> Result<Vec<GeoPoint>> {
        (**self).search(address, max_results).await
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<String>;
}
