pub mod batch;
pub mod etl;
pub mod normalizer;
pub mod pipeline;
pub mod rate_limiter;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{Record, TransformResult};
pub use crate::domain::ports::{
    AddressService, ConfigProvider, GeocodingService, Pipeline, Storage,
};
pub use crate::utils::error::Result;
