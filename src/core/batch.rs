use crate::core::normalizer;
use crate::core::rate_limiter::RateLimiter;
use crate::core::resolver::CoordinateResolver;
use crate::domain::model::{BatchSummary, Record, TransformResult};
use crate::domain::ports::{AddressService, GeocodingService};
use chrono::Utc;
use std::time::Duration;

/// `round(100 * done / total)`, clamped to 100.
pub fn percent_complete(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = ((done as f64 / total as f64) * 100.0).round();
    percent.min(100.0) as u8
}

/// Resolves records one at a time, pausing after each to respect upstream rate limits.
pub struct BatchRunner<A: AddressService, G: GeocodingService> {
    resolver: CoordinateResolver<A, G>,
    record_delay: Duration,
}

impl<A: AddressService, G: GeocodingService> BatchRunner<A, G> {
    pub fn new(resolver: CoordinateResolver<A, G>, record_delay: Duration) -> Self {
        Self {
            resolver,
            record_delay,
        }
    }

    pub fn resolver(&self) -> &CoordinateResolver<A, G> {
        &self.resolver
    }

    /// Output keeps the input order, one record per input record.
    ///
    /// `on_progress` receives the completion percentage after every record; the
    /// last call always reports 100. An empty batch reports nothing.
    pub async fn run_batch<F>(&self, records: &[Record], mut on_progress: F) -> Vec<Record>
    where
        F: FnMut(u8),
    {
        let total = records.len();
        let mut limiter = RateLimiter::new(self.record_delay);
        let mut processed = Vec::with_capacity(total);

        for (index, input) in records.iter().enumerate() {
            let record = input.pending();
            let postal_code = normalizer::normalize(&record.postal_code).formatted;
            let result = self.resolver.resolve(&record.postal_code).await;

            tracing::debug!(
                "Record {} ({}): {} [{}, {}]",
                record.id,
                postal_code,
                result.status,
                result.latitude,
                result.longitude
            );

            processed.push(record.resolved(postal_code, result));
            on_progress(percent_complete(index + 1, total));

            limiter.pause().await;
        }

        processed
    }

    /// Runs the batch and tallies the statuses.
    pub async fn run<F>(&self, records: &[Record], on_progress: F) -> TransformResult
    where
        F: FnMut(u8),
    {
        let started_at = Utc::now();
        let records = self.run_batch(records, on_progress).await;
        let summary = BatchSummary::from_records(&records, started_at, Utc::now());

        TransformResult { records, summary }
    }
}
