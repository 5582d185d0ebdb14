use crate::core::Pipeline;
use crate::domain::model::BatchSummary;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub summary: BatchSummary,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("🚀 Starting geocoding run");

        let records = self.pipeline.extract().await?;
        let result = self.pipeline.transform(records).await?;
        let output_path = self.pipeline.load(&result).await?;

        let summary = result.summary;
        tracing::info!(
            "📊 {} records in {}s: {} resolved",
            summary.total,
            summary.elapsed().num_seconds(),
            summary.succeeded()
        );
        for (status, count) in &summary.counts {
            tracing::info!("   {:>5}  {}", count, status);
        }

        Ok(RunReport {
            output_path,
            summary,
        })
    }
}
