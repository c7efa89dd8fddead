use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Runs one upload through the pipeline, stage by stage. Any stage error
/// ends the run; nothing is retried.
pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    pub async fn run(&self) -> Result<String> {
        let mut monitor = SystemMonitor::new(self.monitor_enabled);
        tracing::info!("Starting sales trend report...");

        // Extract
        let table = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} rows with columns {:?}",
            table.rows.len(),
            table.columns
        );
        monitor.log_stats("extract");

        // Transform
        let report = self.pipeline.transform(table).await?;
        tracing::info!(
            "Forecast {} months from {} months of history",
            report.forecast.len(),
            report.monthly.len()
        );
        monitor.log_stats("transform");

        // Load
        let rendered = self.pipeline.load(report).await?;
        monitor.log_stats("load");
        monitor.log_final_stats();

        Ok(rendered)
    }
}
