use crate::core::{
    aggregate, cleaning, evaluate, forecast, ingest::{self, InputFormat}, schema,
};
use crate::core::{ConfigProvider, Pipeline, RawTable, SalesReport, Storage};
use crate::present::Presenter;
use crate::utils::error::Result;

pub struct SalesPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SalesPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SalesPipeline<S, C> {
    async fn extract(&self) -> Result<RawTable> {
        let path = self.config.input_path();
        tracing::debug!("Reading input file: {}", path);

        let bytes = self.storage.read_file(path).await?;
        let format = InputFormat::from_path(path);
        tracing::debug!("Read {} bytes as {:?}", bytes.len(), format);

        ingest::parse_table(bytes, format)
    }

    async fn transform(&self, table: RawTable) -> Result<SalesReport> {
        let horizon = self.config.horizon();

        // 找不到欄位時直接中止，不進行任何計算
        let mapping = schema::normalize(&table)?;

        let cleaned = cleaning::clean(&table, &mapping)?;
        let monthly = aggregate::monthly_totals(&cleaned.rows)?;
        tracing::info!("Aggregated into {} monthly points", monthly.len());

        let forecast = forecast::forecast_table(&monthly, horizon)?;
        let evaluation = evaluate::evaluate(&monthly, &forecast, horizon);
        let backtest = evaluate::holdout_backtest(&monthly, horizon);
        let insight = evaluate::insight(&monthly, &forecast);

        tracing::debug!(
            "Evaluation: LR MAE={:.2} RMSE={:.2}, HW MAE={:.2} RMSE={:.2}",
            evaluation.mae_lr,
            evaluation.rmse_lr,
            evaluation.mae_hw,
            evaluation.rmse_hw
        );

        Ok(SalesReport {
            preview: table.head(self.config.preview_rows()),
            mapping,
            dropped_rows: cleaned.dropped,
            monthly,
            forecast,
            evaluation,
            backtest,
            insight,
        })
    }

    async fn load(&self, report: SalesReport) -> Result<String> {
        let (width, height) = self.config.chart_size();
        let rendered = Presenter::new(width, height).render(&report);
        tracing::debug!("Rendered report ({} bytes)", rendered.len());
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Insight;
    use crate::utils::error::ReportError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, content: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), content.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ReportError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }
    }

    struct MockConfig {
        input_path: String,
        horizon: usize,
    }

    impl MockConfig {
        fn new(input_path: &str, horizon: usize) -> Self {
            Self {
                input_path: input_path.to_string(),
                horizon,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn horizon(&self) -> usize {
            self.horizon
        }

        fn preview_rows(&self) -> usize {
            5
        }

        fn chart_size(&self) -> (u16, u16) {
            (80, 20)
        }
    }

    fn linear_csv(months: u32) -> String {
        let mut csv = String::from("Order Date,Region,Sales\n");
        for m in 1..=months {
            csv.push_str(&format!("2023-{:02}-10,North,\"₹{},000\"\n", m, m));
        }
        csv
    }

    #[tokio::test]
    async fn test_extract_reads_csv_through_storage() {
        let storage = MockStorage::with_file("sales.csv", "Date,Amount\n2024-01-01,10\n");
        let pipeline = SalesPipeline::new(storage, MockConfig::new("sales.csv", 6));

        let table = pipeline.extract().await.unwrap();

        assert_eq!(table.columns, vec!["Date", "Amount"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let storage = MockStorage::with_file("other.csv", "");
        let pipeline = SalesPipeline::new(storage, MockConfig::new("sales.csv", 6));

        assert!(matches!(
            pipeline.extract().await,
            Err(ReportError::IoError(_))
        ));
    }

    #[tokio::test]
    async fn test_transform_linear_series() {
        let storage = MockStorage::with_file("sales.csv", &linear_csv(12));
        let pipeline = SalesPipeline::new(storage, MockConfig::new("sales.csv", 4));

        let table = pipeline.extract().await.unwrap();
        let report = pipeline.transform(table).await.unwrap();

        assert_eq!(report.mapping.date_column, "Order Date");
        assert_eq!(report.mapping.amount_column, "Sales");
        assert_eq!(report.preview.rows.len(), 5);
        assert_eq!(report.monthly.len(), 12);
        assert_eq!(report.forecast.len(), 4);
        assert!((report.forecast[0].lr_value - 13000.0).abs() < 1e-6);
        assert!((report.forecast[3].hw_value - 16000.0).abs() < 1e-6);
        assert_eq!(report.insight, Insight::Upward);

        let backtest = report.backtest.unwrap();
        assert!(backtest.metrics.mae_lr < 1e-6);
    }

    #[tokio::test]
    async fn test_transform_schema_failure_stops_run() {
        let storage = MockStorage::with_file("sales.csv", "When,Total\n2024-01-01,10\n");
        let pipeline = SalesPipeline::new(storage, MockConfig::new("sales.csv", 6));

        let table = pipeline.extract().await.unwrap();
        match pipeline.transform(table).await {
            Err(ReportError::SchemaResolution { detected }) => {
                assert_eq!(detected, vec!["When", "Total"]);
            }
            other => panic!("expected schema error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_transform_single_month_fails_smoothing() {
        let storage = MockStorage::with_file(
            "sales.csv",
            "Date,Amount\n2024-01-01,10\n2024-01-20,15\n",
        );
        let pipeline = SalesPipeline::new(storage, MockConfig::new("sales.csv", 3));

        let table = pipeline.extract().await.unwrap();
        assert!(matches!(
            pipeline.transform(table).await,
            Err(ReportError::InsufficientData { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_renders_report() {
        let storage = MockStorage::with_file("sales.csv", &linear_csv(6));
        let pipeline = SalesPipeline::new(storage, MockConfig::new("sales.csv", 3));

        let table = pipeline.extract().await.unwrap();
        let report = pipeline.transform(table).await.unwrap();
        let text = pipeline.load(report).await.unwrap();

        assert!(text.contains("## Forecast Results"));
        assert!(text.contains("2023-07-31"));
        assert!(text.contains("2023-09-30"));
        assert!(!text.contains("2023-10-31"));
    }
}
