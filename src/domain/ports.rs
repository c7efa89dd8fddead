use crate::domain::model::{RawTable, SalesReport};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn horizon(&self) -> usize;
    fn preview_rows(&self) -> usize;
    fn chart_size(&self) -> (u16, u16);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawTable>;
    async fn transform(&self, table: RawTable) -> Result<SalesReport>;
    async fn load(&self, report: SalesReport) -> Result<String>;
}
