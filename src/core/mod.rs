pub mod aggregate;
pub mod cleaning;
pub mod etl;
pub mod evaluate;
pub mod forecast;
pub mod ingest;
pub mod pipeline;
pub mod schema;

pub use crate::domain::model::{RawTable, Record, SalesReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
