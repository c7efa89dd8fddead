pub mod config;
pub mod core;
pub mod domain;
pub mod present;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, ReportSettings};
pub use core::{etl::ReportEngine, pipeline::SalesPipeline};
pub use utils::error::{ReportError, Result};
