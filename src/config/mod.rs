pub mod cli;
pub mod toml_config;

use crate::core::{ingest::ACCEPTED_EXTENSIONS, ConfigProvider};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_path, validate_positive_number, validate_range, Validate,
};
#[cfg(feature = "cli")]
use crate::utils::validation::validate_required_field;
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_HORIZON: usize = 6;
pub const MIN_HORIZON: usize = 3;
pub const MAX_HORIZON: usize = 12;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_CHART_WIDTH: u16 = 80;
pub const DEFAULT_CHART_HEIGHT: u16 = 20;
const MIN_CHART_WIDTH: usize = 40;
const MIN_CHART_HEIGHT: usize = 10;

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub input_path: String,
    pub horizon: usize,
    pub preview_rows: usize,
    pub chart_width: u16,
    pub chart_height: u16,
    pub monitor: bool,
}

impl ReportSettings {
    pub fn new(input_path: String) -> Self {
        Self {
            input_path,
            horizon: DEFAULT_HORIZON,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
            monitor: false,
        }
    }
}

impl ConfigProvider for ReportSettings {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn horizon(&self) -> usize {
        self.horizon
    }

    fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    fn chart_size(&self) -> (u16, u16) {
        (self.chart_width, self.chart_height)
    }
}

impl Validate for ReportSettings {
    fn validate(&self) -> Result<()> {
        validate_path("input.path", &self.input_path)?;
        validate_file_extension("input.path", &self.input_path, &ACCEPTED_EXTENSIONS)?;
        validate_range("forecast.horizon", self.horizon, MIN_HORIZON, MAX_HORIZON)?;
        validate_positive_number("display.preview_rows", self.preview_rows, 1)?;
        validate_positive_number(
            "display.chart_width",
            usize::from(self.chart_width),
            MIN_CHART_WIDTH,
        )?;
        validate_positive_number(
            "display.chart_height",
            usize::from(self.chart_height),
            MIN_CHART_HEIGHT,
        )?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "sales-trend")]
#[command(about = "Monthly sales trend report with linear and Holt-Winters forecasts")]
pub struct CliConfig {
    /// Sales dataset (.csv or .xlsx)
    pub input: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Months to forecast (3-12, default 6)
    #[arg(long)]
    pub horizon: Option<usize>,

    /// Rows shown in the dataset preview
    #[arg(long)]
    pub preview_rows: Option<usize>,

    #[arg(long)]
    pub chart_width: Option<u16>,

    #[arg(long)]
    pub chart_height: Option<u16>,

    #[arg(long, help = "Log CPU and memory usage per stage")]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併 TOML 檔與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<ReportSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                Some(toml_config::TomlConfig::from_file(path)?)
            }
            None => None,
        };

        let mut settings = match file {
            Some(mut file) => {
                if let Some(input) = &self.input {
                    file.input = Some(toml_config::InputConfig {
                        path: input.clone(),
                    });
                }
                file.to_settings()?
            }
            None => ReportSettings::new(validate_required_field("input", &self.input)?.clone()),
        };

        if let Some(horizon) = self.horizon {
            settings.horizon = horizon;
        }
        if let Some(rows) = self.preview_rows {
            settings.preview_rows = rows;
        }
        if let Some(width) = self.chart_width {
            settings.chart_width = width;
        }
        if let Some(height) = self.chart_height {
            settings.chart_height = height;
        }
        settings.monitor |= self.monitor;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = ReportSettings::new("sales.csv".to_string());
        assert_eq!(settings.horizon, DEFAULT_HORIZON);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_horizon_bounds() {
        let mut settings = ReportSettings::new("sales.xlsx".to_string());
        settings.horizon = MIN_HORIZON;
        assert!(settings.validate().is_ok());
        settings.horizon = MAX_HORIZON;
        assert!(settings.validate().is_ok());
        settings.horizon = 2;
        assert!(settings.validate().is_err());
        settings.horizon = 13;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_extension_and_small_charts() {
        assert!(ReportSettings::new("sales.json".to_string()).validate().is_err());

        let mut settings = ReportSettings::new("sales.csv".to_string());
        settings.chart_height = 5;
        assert!(settings.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides() {
        let cli = CliConfig::parse_from([
            "sales-trend",
            "sales.csv",
            "--horizon",
            "12",
            "--preview-rows",
            "10",
            "--monitor",
        ]);
        let settings = cli.resolve().unwrap();

        assert_eq!(settings.input_path, "sales.csv");
        assert_eq!(settings.horizon, 12);
        assert_eq!(settings.preview_rows, 10);
        assert!(settings.monitor);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_requires_input_without_config() {
        let cli = CliConfig::parse_from(["sales-trend"]);
        assert!(cli.resolve().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_input_overrides_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[input]\npath = \"from-file.csv\"\n[forecast]\nhorizon = 4\n")
            .unwrap();

        let cli = CliConfig::parse_from([
            "sales-trend",
            "from-cli.xlsx",
            "--config",
            file.path().to_str().unwrap(),
        ]);
        let settings = cli.resolve().unwrap();

        assert_eq!(settings.input_path, "from-cli.xlsx");
        assert_eq!(settings.horizon, 4);
    }
}
