use crate::config::ReportSettings;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: Option<InputConfig>,
    pub forecast: Option<ForecastConfig>,
    pub display: Option<DisplayConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub horizon: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub preview_rows: Option<usize>,
    pub chart_width: Option<u16>,
    pub chart_height: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SALES_DATA})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 取得輸入檔路徑
    pub fn input_path(&self) -> Option<&str> {
        self.input.as_ref().map(|i| i.path.as_str())
    }

    /// 取得預測月數
    pub fn horizon(&self) -> Option<usize> {
        self.forecast.as_ref().and_then(|f| f.horizon)
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// 轉成執行用的設定，未指定的欄位使用預設值
    pub fn to_settings(&self) -> Result<ReportSettings> {
        let input = self.input.as_ref().map(|i| i.path.clone());
        let path = validate_required_field("input.path", &input)?;

        let mut settings = ReportSettings::new(path.clone());
        if let Some(horizon) = self.horizon() {
            settings.horizon = horizon;
        }
        if let Some(display) = &self.display {
            if let Some(rows) = display.preview_rows {
                settings.preview_rows = rows;
            }
            if let Some(width) = display.chart_width {
                settings.chart_width = width;
            }
            if let Some(height) = display.chart_height {
                settings.chart_height = height;
            }
        }
        settings.monitor = self.monitoring_enabled();
        Ok(settings)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_settings()?.validate()
    }
}
