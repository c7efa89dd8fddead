use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Unsupported input format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Row {row} has {found} fields but the header has {expected}")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Input file has no usable table: {message}")]
    EmptyInput { message: String },

    #[error("Required columns not detected. Detected columns: {detected:?}")]
    SchemaResolution { detected: Vec<String> },

    #[error("Could not convert amount '{value}' at row {row} to a number")]
    AmountParse { row: usize, value: String },

    #[error("No rows with a valid date remain after cleaning")]
    EmptyDataset,

    #[error("Month {year}-{month:02} is outside the supported calendar")]
    CalendarOverflow { year: i32, month: u32 },

    #[error("{model} needs at least {required} monthly points, got {actual}")]
    InsufficientData {
        model: String,
        required: usize,
        actual: usize,
    },

    #[error("{model} fit failed: {message}")]
    ModelFit { model: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Schema,
    Data,
    Model,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::ConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. }
            | ReportError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ReportError::CsvError(_)
            | ReportError::SpreadsheetError(_)
            | ReportError::UnsupportedFormat { .. }
            | ReportError::MalformedRow { .. }
            | ReportError::EmptyInput { .. } => ErrorCategory::Input,
            ReportError::SchemaResolution { .. } => ErrorCategory::Schema,
            ReportError::AmountParse { .. }
            | ReportError::EmptyDataset
            | ReportError::CalendarOverflow { .. } => ErrorCategory::Data,
            ReportError::InsufficientData { .. } | ReportError::ModelFit { .. } => {
                ErrorCategory::Model
            }
            ReportError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Schema | ErrorCategory::Data => {
                ErrorSeverity::High
            }
            ErrorCategory::Model => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::SchemaResolution { detected } => format!(
                "Required columns not detected.\nDetected columns: {}",
                detected.join(", ")
            ),
            ReportError::AmountParse { row, value } => format!(
                "The amount '{}' in data row {} is not a number; the report was stopped.",
                value, row
            ),
            ReportError::EmptyDataset => {
                "None of the rows contain a recognizable date.".to_string()
            }
            ReportError::CsvError(e) => format!("The CSV file could not be read: {}", e),
            ReportError::SpreadsheetError(e) => {
                format!("The spreadsheet could not be read: {}", e)
            }
            ReportError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command-line options and the TOML configuration file".to_string()
            }
            ErrorCategory::Input => {
                "Upload a comma-separated (.csv) file or an Excel (.xlsx) workbook with a header row"
                    .to_string()
            }
            ErrorCategory::Schema => format!(
                "Rename the columns to one of the supported names. Amount: {}. Date: {}",
                crate::core::schema::AMOUNT_ALIASES.join(", "),
                crate::core::schema::DATE_ALIASES.join(", ")
            ),
            ErrorCategory::Data => {
                "Make sure the amount column only holds numbers, optionally with ',' separators or '₹'"
                    .to_string()
            }
            ErrorCategory::Model => {
                "Provide at least two months of sales history with finite amounts".to_string()
            }
            ErrorCategory::System => "Check that the file exists and is readable".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_detected_columns() {
        let err = ReportError::SchemaResolution {
            detected: vec!["Region".to_string(), "Units".to_string()],
        };

        assert_eq!(err.category(), ErrorCategory::Schema);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("Region, Units"));
        assert!(err.recovery_suggestion().contains("Weekly_Sales"));
    }

    #[test]
    fn test_model_errors_are_medium_severity() {
        let err = ReportError::InsufficientData {
            model: "Holt-Winters".to_string(),
            required: 2,
            actual: 1,
        };
        assert_eq!(err.category(), ErrorCategory::Model);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(
            err.to_string(),
            "Holt-Winters needs at least 2 monthly points, got 1"
        );
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = ReportError::MissingConfigError {
            field: "input.path".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_long_csv_row_is_an_input_error() {
        let err = ReportError::MalformedRow {
            row: 3,
            expected: 2,
            found: 4,
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.to_string(), "Row 3 has 4 fields but the header has 2");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Medium < ErrorSeverity::High);
        assert!(ErrorSeverity::High < ErrorSeverity::Critical);
    }
}
