use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn the source file into a `SalesTable`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open sales CSV '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error at line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("missing required column: `{0}`")]
    MissingColumn(&'static str),

    #[error("invalid date '{value}' at line {line} (expected day-first, e.g. 05-02-2010)")]
    InvalidDate { line: usize, value: String },

    #[error("invalid number '{value}' in `{column}` at line {line}")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("invalid holiday flag '{value}' at line {line} (expected 0 or 1)")]
    InvalidFlag { line: usize, value: String },
}

/// KPI computation attempted on a table with zero rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no sales rows available")]
pub struct NoDataError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("forecast needs at least 2 time points, got {n}")]
    InsufficientPoints { n: usize },

    #[error("trend series is not in ascending date order")]
    Unsorted,

    #[error("linear trend could not be solved")]
    Singular,

    #[error("forecast dates run past the supported calendar range")]
    DateOutOfRange,
}

/// A measure column requested for aggregation does not exist in the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown column: `{0}`")]
pub struct UnknownColumn(pub String);

/// User-facing error carried up to `main`, with the process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<UnknownColumn> for AppError {
    fn from(err: UnknownColumn) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<NoDataError> for AppError {
    fn from(err: NoDataError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        AppError::new(5, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_family() {
        assert_eq!(AppError::from(LoadError::MissingColumn("date")).exit_code(), 2);
        assert_eq!(AppError::from(NoDataError).exit_code(), 3);
        assert_eq!(AppError::from(ForecastError::InsufficientPoints { n: 1 }).exit_code(), 5);
    }

    #[test]
    fn load_error_message_names_the_column() {
        let err = LoadError::MissingColumn("weekly_sales");
        assert_eq!(err.to_string(), "missing required column: `weekly_sales`");
    }
}
