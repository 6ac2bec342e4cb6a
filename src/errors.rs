use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed reference row at line {line}: expected at least 5 fields, got {fields}")]
    MalformedReferenceRow { line: u64, fields: usize },

    #[error("invalid {field} in reference row at line {line}: {value:?}")]
    InvalidReferenceNumber {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("reference amount for {id} must be positive, got {amount}")]
    NonPositiveAmount { id: String, amount: f64 },

    #[error("Invalid food: {key}, {indicator}")]
    InvalidFood { key: String, indicator: String },

    #[error("invalid glucose reading: {0:?}")]
    InvalidReading(String),

    #[error("meal {meal} has after-meal readings but no before reading")]
    MissingBeforeReading { meal: String },

    #[error("invalid date key: {0:?}")]
    InvalidDateKey(String),

    #[error("unknown remark tag {tag:?} in meal {meal}")]
    UnknownRemarkTag { meal: String, tag: String },

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Unknown key: {0}")]
    UnknownItemKey(String),

    #[error("unexpected document shape: {0}")]
    Shape(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
