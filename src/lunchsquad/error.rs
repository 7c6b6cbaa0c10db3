use thiserror::Error;

/// A candidate order failed a business rule.
///
/// Carries the name of the offending field as it appears on the wire
/// (`submitter`, `itemNumber`, `boxStyle`, ...).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u32,
        max: u32,
    },

    #[error("{field} is not a number: {input:?}")]
    NotANumber { field: &'static str, input: String },

    #[error("Too many {field}: at most {max} allowed, got {count}")]
    TooMany {
        field: &'static str,
        max: usize,
        count: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("No order at index {index} (list has {len} orders)")]
    OutOfBounds { index: usize, len: usize },

    /// Same as `OutOfBounds`, for the 1-based positions users type.
    #[error("No order #{position} (list has {len} orders)")]
    NoSuchPosition { position: usize, len: usize },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// An import payload did not match the order schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Invalid import format: expected a JSON array of orders")]
    NotAnArray,

    #[error("Record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Import payload is not valid JSON: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("There are no orders to export")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Error, Debug)]
pub enum LunchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, LunchError>;
