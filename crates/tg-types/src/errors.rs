use thiserror::Error;

/// Main error type for the TuneGrid search-space layer.
///
/// Every failure is a synchronous, local precondition violation; nothing in
/// this layer performs I/O, so no error is retried or recovered internally.
#[derive(Error, Debug)]
pub enum TgError {
    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    #[error("Type mismatch: a search space was passed where a concrete trial value was expected")]
    SpaceAsValue,

    #[error("Unsupported operation: {operation} is not available on {variant}")]
    Unsupported {
        operation: &'static str,
        variant: &'static str,
    },
}

/// Precondition failures raised while building a space.
#[derive(Error, Debug)]
pub enum ConstructionError {
    #[error("Invalid candidate: expected a search space, got concrete value {value}")]
    InvalidCandidate { value: String },

    #[error("Empty candidate set: at least one candidate is required")]
    EmptyCandidateSet,

    #[error("Default index {index} is out of range for {len} candidates")]
    DefaultIndexOutOfRange { index: usize, len: usize },

    #[error("Default value {default} is outside the integer bounds [{lower}, {upper}]")]
    DefaultValueOutOfRange { default: i64, lower: i64, upper: i64 },

    #[error("Invalid integer bounds: lower {lower} is greater than upper {upper}")]
    InvalidIntegerBounds { lower: i64, upper: i64 },
}

/// Result type alias for TuneGrid operations.
pub type TgResult<T> = Result<T, TgError>;
