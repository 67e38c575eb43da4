//! Error types.
//!
//! - [`DssError`] is the library taxonomy returned by ingestion and analytics.
//! - [`AppError`] is what the `dss` binary reports: a message plus a process
//!   exit code.

use thiserror::Error;

/// Minimum number of history records required by regression and correlation.
pub const MIN_HISTORY: usize = 2;

/// Every failure the ingestion pipeline and the analytics engines can raise.
///
/// All variants are terminal for the call that produced them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DssError {
    #[error("The uploaded spreadsheet is empty.")]
    EmptyInput,

    #[error("Failed to read spreadsheet: {reason}")]
    UnreadableWorkbook { reason: String },

    #[error("Row {row}: no product exists with key '{key}'.")]
    UnknownProduct { row: usize, key: String },

    #[error(
        "Row {row}: unrecognized date '{raw}'. Use yyyy-MM-dd, dd/MM/yyyy, M/d/yyyy, dd-MM-yyyy, yyyy/MM/dd or a serial day number."
    )]
    UnrecognizedDate { row: usize, raw: String },

    #[error("Row {row}: non-numeric value '{raw}'.")]
    NonNumericValue { row: usize, raw: String },

    #[error("Row {row}: `{column}` must not be negative (got {value}).")]
    NegativeValue {
        row: usize,
        column: &'static str,
        value: f64,
    },

    #[error("At least {required} history records are needed (found {actual}).")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("Model fit failed: {cause}")]
    ModelFit { cause: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Product '{key}' not found.")]
    UnknownProductKey { key: String },

    #[error("History store error: {reason}")]
    Store { reason: String },
}

impl DssError {
    pub fn insufficient_history(actual: usize) -> Self {
        DssError::InsufficientHistory {
            required: MIN_HISTORY,
            actual,
        }
    }

    pub fn model_fit(cause: impl Into<String>) -> Self {
        DssError::ModelFit {
            cause: cause.into(),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        DssError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn store(reason: impl Into<String>) -> Self {
        DssError::Store {
            reason: reason.into(),
        }
    }

    /// Process exit code used by the binary.
    ///
    /// - 2: bad input (file contents, arguments, unknown keys)
    /// - 3: not enough data to compute anything
    /// - 4: numerical or storage failure
    pub fn exit_code(&self) -> u8 {
        match self {
            DssError::EmptyInput
            | DssError::UnreadableWorkbook { .. }
            | DssError::UnknownProduct { .. }
            | DssError::UnrecognizedDate { .. }
            | DssError::NonNumericValue { .. }
            | DssError::NegativeValue { .. }
            | DssError::InvalidInput { .. }
            | DssError::UnknownProductKey { .. } => 2,
            DssError::InsufficientHistory { .. } => 3,
            DssError::ModelFit { .. } | DssError::Store { .. } => 4,
        }
    }
}

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

impl From<DssError> for AppError {
    fn from(err: DssError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
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
