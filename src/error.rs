//! Error types for pipeline loading and execution.
//!
//! Two layers, matching the two places things go wrong:
//!
//! - [`MorphError`] covers the pipeline as a whole: a bad pipeline name, an
//!   unresolved placeholder, an unknown transformation, or a failing step.
//! - [`TransformationError`] is raised by an individual morph while it is
//!   being constructed from its parameters or applied to a dataset. The
//!   executor wraps it in [`MorphError::Step`] together with the step's
//!   position and name.
//!
//! ```
//! use datamorph::error::{MorphError, TransformationError};
//!
//! fn describe(err: &MorphError) -> String {
//!     match err {
//!         MorphError::ConfigNotFound(name) => format!("no pipeline called {name}"),
//!         MorphError::Step {
//!             source: TransformationError::ColumnNotFound { column },
//!             ..
//!         } => format!("missing column {column}"),
//!         other => other.to_string(),
//!     }
//! }
//! # let _ = describe;
//! ```

use polars::error::PolarsError;
use thiserror::Error;

/// Errors raised while loading or running a pipeline.
#[derive(Debug, Error)]
pub enum MorphError {
    /// The requested pipeline is not defined in the configuration document.
    #[error("pipeline '{0}' not found in configuration")]
    ConfigNotFound(String),

    /// A `${name}` placeholder has no runtime value.
    #[error("no runtime value supplied for placeholder '${{{0}}}'")]
    MissingVariable(String),

    /// Neither the extension entries nor the built-in catalog define the name.
    #[error("unknown transformation '{0}'")]
    UnknownTransformation(String),

    /// The configuration document does not have the expected shape.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A step failed while being built or applied.
    #[error("step {step} ({name}): {source}")]
    Step {
        /// 1-based position of the step in the pipeline.
        step: usize,
        /// Transformation name as written in the configuration.
        name: String,
        #[source]
        source: TransformationError,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MorphError {
    /// The underlying morph error, if this error came from a step.
    pub fn transformation(&self) -> Option<&TransformationError> {
        match self {
            Self::Step { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors raised by a single morph.
#[derive(Debug, Error)]
pub enum TransformationError {
    /// A referenced column does not exist in the dataset.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// An operator or logic code is not recognised.
    #[error("unknown operator '{code}' (expected one of: {expected})")]
    UnknownOperator {
        code: String,
        expected: &'static str,
    },

    /// The parameter mapping does not fit the morph's parameter contract.
    #[error("invalid parameters for {morph}: {message}")]
    InvalidParameters {
        morph: &'static str,
        message: String,
    },

    /// The column's type does not support the operation.
    #[error("column '{column}' has type {dtype}, expected {expected}")]
    InvalidColumnType {
        column: String,
        dtype: String,
        expected: &'static str,
    },

    /// Z-score normalisation of a column without spread.
    #[error("column '{column}' has zero or undefined standard deviation")]
    ZeroVariance { column: String },

    /// A morph refers to an auxiliary dataset that was not supplied.
    #[error("dataset '{name}' was not supplied to the pipeline")]
    MissingDataset { name: String },

    #[error("data processing error: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, MorphError>;
