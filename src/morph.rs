//! Transformation units ("morphs") and their shared building blocks.
//!
//! Every morph is a small struct holding typed parameters. It is built from
//! the parameter mapping of one configuration step by a [`MorphFactory`] and
//! applied once to the current dataset.
//!
//! # Built-in catalog
//!
//! - **Columns**: `CreateColumn` (alias `AddColumn`), `RemoveColumns`, `RenameColumn`
//! - **Arithmetic**: `ColumnsOperator`, `MathOperator`
//! - **Missing values**: `FillNA`, `DropNA`
//! - **Rows**: `FilterRows`
//! - **Statistics**: `NormalizeColumn`
//! - **Joins**: `MergeDataFrames`
//! - **Persistence**: `SaveDataFrame`, `DeleteDataFrame`

pub mod arithmetic;
pub mod columns;
pub mod filter;
pub mod merge;
pub mod missing;
pub mod normalize;
pub mod persist;

pub use arithmetic::{Arithmetic, ColumnsOperator, MathOperator};
pub use columns::{CreateColumn, RemoveColumns, RenameColumn};
pub use filter::{Comparison, FilterRows};
pub use merge::{JoinHow, MergeDataFrames};
pub use missing::{DropNA, FillNA};
pub use normalize::NormalizeColumn;
pub use persist::{DeleteDataFrame, SaveDataFrame};

use crate::error::TransformationError;
use polars::prelude::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fmt;

/// Auxiliary datasets a pipeline can refer to by name.
pub type Datasets = HashMap<String, DataFrame>;

/// A single configured dataset transformation.
pub trait Morph: fmt::Debug + Send + Sync {
    /// Transformation name as registered in the catalog.
    fn name(&self) -> &'static str;

    /// Apply the transformation, returning the next dataset.
    ///
    /// The input frame is left untouched; Polars shares column buffers, so
    /// returning a derived frame does not copy unchanged columns.
    ///
    /// # Errors
    ///
    /// Returns a [`TransformationError`] if a referenced column is missing or
    /// the underlying operation fails.
    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError>;
}

/// Constructor registered under a transformation name.
pub type MorphFactory = fn(&Params<'_>) -> Result<Box<dyn Morph>, TransformationError>;

/// The parameters of one step, as seen by a [`MorphFactory`].
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    values: &'a Mapping,
    datasets: &'a Datasets,
}

impl<'a> Params<'a> {
    pub fn new(values: &'a Mapping, datasets: &'a Datasets) -> Self {
        Self { values, datasets }
    }

    pub fn values(&self) -> &'a Mapping {
        self.values
    }

    /// Deserialize the mapping into a morph's typed parameter struct.
    ///
    /// # Errors
    ///
    /// Returns [`TransformationError::InvalidParameters`] naming `morph` when
    /// a field is missing, unknown, or of the wrong type.
    pub fn parse<T: DeserializeOwned>(&self, morph: &'static str) -> Result<T, TransformationError> {
        serde_yaml::from_value(Value::Mapping(self.values.clone())).map_err(|e| {
            TransformationError::InvalidParameters {
                morph,
                message: e.to_string(),
            }
        })
    }

    /// Look up an auxiliary dataset by name.
    ///
    /// # Errors
    ///
    /// Returns [`TransformationError::MissingDataset`] if it was not supplied.
    pub fn dataset(&self, name: &str) -> Result<DataFrame, TransformationError> {
        self.datasets
            .get(name)
            .cloned()
            .ok_or_else(|| TransformationError::MissingDataset {
                name: name.to_owned(),
            })
    }
}

/// A constant parameter value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Literal expression for use in lazy queries.
    pub fn to_lit(&self) -> Expr {
        match self {
            Self::Bool(b) => lit(*b),
            Self::Int(i) => lit(*i),
            Self::Float(f) => lit(*f),
            Self::Str(s) => lit(s.clone()),
        }
    }

    /// A column of `height` copies of this value.
    pub fn to_column(&self, name: &str, height: usize) -> Column {
        match self {
            Self::Bool(b) => Column::new(name.into(), vec![*b; height]),
            Self::Int(i) => Column::new(name.into(), vec![*i; height]),
            Self::Float(f) => Column::new(name.into(), vec![*f; height]),
            Self::Str(s) => Column::new(name.into(), vec![s.as_str(); height]),
        }
    }
}

/// A parameter that accepts either a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

/// Fail with [`TransformationError::ColumnNotFound`] unless `df` has `name`.
pub fn require_column(df: &DataFrame, name: &str) -> Result<(), TransformationError> {
    if df.get_column_index(name).is_some() {
        Ok(())
    } else {
        Err(TransformationError::ColumnNotFound {
            column: name.to_owned(),
        })
    }
}

/// Owned column names of `df`, in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.as_str().to_owned())
        .collect()
}
