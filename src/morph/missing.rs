//! Missing-value handling.

use super::{Morph, Params, Scalar, require_column};
use crate::error::TransformationError;
use polars::prelude::*;
use serde::Deserialize;

/// Replace missing values in one column with a constant.
///
/// Missing means null, or NaN for float columns, matching [`DropNA`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FillNA {
    pub column_name: String,
    pub value: Scalar,
}

impl FillNA {
    pub const NAME: &'static str = "FillNA";

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        Ok(Box::new(params.parse::<Self>(Self::NAME)?))
    }
}

impl Morph for FillNA {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        require_column(df, &self.column_name)?;

        let name = self.column_name.as_str();
        let mut filled = col(name);
        if df.column(name)?.dtype().is_float() {
            filled = filled.fill_nan(self.value.to_lit());
        }
        let filled = filled.fill_null(self.value.to_lit()).alias(name);

        Ok(df.clone().lazy().with_column(filled).collect()?)
    }
}

/// Drop rows where one column is missing (null, or NaN for float columns).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DropNA {
    pub column_name: String,
}

impl DropNA {
    pub const NAME: &'static str = "DropNA";

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        Ok(Box::new(params.parse::<Self>(Self::NAME)?))
    }
}

impl Morph for DropNA {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        require_column(df, &self.column_name)?;

        let name = self.column_name.as_str();
        let mut keep = col(name).is_not_null();
        if df.column(name)?.dtype().is_float() {
            keep = keep.and(col(name).is_not_nan());
        }

        Ok(df.clone().lazy().filter(keep).collect()?)
    }
}
