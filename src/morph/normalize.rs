//! Z-score normalisation.

use super::{Morph, Params, require_column};
use crate::error::TransformationError;
use polars::prelude::*;
use serde::Deserialize;

/// `output_column = (column - mean) / std`.
///
/// Statistics are taken over the non-missing values of the whole column
/// (nulls, and NaN for float columns); missing inputs stay missing in the
/// output. `ddof` is the delta degrees of
/// freedom of the standard deviation (1 gives the sample estimate, 0 the
/// population one).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizeColumn {
    pub column_name: String,
    pub output_column: String,
    #[serde(default = "default_ddof")]
    pub ddof: u8,
}

fn default_ddof() -> u8 {
    1
}

impl NormalizeColumn {
    pub const NAME: &'static str = "NormalizeColumn";

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        Ok(Box::new(params.parse::<Self>(Self::NAME)?))
    }
}

impl Morph for NormalizeColumn {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        require_column(df, &self.column_name)?;

        let series = df.column(&self.column_name)?.as_materialized_series();
        if !series.dtype().is_numeric() {
            return Err(TransformationError::InvalidColumnType {
                column: self.column_name.clone(),
                dtype: series.dtype().to_string(),
                expected: "a numeric column",
            });
        }

        // Statistics skip NaN the same way they skip nulls
        let observed = if series.dtype().is_float() {
            series.filter(&series.is_not_nan()?)?
        } else {
            series.clone()
        };

        let (Some(mean), Some(std)) = (observed.mean(), observed.std(self.ddof)) else {
            return Err(TransformationError::ZeroVariance {
                column: self.column_name.clone(),
            });
        };
        if std == 0.0 || !std.is_finite() {
            return Err(TransformationError::ZeroVariance {
                column: self.column_name.clone(),
            });
        }

        let zscore = ((col(self.column_name.as_str()).cast(DataType::Float64) - lit(mean))
            / lit(std))
        .alias(self.output_column.as_str());

        Ok(df.clone().lazy().with_column(zscore).collect()?)
    }
}
