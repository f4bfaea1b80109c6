//! Row filtering by comparing two columns.

use super::{Morph, Params, require_column};
use crate::error::TransformationError;
use polars::prelude::*;
use serde::Deserialize;
use std::str::FromStr;

/// Relational operator selected by a `logic` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl Comparison {
    const EXPECTED: &'static str = "e, ne, g, ge, l, le";

    pub fn compare(self, left: Expr, right: Expr) -> Expr {
        match self {
            Self::Equal => left.eq(right),
            Self::NotEqual => left.neq(right),
            Self::Greater => left.gt(right),
            Self::GreaterEqual => left.gt_eq(right),
            Self::Less => left.lt(right),
            Self::LessEqual => left.lt_eq(right),
        }
    }
}

impl FromStr for Comparison {
    type Err = TransformationError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "e" => Ok(Self::Equal),
            "ne" => Ok(Self::NotEqual),
            "g" => Ok(Self::Greater),
            "ge" => Ok(Self::GreaterEqual),
            "l" => Ok(Self::Less),
            "le" => Ok(Self::LessEqual),
            _ => Err(TransformationError::UnknownOperator {
                code: code.to_owned(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Keep rows where `first_column <logic> second_column` holds.
///
/// Rows where either side is missing are dropped.
#[derive(Debug, Clone)]
pub struct FilterRows {
    pub first_column: String,
    pub second_column: String,
    pub logic: Comparison,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FilterRowsParams {
    first_column: String,
    second_column: String,
    logic: String,
}

impl FilterRows {
    pub const NAME: &'static str = "FilterRows";

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        let raw: FilterRowsParams = params.parse(Self::NAME)?;
        Ok(Box::new(Self {
            logic: raw.logic.parse()?,
            first_column: raw.first_column,
            second_column: raw.second_column,
        }))
    }
}

impl Morph for FilterRows {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        require_column(df, &self.first_column)?;
        require_column(df, &self.second_column)?;

        let predicate = self.logic.compare(
            col(self.first_column.as_str()),
            col(self.second_column.as_str()),
        );

        Ok(df.clone().lazy().filter(predicate).collect()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "kind" => ["food", "soap", "food", "toy"],
            "wanted" => ["food", "food", "food", "food"],
            "low" => [Some(1), Some(5), None, Some(3)],
            "high" => [2, 4, 6, 3],
        )
        .unwrap()
    }

    fn filter(first: &str, second: &str, logic: Comparison) -> DataFrame {
        FilterRows {
            first_column: first.to_owned(),
            second_column: second.to_owned(),
            logic,
        }
        .apply(&sample())
        .unwrap()
    }

    #[test]
    fn test_filter_equal_strings() {
        assert_eq!(filter("kind", "wanted", Comparison::Equal).height(), 2);
        assert_eq!(filter("kind", "wanted", Comparison::NotEqual).height(), 2);
    }

    #[test]
    fn test_filter_numeric_drops_missing() {
        assert_eq!(filter("low", "high", Comparison::Less).height(), 1);
        assert_eq!(filter("low", "high", Comparison::LessEqual).height(), 2);
        assert_eq!(filter("low", "high", Comparison::Greater).height(), 1);
        assert_eq!(filter("low", "high", Comparison::GreaterEqual).height(), 2);
    }

    #[test]
    fn test_unknown_comparison_code() {
        assert!(matches!(
            "between".parse::<Comparison>(),
            Err(TransformationError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let morph = FilterRows {
            first_column: "kind".to_owned(),
            second_column: "nope".to_owned(),
            logic: Comparison::Equal,
        };
        assert!(matches!(
            morph.apply(&sample()),
            Err(TransformationError::ColumnNotFound { .. })
        ));
    }
}
