//! Column arithmetic.

use super::{Morph, Params, require_column};
use crate::error::TransformationError;
use polars::prelude::*;
use serde::Deserialize;
use std::str::FromStr;

/// Arithmetic operator selected by a `logic` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    Add,
    Sub,
    Mul,
    Div,
}

impl Arithmetic {
    const EXPECTED: &'static str = "sum, add, sub, mul, div";

    /// Combine two expressions. Division is true division.
    pub fn combine(self, left: Expr, right: Expr) -> Expr {
        match self {
            Self::Add => left + right,
            Self::Sub => left - right,
            Self::Mul => left * right,
            Self::Div => left.cast(DataType::Float64) / right.cast(DataType::Float64),
        }
    }
}

impl FromStr for Arithmetic {
    type Err = TransformationError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "sum" | "add" => Ok(Self::Add),
            "sub" => Ok(Self::Sub),
            "mul" => Ok(Self::Mul),
            "div" => Ok(Self::Div),
            _ => Err(TransformationError::UnknownOperator {
                code: code.to_owned(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// `output_column = first_column <logic> second_column`.
#[derive(Debug, Clone)]
pub struct ColumnsOperator {
    pub first_column: String,
    pub second_column: String,
    pub logic: Arithmetic,
    pub output_column: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ColumnsOperatorParams {
    first_column: String,
    second_column: String,
    logic: String,
    output_column: String,
}

impl ColumnsOperator {
    pub const NAME: &'static str = "ColumnsOperator";

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        let raw: ColumnsOperatorParams = params.parse(Self::NAME)?;
        Ok(Box::new(Self {
            logic: raw.logic.parse()?,
            first_column: raw.first_column,
            second_column: raw.second_column,
            output_column: raw.output_column,
        }))
    }
}

impl Morph for ColumnsOperator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        require_column(df, &self.first_column)?;
        require_column(df, &self.second_column)?;

        let expr = self
            .logic
            .combine(col(self.first_column.as_str()), col(self.second_column.as_str()))
            .alias(self.output_column.as_str());

        Ok(df.clone().lazy().with_column(expr).collect()?)
    }
}

/// `output_column = column_name <logic> value`.
#[derive(Debug, Clone)]
pub struct MathOperator {
    pub column_name: String,
    pub logic: Arithmetic,
    pub value: f64,
    pub output_column: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MathOperatorParams {
    column_name: String,
    logic: String,
    value: f64,
    output_column: String,
}

impl MathOperator {
    pub const NAME: &'static str = "MathOperator";

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        let raw: MathOperatorParams = params.parse(Self::NAME)?;
        Ok(Box::new(Self {
            logic: raw.logic.parse()?,
            column_name: raw.column_name,
            value: raw.value,
            output_column: raw.output_column,
        }))
    }
}

impl Morph for MathOperator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        require_column(df, &self.column_name)?;

        let expr = self
            .logic
            .combine(col(self.column_name.as_str()), lit(self.value))
            .alias(self.output_column.as_str());

        Ok(df.clone().lazy().with_column(expr).collect()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morph::Datasets;
    use serde_yaml::Mapping;

    fn sample() -> DataFrame {
        df!(
            "price" => [10.0, 20.0, 40.0],
            "qty" => [Some(2.0), None, Some(4.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_columns_operator_mul_propagates_missing() {
        let morph = ColumnsOperator {
            first_column: "price".to_owned(),
            second_column: "qty".to_owned(),
            logic: Arithmetic::Mul,
            output_column: "total".to_owned(),
        };
        let out = morph.apply(&sample()).unwrap();
        let total = out.column("total").unwrap().f64().unwrap();

        assert_eq!(total.get(0), Some(20.0));
        assert_eq!(total.get(1), None);
        assert_eq!(total.get(2), Some(160.0));
    }

    #[test]
    fn test_columns_operator_overwrites_input() {
        let morph = ColumnsOperator {
            first_column: "price".to_owned(),
            second_column: "price".to_owned(),
            logic: Arithmetic::Add,
            output_column: "price".to_owned(),
        };
        let out = morph.apply(&sample()).unwrap();
        assert_eq!(out.width(), 2);
        assert_eq!(out.column("price").unwrap().f64().unwrap().get(0), Some(20.0));
    }

    #[test]
    fn test_columns_operator_missing_column() {
        let morph = ColumnsOperator {
            first_column: "price".to_owned(),
            second_column: "tax".to_owned(),
            logic: Arithmetic::Sub,
            output_column: "net".to_owned(),
        };
        assert!(matches!(
            morph.apply(&sample()),
            Err(TransformationError::ColumnNotFound { ref column }) if column == "tax"
        ));
    }

    #[test]
    fn test_math_operator_div() {
        let morph = MathOperator {
            column_name: "price".to_owned(),
            logic: Arithmetic::Div,
            value: 4.0,
            output_column: "quarter".to_owned(),
        };
        let out = morph.apply(&sample()).unwrap();
        let quarter = out.column("quarter").unwrap().f64().unwrap();
        assert_eq!(quarter.get(2), Some(10.0));
    }

    #[test]
    fn test_unknown_logic_code() {
        let values: Mapping = serde_yaml::from_str(
            "{first_column: a, second_column: b, logic: pow, output_column: c}",
        )
        .unwrap();
        let datasets = Datasets::new();

        let err = ColumnsOperator::from_params(&Params::new(&values, &datasets)).unwrap_err();
        assert!(matches!(err, TransformationError::UnknownOperator { ref code, .. } if code == "pow"));
    }

    #[test]
    fn test_sum_is_an_alias_for_add() {
        assert_eq!("sum".parse::<Arithmetic>().unwrap(), Arithmetic::Add);
        assert_eq!("add".parse::<Arithmetic>().unwrap(), Arithmetic::Add);
    }
}
