//! Joining the current dataset with an auxiliary one.

use super::{Morph, OneOrMany, Params, column_names, require_column};
use crate::error::TransformationError;
use polars::prelude::*;
use serde::Deserialize;
use std::str::FromStr;

/// Join type selected by the `how` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinHow {
    Inner,
    Left,
    Right,
    Outer,
}

impl JoinHow {
    const EXPECTED: &'static str = "inner, left, right, outer";

    fn join_type(self) -> JoinType {
        match self {
            Self::Inner => JoinType::Inner,
            Self::Left => JoinType::Left,
            Self::Right => JoinType::Right,
            Self::Outer => JoinType::Full,
        }
    }
}

impl FromStr for JoinHow {
    type Err = TransformationError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "inner" => Ok(Self::Inner),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "outer" | "full" => Ok(Self::Outer),
            _ => Err(TransformationError::UnknownOperator {
                code: code.to_owned(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Join with a named auxiliary dataset on shared key columns.
///
/// Key columns are coalesced. Other columns present on both sides get the
/// left and right suffix respectively.
#[derive(Debug, Clone)]
pub struct MergeDataFrames {
    pub df_to_join: DataFrame,
    pub join_cols: Vec<String>,
    pub how: JoinHow,
    pub suffixes: (String, String),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MergeParams {
    df_to_join: String,
    join_cols: OneOrMany,
    #[serde(default = "default_how")]
    how: String,
    #[serde(default = "default_suffixes")]
    suffixes: Vec<String>,
}

fn default_how() -> String {
    "inner".to_owned()
}

fn default_suffixes() -> Vec<String> {
    vec!["_x".to_owned(), "_y".to_owned()]
}

impl MergeDataFrames {
    pub const NAME: &'static str = "MergeDataFrames";

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        let raw: MergeParams = params.parse(Self::NAME)?;

        let Ok([left, right]) = <[String; 2]>::try_from(raw.suffixes) else {
            return Err(TransformationError::InvalidParameters {
                morph: Self::NAME,
                message: "suffixes must list exactly two strings".to_owned(),
            });
        };

        let join_cols = raw.join_cols.into_vec();
        if join_cols.is_empty() {
            return Err(TransformationError::InvalidParameters {
                morph: Self::NAME,
                message: "join_cols must name at least one column".to_owned(),
            });
        }

        Ok(Box::new(Self {
            df_to_join: params.dataset(&raw.df_to_join)?,
            join_cols,
            how: raw.how.parse()?,
            suffixes: (left, right),
        }))
    }

    fn with_suffixes(
        df: &DataFrame,
        overlap: &[String],
        suffix: &str,
    ) -> Result<DataFrame, TransformationError> {
        let mut out = df.clone();
        for name in overlap {
            out.rename(name, format!("{name}{suffix}").into())?;
        }
        Ok(out)
    }
}

impl Morph for MergeDataFrames {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        for key in &self.join_cols {
            require_column(df, key)?;
            require_column(&self.df_to_join, key)?;
        }

        let right_names = column_names(&self.df_to_join);
        let overlap: Vec<String> = column_names(df)
            .into_iter()
            .filter(|name| !self.join_cols.contains(name) && right_names.contains(name))
            .collect();

        let left = Self::with_suffixes(df, &overlap, &self.suffixes.0)?;
        let right = Self::with_suffixes(&self.df_to_join, &overlap, &self.suffixes.1)?;

        let on: Vec<Expr> = self.join_cols.iter().map(|k| col(k.as_str())).collect();
        let args = JoinArgs::new(self.how.join_type()).with_coalesce(JoinCoalesce::CoalesceColumns);

        Ok(left
            .lazy()
            .join(right.lazy(), on.clone(), on, args)
            .collect()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morph::Datasets;
    use serde_yaml::Mapping;

    fn items() -> DataFrame {
        df!(
            "id" => [1, 2, 3],
            "name" => ["apple", "soap", "bread"],
        )
        .unwrap()
    }

    fn prices() -> DataFrame {
        df!(
            "id" => [1, 3, 4],
            "name" => ["Apple", "Bread", "Milk"],
            "price" => [0.5, 2.0, 1.2],
        )
        .unwrap()
    }

    fn merge(how: JoinHow) -> DataFrame {
        MergeDataFrames {
            df_to_join: prices(),
            join_cols: vec!["id".to_owned()],
            how,
            suffixes: ("_x".to_owned(), "_y".to_owned()),
        }
        .apply(&items())
        .unwrap()
    }

    #[test]
    fn test_join_types_row_counts() {
        assert_eq!(merge(JoinHow::Inner).height(), 2);
        assert_eq!(merge(JoinHow::Left).height(), 3);
        assert_eq!(merge(JoinHow::Right).height(), 3);
        assert_eq!(merge(JoinHow::Outer).height(), 4);
    }

    #[test]
    fn test_overlapping_columns_get_suffixes() {
        let out = merge(JoinHow::Inner);
        let mut names = column_names(&out);
        names.sort();
        assert_eq!(names, ["id", "name_x", "name_y", "price"]);
    }

    #[test]
    fn test_outer_join_coalesces_keys() {
        let out = merge(JoinHow::Outer);
        let ids = out.column("id").unwrap();
        assert_eq!(ids.null_count(), 0);
        assert!(out.column("id_right").is_err());
    }

    #[test]
    fn test_from_params_resolves_dataset() {
        let values: Mapping =
            serde_yaml::from_str("{df_to_join: prices, join_cols: id, how: left}").unwrap();
        let mut datasets = Datasets::new();
        datasets.insert("prices".to_owned(), prices());

        let morph = MergeDataFrames::from_params(&Params::new(&values, &datasets)).unwrap();
        assert_eq!(morph.apply(&items()).unwrap().height(), 3);
    }

    #[test]
    fn test_from_params_unknown_dataset() {
        let values: Mapping = serde_yaml::from_str("{df_to_join: costs, join_cols: [id]}").unwrap();
        let datasets = Datasets::new();

        let err = MergeDataFrames::from_params(&Params::new(&values, &datasets)).unwrap_err();
        assert!(matches!(err, TransformationError::MissingDataset { .. }));
    }

    #[test]
    fn test_from_params_bad_suffixes() {
        let values: Mapping =
            serde_yaml::from_str("{df_to_join: prices, join_cols: id, suffixes: [_a]}").unwrap();
        let mut datasets = Datasets::new();
        datasets.insert("prices".to_owned(), prices());

        let err = MergeDataFrames::from_params(&Params::new(&values, &datasets)).unwrap_err();
        assert!(matches!(err, TransformationError::InvalidParameters { .. }));
    }

    #[test]
    fn test_missing_key_column() {
        let morph = MergeDataFrames {
            df_to_join: prices(),
            join_cols: vec!["sku".to_owned()],
            how: JoinHow::Inner,
            suffixes: ("_x".to_owned(), "_y".to_owned()),
        };
        assert!(matches!(
            morph.apply(&items()),
            Err(TransformationError::ColumnNotFound { .. })
        ));
    }
}
