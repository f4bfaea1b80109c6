//! Column management: create, remove, rename.

use super::{Morph, OneOrMany, Params, Scalar, column_names, require_column};
use crate::error::TransformationError;
use polars::prelude::*;
use serde::Deserialize;

/// Add a column holding a constant value, replacing any column of that name.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateColumn {
    pub column_name: String,
    pub value: Scalar,
}

impl CreateColumn {
    pub const NAME: &'static str = "CreateColumn";

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        Ok(Box::new(params.parse::<Self>(Self::NAME)?))
    }
}

impl Morph for CreateColumn {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        let mut out = df.clone();
        out.with_column(self.value.to_column(&self.column_name, df.height()))?;
        Ok(out)
    }
}

/// Drop a set of columns.
///
/// Absent columns are skipped unless `strict` is set, so applying the same
/// removal twice is a no-op the second time.
#[derive(Debug, Clone)]
pub struct RemoveColumns {
    pub columns: Vec<String>,
    pub strict: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RemoveColumnsParams {
    columns_name: OneOrMany,
    #[serde(default)]
    strict: bool,
}

impl RemoveColumns {
    pub const NAME: &'static str = "RemoveColumns";

    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            strict: false,
        }
    }

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        let raw: RemoveColumnsParams = params.parse(Self::NAME)?;
        Ok(Box::new(Self {
            columns: raw.columns_name.into_vec(),
            strict: raw.strict,
        }))
    }
}

impl Morph for RemoveColumns {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        for column in &self.columns {
            if let Err(err) = require_column(df, column) {
                if self.strict {
                    return Err(err);
                }
                tracing::warn!(column = %column, "RemoveColumns: column already absent");
            }
        }

        let keep: Vec<Expr> = column_names(df)
            .into_iter()
            .filter(|name| !self.columns.contains(name))
            .map(|name| col(name.as_str()))
            .collect();

        // An empty selection would also drop the rows
        if keep.is_empty() {
            return Ok(DataFrame::empty_with_height(df.height()));
        }

        Ok(df.clone().lazy().select(keep).collect()?)
    }
}

/// Rename a single column.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenameColumn {
    pub old_column_name: String,
    pub new_column_name: String,
}

impl RenameColumn {
    pub const NAME: &'static str = "RenameColumn";

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        Ok(Box::new(params.parse::<Self>(Self::NAME)?))
    }
}

impl Morph for RenameColumn {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        require_column(df, &self.old_column_name)?;
        let mut out = df.clone();
        out.rename(&self.old_column_name, self.new_column_name.as_str().into())?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "item" => ["apple", "soap", "bread"],
            "price" => [1.0, 2.5, 3.0],
        )
        .unwrap()
    }

    #[test]
    fn test_create_column_constant() {
        let morph = CreateColumn {
            column_name: "marker".to_owned(),
            value: Scalar::Str("food".to_owned()),
        };
        let out = morph.apply(&sample()).unwrap();

        assert_eq!(out.width(), 3);
        let marker = out.column("marker").unwrap().str().unwrap();
        assert!(marker.into_iter().all(|v| v == Some("food")));
    }

    #[test]
    fn test_create_column_overwrites_existing() {
        let morph = CreateColumn {
            column_name: "price".to_owned(),
            value: Scalar::Int(0),
        };
        let out = morph.apply(&sample()).unwrap();

        assert_eq!(out.width(), 2);
        let price = out.column("price").unwrap().i64().unwrap();
        assert_eq!(price.get(2), Some(0));
    }

    #[test]
    fn test_remove_columns_twice_is_noop() {
        let morph = RemoveColumns::new(vec!["price".to_owned()]);
        let once = morph.apply(&sample()).unwrap();
        let twice = morph.apply(&once).unwrap();

        assert_eq!(column_names(&once), ["item"]);
        assert!(once.equals(&twice));
    }

    #[test]
    fn test_remove_all_columns_keeps_row_count() {
        let morph = RemoveColumns::new(vec!["item".to_owned(), "price".to_owned()]);
        let emptied = morph.apply(&sample()).unwrap();
        assert_eq!(emptied.shape(), (3, 0));

        let out = CreateColumn {
            column_name: "flag".to_owned(),
            value: Scalar::Int(1),
        }
        .apply(&emptied)
        .unwrap();
        assert_eq!(out.shape(), (3, 1));
    }

    #[test]
    fn test_remove_columns_strict_fails_on_absent() {
        let morph = RemoveColumns {
            columns: vec!["price".to_owned(), "missing".to_owned()],
            strict: true,
        };
        let err = morph.apply(&sample()).unwrap_err();
        assert!(matches!(err, TransformationError::ColumnNotFound { ref column } if column == "missing"));
    }

    #[test]
    fn test_remove_columns_accepts_single_name() {
        let mut values = serde_yaml::Mapping::new();
        values.insert("columns_name".into(), "price".into());
        let datasets = super::super::Datasets::new();

        let morph = RemoveColumns::from_params(&Params::new(&values, &datasets)).unwrap();
        let out = morph.apply(&sample()).unwrap();
        assert_eq!(column_names(&out), ["item"]);
    }

    #[test]
    fn test_rename_column() {
        let morph = RenameColumn {
            old_column_name: "item".to_owned(),
            new_column_name: "product".to_owned(),
        };
        let out = morph.apply(&sample()).unwrap();
        assert_eq!(column_names(&out), ["product", "price"]);
    }

    #[test]
    fn test_rename_missing_column_fails() {
        let morph = RenameColumn {
            old_column_name: "sku".to_owned(),
            new_column_name: "id".to_owned(),
        };
        assert!(matches!(
            morph.apply(&sample()),
            Err(TransformationError::ColumnNotFound { .. })
        ));
    }
}
