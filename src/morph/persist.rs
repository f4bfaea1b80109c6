//! Saving and deleting intermediate snapshots.
//!
//! Snapshots are Parquet files at `{file_name}.parquet`. Both morphs pass the
//! dataset through unchanged.

use super::{Morph, Params};
use crate::error::TransformationError;
use polars::prelude::*;
use serde::Deserialize;
use std::path::PathBuf;

fn snapshot_path(file_name: &str) -> PathBuf {
    PathBuf::from(format!("{file_name}.parquet"))
}

/// Write the current dataset to `{file_name}.parquet`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveDataFrame {
    pub file_name: String,
}

impl SaveDataFrame {
    pub const NAME: &'static str = "SaveDataFrame";

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        Ok(Box::new(params.parse::<Self>(Self::NAME)?))
    }
}

impl Morph for SaveDataFrame {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        let path = snapshot_path(&self.file_name);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut out = df.clone();
        let file = std::fs::File::create(&path)?;
        ParquetWriter::new(file).finish(&mut out)?;

        tracing::info!(path = %path.display(), rows = out.height(), "Saved snapshot");
        Ok(out)
    }
}

/// Remove `{file_name}.parquet` if it exists.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteDataFrame {
    pub file_name: String,
}

impl DeleteDataFrame {
    pub const NAME: &'static str = "DeleteDataFrame";

    pub fn from_params(params: &Params<'_>) -> Result<Box<dyn Morph>, TransformationError> {
        Ok(Box::new(params.parse::<Self>(Self::NAME)?))
    }
}

impl Morph for DeleteDataFrame {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame, TransformationError> {
        let path = snapshot_path(&self.file_name);
        if path.is_file() {
            std::fs::remove_file(&path)?;
            tracing::info!(path = %path.display(), "Deleted snapshot");
        }
        Ok(df.clone())
    }
}
