//! Pipeline execution engine.
//!
//! Builds every step of a [`PipelineConfig`] through a [`Registry`], then
//! applies the resulting morphs to a dataset in order and reports what changed.

use super::config::PipelineConfig;
use super::registry::Registry;
use crate::error::{MorphError, Result};
use crate::morph::{Datasets, Morph, Params};
use polars::prelude::DataFrame;
use std::time::{Duration, Instant};

/// Report generated after pipeline execution
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Number of rows before processing
    pub rows_before: usize,

    /// Number of columns before processing
    pub columns_before: usize,

    /// Number of rows after processing
    pub rows_after: usize,

    /// Number of columns after processing
    pub columns_after: usize,

    /// Number of steps successfully applied
    pub steps_applied: usize,

    /// Time taken for execution
    pub duration: Duration,
}

impl RunReport {
    /// Create a summary message
    pub fn summary(&self) -> String {
        format!(
            "Pipeline completed: rows {} ({} → {}), columns {} ({} → {}), {} steps, {:.2}s",
            change(self.rows_before, self.rows_after),
            self.rows_before,
            self.rows_after,
            change(self.columns_before, self.columns_after),
            self.columns_before,
            self.columns_after,
            self.steps_applied,
            self.duration.as_secs_f64()
        )
    }
}

fn change(before: usize, after: usize) -> &'static str {
    match after.cmp(&before) {
        std::cmp::Ordering::Greater => "added",
        std::cmp::Ordering::Less => "removed",
        std::cmp::Ordering::Equal => "unchanged",
    }
}

/// A step whose morph has been constructed.
#[derive(Debug)]
struct BuiltStep {
    name: String,
    morph: Box<dyn Morph>,
}

/// A pipeline whose steps have all been resolved and constructed.
#[derive(Debug)]
pub struct Pipeline {
    name: String,
    steps: Vec<BuiltStep>,
}

impl Pipeline {
    /// Resolve and construct every step of `config`.
    ///
    /// Nothing is applied yet, so a bad name or malformed parameters fail
    /// before any data is touched.
    ///
    /// # Errors
    ///
    /// - [`MorphError::UnknownTransformation`] for a name `registry` cannot resolve
    /// - [`MorphError::Step`] if a morph rejects its parameters
    pub fn build(config: &PipelineConfig, registry: &Registry, datasets: &Datasets) -> Result<Self> {
        let steps = config
            .steps
            .iter()
            .enumerate()
            .map(|(idx, step)| {
                let factory = registry.resolve(&step.name)?;
                let morph = factory(&Params::new(&step.params, datasets)).map_err(|source| {
                    MorphError::Step {
                        step: idx + 1,
                        name: step.name.clone(),
                        source,
                    }
                })?;
                Ok(BuiltStep {
                    name: step.name.clone(),
                    morph,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: config.name.clone(),
            steps,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step to `df` in order.
    ///
    /// Stops at the first failing step. No rollback happens: `df` is left
    /// holding the output of the last step that succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::Step`] identifying the failing step.
    pub fn apply_to(&self, df: &mut DataFrame) -> Result<RunReport> {
        let start = Instant::now();
        let (rows_before, columns_before) = df.shape();

        tracing::info!(
            pipeline = %self.name,
            steps = self.steps.len(),
            rows = rows_before,
            columns = columns_before,
            "Running pipeline"
        );

        for (idx, step) in self.steps.iter().enumerate() {
            let next = step.morph.apply(df).map_err(|source| {
                tracing::error!(
                    pipeline = %self.name,
                    step = idx + 1,
                    name = %step.name,
                    error = %source,
                    "Pipeline step failed"
                );
                MorphError::Step {
                    step: idx + 1,
                    name: step.name.clone(),
                    source,
                }
            })?;

            tracing::debug!(
                step = idx + 1,
                name = %step.name,
                rows = next.height(),
                columns = next.width(),
                "Applied step"
            );
            *df = next;
        }

        let (rows_after, columns_after) = df.shape();
        let report = RunReport {
            rows_before,
            columns_before,
            rows_after,
            columns_after,
            steps_applied: self.steps.len(),
            duration: start.elapsed(),
        };

        tracing::info!(pipeline = %self.name, "{}", report.summary());
        Ok(report)
    }

    /// Apply every step, consuming and returning the dataset.
    ///
    /// # Errors
    ///
    /// Same as [`Pipeline::apply_to`].
    pub fn run(&self, mut df: DataFrame) -> Result<DataFrame> {
        self.apply_to(&mut df)?;
        Ok(df)
    }
}

/// Run `config` against `df` with the built-in catalog.
///
/// # Errors
///
/// See [`Pipeline::build`] and [`Pipeline::apply_to`].
pub fn run_pipeline(df: DataFrame, config: &PipelineConfig) -> Result<DataFrame> {
    run_pipeline_with(df, config, &Registry::default(), &Datasets::new())
}

/// Run `config` against `df` with an explicit registry and auxiliary datasets.
///
/// # Errors
///
/// See [`Pipeline::build`] and [`Pipeline::apply_to`].
pub fn run_pipeline_with(
    df: DataFrame,
    config: &PipelineConfig,
    registry: &Registry,
    datasets: &Datasets,
) -> Result<DataFrame> {
    Pipeline::build(config, registry, datasets)?.run(df)
}
