//! Configuration-driven transformation pipelines.
//!
//! A pipeline run has three stages:
//!
//! 1. [`get_pipeline_config`] selects a named pipeline from a YAML document and
//!    resolves its `${name}` placeholders against runtime [`Variables`].
//! 2. [`Pipeline::build`] resolves each step name through a [`Registry`] and
//!    constructs a typed morph from the step's parameters.
//! 3. [`Pipeline::apply_to`] applies the morphs in order, each one's output
//!    feeding the next.
//!
//! [`run_pipeline`] does stages 2 and 3 with the built-in catalog.
//!
//! # Example
//!
//! ```no_run
//! use datamorph::pipeline::{Variables, get_pipeline_config, run_pipeline};
//! use polars::prelude::*;
//!
//! let source = std::fs::read_to_string("pipelines.yaml")?;
//! let vars = Variables::new().with("threshold", 10);
//! let config = get_pipeline_config(&source, "clean_orders", &vars)?;
//!
//! let df = df!("qty" => [5, 12, 30])?;
//! let df = run_pipeline(df, &config)?;
//! println!("{df}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod executor;
pub mod registry;
pub mod variables;

pub use config::{
    PipelineConfig, StepConfig, get_pipeline_config, load_pipeline_config, pipeline_names,
};
pub use executor::{Pipeline, RunReport, run_pipeline, run_pipeline_with};
pub use registry::{Extension, Registry, Source};
pub use variables::{Variable, Variables};
