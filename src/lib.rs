//! # Datamorph - Configuration-Driven Dataset Pipelines
//!
//! Datamorph applies named sequences of transformations to a tabular dataset.
//! Pipelines are declared in a YAML document, may reference runtime values
//! through `${name}` placeholders, and are resolved step by step against a
//! registry of transformation units ("morphs").
//!
//! ## Quick Start
//!
//! ```no_run
//! use datamorph::pipeline::{Variables, load_pipeline_config, run_pipeline};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let vars = Variables::new().with("column_to_remove", "internal_id");
//! let config = load_pipeline_config(Path::new("pipelines.yaml"), "cleanup", &vars)?;
//!
//! let df = datamorph::io::load_df(Path::new("orders.csv"))?;
//! let df = run_pipeline(df, &config)?;
//! println!("{df}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`pipeline`]: configuration loading, the registry and the executor
//!   - [`pipeline::config`]: YAML selection and placeholder substitution
//!   - [`pipeline::registry`]: name resolution with extension priority
//!   - [`pipeline::executor`]: ordered application of built steps
//! - [`morph`]: the [`morph::Morph`] contract and the built-in catalog
//! - [`error`]: error types
//! - [`io`]: reading and writing datasets by file extension
//! - [`logging`]: tracing setup for the binary
//!
//! ## Configuration Format
//!
//! Each top-level key names a pipeline; its value is an ordered list of
//! single-key mappings from a transformation name to its parameters:
//!
//! ```yaml
//! food_discount:
//!   - FillNA:
//!       column_name: discount_pct
//!       value: 0
//!   - FilterRows:
//!       first_column: item_type
//!       second_column: food_marker
//!       logic: e
//!   - RemoveColumns:
//!       columns_name: [food_marker]
//! ```
//!
//! ## Extending the Catalog
//!
//! Register your own morphs on a [`pipeline::Registry`]. An extension
//! registered under a built-in name replaces the built-in for that registry.

pub mod error;
pub mod io;
pub mod logging;
pub mod morph;
pub mod pipeline;
