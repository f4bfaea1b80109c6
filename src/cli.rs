use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use datamorph::io::{load_df, save_df};
use datamorph::morph::Datasets;
use datamorph::pipeline::{
    Pipeline, PipelineConfig, Registry, Variable, Variables, load_pipeline_config, pipeline_names,
};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "datamorph",
    version,
    about = "Configuration-driven transformation pipelines for tabular data"
)]
pub struct Cli {
    /// Only log to the console, without writing a rolling log file
    #[arg(long, global = true)]
    pub no_log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a pipeline against a dataset
    Run {
        /// Path to the YAML pipeline configuration
        #[arg(short, long, env = "DATAMORPH_CONFIG")]
        config: PathBuf,

        /// Name of the pipeline to run
        #[arg(short, long)]
        pipeline: String,

        /// Input dataset (CSV, Parquet, JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file. CSV unless the extension is .parquet or .json.
        /// Prints the result when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Runtime variable for `${name}` placeholders (repeatable)
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, Variable)>,

        /// Auxiliary dataset available to MergeDataFrames (repeatable)
        #[arg(long = "dataset", value_name = "NAME=FILE", value_parser = parse_dataset)]
        datasets: Vec<(String, PathBuf)>,
    },
    /// List the pipelines defined in a configuration file
    List {
        /// Path to the YAML pipeline configuration
        #[arg(short, long, env = "DATAMORPH_CONFIG")]
        config: PathBuf,

        /// Also list the transformation names that steps may use
        #[arg(long)]
        transformations: bool,
    },
    /// Print a pipeline's resolved steps and check that each one builds
    Show {
        /// Path to the YAML pipeline configuration
        #[arg(short, long, env = "DATAMORPH_CONFIG")]
        config: PathBuf,

        /// Name of the pipeline to show
        #[arg(short, long)]
        pipeline: String,

        /// Runtime variable for `${name}` placeholders (repeatable)
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, Variable)>,

        /// Auxiliary dataset available to MergeDataFrames (repeatable)
        #[arg(long = "dataset", value_name = "NAME=FILE", value_parser = parse_dataset)]
        datasets: Vec<(String, PathBuf)>,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            config,
            pipeline,
            input,
            output,
            vars,
            datasets,
        } => handle_run(&config, &pipeline, &input, output.as_deref(), vars, &datasets),
        Commands::List {
            config,
            transformations,
        } => handle_list(&config, transformations),
        Commands::Show {
            config,
            pipeline,
            vars,
            datasets,
        } => handle_show(&config, &pipeline, vars, &datasets),
    }
}

fn handle_run(
    config_path: &Path,
    pipeline_name: &str,
    input: &Path,
    output: Option<&Path>,
    vars: Vec<(String, Variable)>,
    datasets: &[(String, PathBuf)],
) -> Result<()> {
    let config = load_config(config_path, pipeline_name, vars)?;
    let datasets = load_datasets(datasets)?;
    let pipeline = Pipeline::build(&config, &Registry::default(), &datasets)
        .with_context(|| format!("Failed to build pipeline '{pipeline_name}'"))?;

    let mut df = load_df(input)
        .with_context(|| format!("Failed to load input: {}", input.display()))?;

    let report = pipeline
        .apply_to(&mut df)
        .with_context(|| format!("Pipeline '{pipeline_name}' failed"))?;

    match output {
        Some(path) => {
            save_df(&mut df, path)
                .with_context(|| format!("Failed to save output: {}", path.display()))?;
            println!("Wrote {} rows to {}", df.height(), path.display());
        }
        None => println!("{df}"),
    }
    println!("{}", report.summary());
    Ok(())
}

fn handle_list(config_path: &Path, transformations: bool) -> Result<()> {
    let source = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let names = pipeline_names(&source).context("Failed to parse pipeline configuration")?;

    if names.is_empty() {
        println!("No pipelines defined in {}", config_path.display());
    }
    for name in names {
        println!("{name}");
    }

    if transformations {
        println!();
        println!("Transformations:");
        for name in Registry::default().names() {
            println!("  {name}");
        }
    }
    Ok(())
}

fn handle_show(
    config_path: &Path,
    pipeline_name: &str,
    vars: Vec<(String, Variable)>,
    datasets: &[(String, PathBuf)],
) -> Result<()> {
    let config = load_config(config_path, pipeline_name, vars)?;
    print!("{}", config.to_yaml()?);

    let datasets = load_datasets(datasets)?;
    let pipeline = Pipeline::build(&config, &Registry::default(), &datasets)
        .with_context(|| format!("Pipeline '{pipeline_name}' is invalid"))?;
    println!("# {} steps OK", pipeline.len());
    Ok(())
}

fn load_config(
    path: &Path,
    pipeline_name: &str,
    vars: Vec<(String, Variable)>,
) -> Result<PipelineConfig> {
    let vars: Variables = vars.into_iter().collect();
    load_pipeline_config(path, pipeline_name, &vars).with_context(|| {
        format!(
            "Failed to load pipeline '{pipeline_name}' from {}",
            path.display()
        )
    })
}

fn load_datasets(entries: &[(String, PathBuf)]) -> Result<Datasets> {
    entries
        .iter()
        .map(|(name, path)| -> Result<(String, DataFrame)> {
            let df = load_df(path)
                .with_context(|| format!("Failed to load dataset '{name}': {}", path.display()))?;
            Ok((name.clone(), df))
        })
        .collect()
}

fn split_pair(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

fn parse_var(raw: &str) -> Result<(String, Variable), String> {
    let (key, value) = split_pair(raw)?;
    Ok((key.to_owned(), Variable::parse_literal(value)))
}

fn parse_dataset(raw: &str) -> Result<(String, PathBuf), String> {
    let (key, value) = split_pair(raw)?;
    Ok((key.to_owned(), PathBuf::from(value)))
}
