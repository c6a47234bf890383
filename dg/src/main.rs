//! datagen - sample data generator
//!
//! CLI entry point: collects field definitions, formats the schema, and asks
//! the configured model for sample records.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use datagen::cli::{Cli, Command, FieldArgs};
use datagen::config::Config;
use datagen::fields::load_fields;
use datagen::generator::SampleGenerator;
use datagen::output::{write_sample, write_sample_to_downloads};
use datagen::schema::{Schema, format_fields, format_raw_fields};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("datagen")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("datagen.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Format { fields } => cmd_format(fields),
        Command::Generate {
            count,
            fields,
            save,
            output_dir,
        } => cmd_generate(&config, count, fields, save, output_dir).await,
    }
}

/// Build the schema from whichever field source the user gave
fn collect_schema(args: FieldArgs) -> Result<Schema> {
    match args.file {
        Some(path) => {
            let rows = load_fields(&path)?;
            format_raw_fields(rows).context("Invalid field definitions")
        }
        None => format_fields(args.fields).context("Invalid field definitions"),
    }
}

/// Print the formatted schema
fn cmd_format(fields: FieldArgs) -> Result<()> {
    debug!("cmd_format: called");
    let schema = collect_schema(fields)?;
    println!("{}", schema);
    Ok(())
}

/// Generate samples, print them, and optionally save them
async fn cmd_generate(
    config: &Config,
    count: u32,
    fields: FieldArgs,
    save: bool,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    debug!(count, save, ?output_dir, "cmd_generate: called");
    let schema = collect_schema(fields)?;

    let generator = SampleGenerator::from_env(config.llm.clone());
    let output = generator
        .generate_for(count, &schema)
        .await
        .context("Sample generation failed")?;

    println!("{}", output);

    let saved = match (output_dir, save) {
        (Some(dir), _) => Some(write_sample(&dir, &output)),
        (None, true) => Some(match &config.output.dir {
            Some(dir) => write_sample(dir, &output),
            None => write_sample_to_downloads(&output),
        }),
        (None, false) => None,
    };

    if let Some(result) = saved {
        let path = result.context("Failed to save sample")?;
        eprintln!("{} Saved to {}", "✓".green(), path.display().to_string().cyan());
    }

    Ok(())
}
