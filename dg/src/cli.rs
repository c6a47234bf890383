//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::fields::parse_field_arg;
use crate::schema::FieldDefinition;

/// datagen - sample data from natural-language field descriptions
#[derive(Parser, Debug)]
#[command(
    name = "dg",
    about = "Generate sample records by describing fields in plain language",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate field definitions and print the formatted schema
    Format {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Ask the model for sample records matching the fields
    Generate {
        /// Number of records to generate (1-100)
        #[arg(short = 'n', long, default_value_t = 10)]
        count: u32,

        #[command(flatten)]
        fields: FieldArgs,

        /// Also save the output to the downloads folder (or the configured output dir)
        #[arg(short, long)]
        save: bool,

        /// Save the output into this directory
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
}

/// Where field definitions come from
#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Field definition, repeatable
    #[arg(
        short = 'f',
        long = "field",
        value_name = "NAME=DESCRIPTION",
        value_parser = parse_field_arg
    )]
    pub fields: Vec<FieldDefinition>,

    /// YAML or JSON file with a list of {name, description} rows
    #[arg(short = 'F', long = "fields-file", value_name = "FILE", conflicts_with = "fields")]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "dg",
            "generate",
            "-n",
            "25",
            "-f",
            "name=full names",
            "--field",
            "email=work emails",
            "--save",
        ]);
        match cli.command {
            Command::Generate {
                count, fields, save, ..
            } => {
                assert_eq!(count, 25);
                assert!(save);
                assert_eq!(fields.fields.len(), 2);
                assert_eq!(fields.fields[1], FieldDefinition::new("email", "work emails"));
            }
            other => panic!("Expected Generate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_format_with_file_and_global_flags() {
        let cli = Cli::parse_from(["dg", "format", "-F", "fields.yml", "-l", "debug"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Format { fields } => {
                assert_eq!(fields.file, Some(PathBuf::from("fields.yml")));
                assert!(fields.fields.is_empty());
            }
            other => panic!("Expected Format, got {:?}", other),
        }
    }

    #[test]
    fn test_field_and_file_conflict() {
        let result = Cli::try_parse_from(["dg", "format", "-f", "a=b", "-F", "fields.yml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_field_pair_rejected() {
        let result = Cli::try_parse_from(["dg", "format", "-f", "no-equals-sign"]);
        assert!(result.is_err());
    }
}
