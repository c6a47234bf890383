//! Field row input
//!
//! Reads field definitions from `NAME=DESCRIPTION` command-line pairs or from a
//! YAML/JSON file holding a list of `{name, description}` rows.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::schema::{FieldDefinition, RawField};

/// Errors reading field rows
#[derive(Debug, Error)]
pub enum FieldsError {
    #[error("Expected NAME=DESCRIPTION, got '{0}'")]
    InvalidPair(String),

    #[error("Failed to read fields file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse fields file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Parse a `NAME=DESCRIPTION` pair, splitting on the first `=`
///
/// The name is kept exactly as typed; blank names are rejected later by the
/// schema formatter.
pub fn parse_field_arg(arg: &str) -> Result<FieldDefinition, FieldsError> {
    let (name, description) = arg
        .split_once('=')
        .ok_or_else(|| FieldsError::InvalidPair(arg.to_string()))?;
    Ok(FieldDefinition::new(name, description))
}

/// Load raw field rows from a YAML or JSON file
///
/// Rows missing `name` or `description` are returned as-is so the formatter
/// can report which row is malformed.
pub fn load_fields(path: &Path) -> Result<Vec<RawField>, FieldsError> {
    debug!(?path, "load_fields: called");
    let content = fs::read_to_string(path).map_err(|source| FieldsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<RawField> = serde_yaml::from_str(&content).map_err(|source| FieldsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded {} field rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_arg() {
        let field = parse_field_arg("name=realistic full names").unwrap();
        assert_eq!(field, FieldDefinition::new("name", "realistic full names"));
    }

    #[test]
    fn test_parse_field_arg_splits_on_first_equals() {
        let field = parse_field_arg("formula=a=b+c").unwrap();
        assert_eq!(field.name, "formula");
        assert_eq!(field.description, "a=b+c");
    }

    #[test]
    fn test_parse_field_arg_keeps_whitespace() {
        let field = parse_field_arg("age = years").unwrap();
        assert_eq!(field.name, "age ");
        assert_eq!(field.description, " years");
    }

    #[test]
    fn test_parse_field_arg_without_equals() {
        let err = parse_field_arg("name").unwrap_err();
        assert!(matches!(err, FieldsError::InvalidPair(ref s) if s == "name"));
    }
}
