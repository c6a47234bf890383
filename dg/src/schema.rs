//! Schema formatting
//!
//! Turns the user's list of `(name, description)` rows into a validated
//! [`Schema`] whose `Display` form is embedded verbatim in the generation prompt.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

/// Errors raised while formatting user field rows into a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("No fields provided")]
    EmptyInput,

    #[error("Invalid field structure in row {}: missing {missing}", .index + 1)]
    MalformedField { index: usize, missing: &'static str },

    #[error("Field name cannot be empty (row {})", .index + 1)]
    EmptyFieldName { index: usize },

    #[error("Cannot define the same field twice: '{name}'")]
    DuplicateField { name: String },

    #[error("Not a valid field mapping: {0}")]
    Unparseable(String),
}

/// A single field as entered by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub description: String,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A field row as read from an external source, before structural checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RawField {
    /// Convert into a typed definition, failing if either attribute is absent
    pub fn into_definition(self, index: usize) -> Result<FieldDefinition, SchemaError> {
        match (self.name, self.description) {
            (Some(name), Some(description)) => Ok(FieldDefinition { name, description }),
            (None, _) => Err(SchemaError::MalformedField { index, missing: "name" }),
            (Some(_), None) => Err(SchemaError::MalformedField {
                index,
                missing: "description",
            }),
        }
    }
}

/// Ordered, duplicate-free mapping of field name to value description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDefinition>,
}

impl Schema {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in user-entry order
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Look up the description for a field name (exact match)
    pub fn description(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.description.as_str())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let name = serde_json::to_string(&field.name).map_err(|_| fmt::Error)?;
            let description = serde_json::to_string(&field.description).map_err(|_| fmt::Error)?;
            write!(f, "{}: {}", name, description)?;
        }
        f.write_str("}")
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    /// Parse the `Display` form back into a schema, re-applying validation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(len = s.len(), "Schema::from_str: called");
        let pairs: OrderedPairs = serde_json::from_str(s).map_err(|e| SchemaError::Unparseable(e.to_string()))?;
        format_fields(pairs.0)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.description)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = OrderedPairs::deserialize(deserializer)?;
        format_fields(pairs.0).map_err(de::Error::custom)
    }
}

/// Map entries in document order, duplicates kept so validation can see them
struct OrderedPairs(Vec<FieldDefinition>);

impl<'de> Deserialize<'de> for OrderedPairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = OrderedPairs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to descriptions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, description)) = access.next_entry::<String, String>()? {
                    fields.push(FieldDefinition { name, description });
                }
                Ok(OrderedPairs(fields))
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}

/// Accepts rows one at a time, enforcing the schema invariants in entry order
#[derive(Debug, Default)]
struct SchemaBuilder {
    seen: HashSet<String>,
    fields: Vec<FieldDefinition>,
}

impl SchemaBuilder {
    fn push(&mut self, index: usize, field: FieldDefinition) -> Result<(), SchemaError> {
        if field.name.trim().is_empty() {
            debug!(%index, "SchemaBuilder::push: blank field name");
            return Err(SchemaError::EmptyFieldName { index });
        }

        // Duplicates compare the untrimmed name, so "age" and "age " are distinct
        if !self.seen.insert(field.name.clone()) {
            debug!(%index, name = %field.name, "SchemaBuilder::push: duplicate field name");
            return Err(SchemaError::DuplicateField { name: field.name });
        }

        self.fields.push(field);
        Ok(())
    }

    fn finish(self) -> Result<Schema, SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::EmptyInput);
        }
        Ok(Schema { fields: self.fields })
    }
}

/// Validate and normalize typed field rows into a [`Schema`]
///
/// Rows are processed in order; the first occurrence of a name is accepted and
/// any later repeat fails with [`SchemaError::DuplicateField`].
pub fn format_fields<I>(fields: I) -> Result<Schema, SchemaError>
where
    I: IntoIterator<Item = FieldDefinition>,
{
    let mut builder = SchemaBuilder::default();
    for (index, field) in fields.into_iter().enumerate() {
        builder.push(index, field)?;
    }
    let schema = builder.finish()?;
    debug!(field_count = schema.len(), "format_fields: schema built");
    Ok(schema)
}

/// Validate loosely-typed rows (e.g. loaded from a file) into a [`Schema`]
///
/// Each row is checked for structure, then for blank and duplicate names,
/// before the next row is looked at.
pub fn format_raw_fields(rows: Vec<RawField>) -> Result<Schema, SchemaError> {
    debug!(row_count = rows.len(), "format_raw_fields: called");
    if rows.is_empty() {
        return Err(SchemaError::EmptyInput);
    }

    let mut builder = SchemaBuilder::default();
    for (index, row) in rows.into_iter().enumerate() {
        let field = row.into_definition(index)?;
        builder.push(index, field)?;
    }
    builder.finish()
}
