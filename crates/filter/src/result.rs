//! The result description: which source columns (and, optionally, the
//! matching row's index) end up in a scan's output table, and under what
//! name.
//!
//! On the wire, a row-index entry is written as a column entry with an
//! empty `name` and a required `as`. Internally that convention is
//! resolved once, at deserialization, into a distinct [`ResultEntry::RowIndex`]
//! variant — the rest of this crate never has to special-case an empty
//! string.

use serde::{Deserialize, Serialize};

use tablerace_core::{ColumnDescriptor, ColumnType, Header};

use crate::error::SchemaError;

/// One entry in a [`ResultDescription`]: either copy a named source
/// column through (optionally renamed), or emit the matching row's index
/// under a given name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireResultEntry", try_from = "WireResultEntry")]
pub enum ResultEntry {
    Column { name: String, rename: Option<String> },
    RowIndex { as_name: String },
}

impl ResultEntry {
    pub fn column(name: impl Into<String>) -> Self {
        ResultEntry::Column { name: name.into(), rename: None }
    }

    pub fn column_as(name: impl Into<String>, rename: impl Into<String>) -> Self {
        ResultEntry::Column { name: name.into(), rename: Some(rename.into()) }
    }

    pub fn row_index(as_name: impl Into<String>) -> Self {
        ResultEntry::RowIndex { as_name: as_name.into() }
    }

    /// The name this entry's column will have in the result table.
    pub fn output_name(&self) -> &str {
        match self {
            ResultEntry::Column { name, rename } => rename.as_deref().unwrap_or(name),
            ResultEntry::RowIndex { as_name } => as_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireResultEntry {
    name: String,
    #[serde(rename = "as", default, skip_serializing_if = "Option::is_none")]
    as_name: Option<String>,
}

impl From<ResultEntry> for WireResultEntry {
    fn from(entry: ResultEntry) -> Self {
        match entry {
            ResultEntry::Column { name, rename } => WireResultEntry { name, as_name: rename },
            ResultEntry::RowIndex { as_name } => WireResultEntry { name: String::new(), as_name: Some(as_name) },
        }
    }
}

impl TryFrom<WireResultEntry> for ResultEntry {
    type Error = SchemaError;

    fn try_from(wire: WireResultEntry) -> Result<Self, Self::Error> {
        if wire.name.is_empty() {
            let as_name = wire.as_name.ok_or(SchemaError::MissingRowIndexName)?;
            Ok(ResultEntry::RowIndex { as_name })
        } else {
            Ok(ResultEntry::Column { name: wire.name, rename: wire.as_name })
        }
    }
}

/// The ordered list of entries a scan's result table is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultDescription {
    pub entries: Vec<ResultEntry>,
}

impl ResultDescription {
    pub fn new(entries: Vec<ResultEntry>) -> Self {
        Self { entries }
    }

    /// Resolves this description against a source table's header into the
    /// column list a result table should be created with, preserving
    /// entry order.
    pub fn resolve_columns(&self, source_header: &Header) -> Result<Vec<ColumnDescriptor>, SchemaError> {
        let mut seen = std::collections::HashSet::new();
        let mut columns = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let output_name = entry.output_name().to_owned();
            if !seen.insert(output_name.clone()) {
                return Err(SchemaError::DuplicateResultColumn { name: output_name });
            }
            let column_type = match entry {
                ResultEntry::Column { name, .. } => {
                    source_header
                        .column_by_name(name)
                        .ok_or_else(|| SchemaError::UnknownColumn { name: name.clone() })?
                        .column_type
                }
                ResultEntry::RowIndex { .. } => ColumnType::Uint32,
            };
            columns.push(ColumnDescriptor::new(output_name, column_type));
        }
        Ok(columns)
    }
}
