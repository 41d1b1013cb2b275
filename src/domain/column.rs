//! Column inference for schema-less record lists.
//!
//! Columns come from the key set of the first record only. Keys that appear
//! only in later records never get a column.

use serde::Serialize;

use crate::domain::record::Record;
use crate::domain::types::{IdentifierField, RecordId};

/// What a column renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Select,
    Edit,
    View,
    Delete,
    Field,
}

/// One displayed column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub kind: ColumnKind,
    pub key: String,
    pub label: String,
}

impl ColumnSpec {
    fn action(kind: ColumnKind, key: &str, label: &str) -> Self {
        Self {
            kind,
            key: key.to_string(),
            label: label.to_string(),
        }
    }

    fn field(key: &str) -> Self {
        Self {
            kind: ColumnKind::Field,
            key: key.to_string(),
            label: display_label(key),
        }
    }

    /// Materializes the cell of this column for `record`.
    pub fn cell<A: RowActions>(&self, record: &Record, actions: &A) -> Cell<A::Output> {
        match self.kind {
            ColumnKind::Select => Cell::Select(record.id().clone()),
            ColumnKind::Edit => Cell::Action(actions.edit(record)),
            ColumnKind::View => Cell::Action(actions.view(record)),
            ColumnKind::Delete => Cell::Action(actions.delete(record)),
            ColumnKind::Field => Cell::Value(record.display(&self.key)),
        }
    }
}

/// Handlers wired to the edit, view and delete columns.
///
/// Every handler receives the full record of its row.
pub trait RowActions {
    type Output;

    fn edit(&self, record: &Record) -> Self::Output;
    fn view(&self, record: &Record) -> Self::Output;
    fn delete(&self, record: &Record) -> Self::Output;
}

/// A rendered table cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell<T> {
    Select(RecordId),
    Action(T),
    Value(String),
}

/// Key with its first character upper-cased.
pub fn display_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derives the table columns for `records`.
///
/// Returns no columns for an empty list. Otherwise the select, edit, view
/// and delete columns come first, followed by one column per key of the
/// first record except the identifier.
pub fn infer_columns(records: &[Record], identifier: &IdentifierField) -> Vec<ColumnSpec> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    let mut columns = vec![
        ColumnSpec::action(ColumnKind::Select, "select", ""),
        ColumnSpec::action(ColumnKind::Edit, "edit", "Edit"),
        ColumnSpec::action(ColumnKind::View, "view", "View"),
        ColumnSpec::action(ColumnKind::Delete, "delete", "Del"),
    ];
    columns.extend(
        first
            .keys()
            .filter(|key| !identifier.matches(key))
            .map(ColumnSpec::field),
    );
    columns
}
