//! DTOs used by the generic record list page.

use serde::Serialize;

use crate::domain::column::{Cell, ColumnKind, ColumnSpec, RowActions};
use crate::domain::list_view::{ListView, LoadState};
use crate::domain::module::{ModuleAction, list_url, navigation_url};
use crate::domain::record::Record;

/// One rendered table cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellData {
    Select { pid: String },
    Link { label: String, url: String },
    Delete { pid: String },
    Value { text: String },
}

/// Edit and view navigate to the module page; delete posts the record id.
struct LinkActions<'a> {
    list_route: &'a str,
}

impl RowActions for LinkActions<'_> {
    type Output = CellData;

    fn edit(&self, record: &Record) -> CellData {
        CellData::Link {
            label: "Edit".to_string(),
            url: navigation_url(self.list_route, ModuleAction::Edit, Some(record.id())),
        }
    }

    fn view(&self, record: &Record) -> CellData {
        CellData::Link {
            label: "View".to_string(),
            url: navigation_url(self.list_route, ModuleAction::View, Some(record.id())),
        }
    }

    fn delete(&self, record: &Record) -> CellData {
        CellData::Delete {
            pid: record.id().to_string(),
        }
    }
}

impl From<Cell<CellData>> for CellData {
    fn from(cell: Cell<CellData>) -> Self {
        match cell {
            Cell::Select(id) => CellData::Select { pid: id.into_inner() },
            Cell::Action(action) => action,
            Cell::Value(text) => CellData::Value { text },
        }
    }
}

/// Record awaiting delete confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PendingDeleteData {
    pub pid: String,
    /// Label and value of each displayed field.
    pub fields: Vec<(String, String)>,
}

/// Data required to render `base/master.html`.
#[derive(Clone, Debug, Serialize)]
pub struct ListPageData {
    pub module_code: Option<String>,
    pub title: String,
    /// Fresh-load URL of this list, when the module is known.
    pub reload_url: Option<String>,
    pub add_url: Option<String>,
    pub loading: bool,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<CellData>>,
    pub pending_delete: Option<PendingDeleteData>,
}

impl From<&ListView> for ListPageData {
    fn from(view: &ListView) -> Self {
        let descriptor = view.descriptor();
        let list_route = descriptor.map(|d| d.list_route.as_str()).unwrap_or_default();
        let actions = LinkActions { list_route };

        let rows = view
            .records()
            .iter()
            .map(|record| {
                view.columns()
                    .iter()
                    .map(|column| CellData::from(column.cell(record, &actions)))
                    .collect()
            })
            .collect();

        let pending_delete = view.pending_deletion().map(|record| PendingDeleteData {
            pid: record.id().to_string(),
            fields: view
                .columns()
                .iter()
                .filter(|column| column.kind == ColumnKind::Field)
                .map(|column| (column.label.clone(), record.display(&column.key)))
                .collect(),
        });

        Self {
            module_code: view.module_code().map(str::to_string),
            title: descriptor
                .map(|d| d.title.clone())
                .unwrap_or_else(|| "Records".to_string()),
            reload_url: descriptor.map(|d| list_url(&d.module_code)),
            add_url: descriptor.map(|d| navigation_url(&d.list_route, ModuleAction::Add, None)),
            loading: view.load_state() == LoadState::Loading,
            columns: view.columns().to_vec(),
            rows,
            pending_delete,
        }
    }
}
