//! State of the generic record list page.
//!
//! A [`ListView`] moves from `Loading` to `Ready` once a fetch settles. A
//! nested machine governs deletion:
//!
//! ```text
//! Idle -> ConfirmPending -> Idle                (cancel)
//!                        -> Deleting -> Idle    (confirm, success or failure)
//! ```
//!
//! Network calls happen outside the view. Callers take a ticket, perform the
//! request, then hand the outcome back. Fetch tickets carry a generation so a
//! response that was overtaken by a newer load is discarded.

use thiserror::Error;

use crate::domain::column::{ColumnSpec, infer_columns};
use crate::domain::module::{ModuleDescriptor, ResolvedEndpoints};
use crate::domain::record::Record;
use crate::domain::types::{IdentifierField, RecordId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListViewError {
    #[error("the list is still loading")]
    NotReady,
    #[error("record {0} is not in the list")]
    UnknownRecord(String),
    #[error("another deletion is already in progress")]
    DeletionInProgress,
    #[error("no deletion is awaiting confirmation")]
    NothingToConfirm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeletionState {
    Idle,
    ConfirmPending(Record),
    Deleting(Record),
}

/// Handle for an in-flight fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    /// Empty when the module is unknown.
    pub fetch_endpoint: String,
}

/// Handle for an in-flight deletion.
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteTicket {
    pub generation: u64,
    pub record: Record,
    pub delete_endpoint_prefix: String,
}

#[derive(Clone, Debug)]
pub struct ListView {
    module_code: Option<String>,
    descriptor: Option<ModuleDescriptor>,
    records: Vec<Record>,
    columns: Vec<ColumnSpec>,
    load_state: LoadState,
    deletion: DeletionState,
    generation: u64,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    pub fn new() -> Self {
        Self {
            module_code: None,
            descriptor: None,
            records: Vec::new(),
            columns: Vec::new(),
            load_state: LoadState::Loading,
            deletion: DeletionState::Idle,
            generation: 0,
        }
    }

    /// Starts loading `module_code`, superseding any fetch still in flight.
    pub fn begin_load(
        &mut self,
        module_code: Option<&str>,
        descriptor: Option<ModuleDescriptor>,
    ) -> LoadTicket {
        self.generation += 1;
        self.module_code = module_code.map(str::to_string);
        self.descriptor = descriptor;
        self.load_state = LoadState::Loading;
        self.deletion = DeletionState::Idle;

        LoadTicket {
            generation: self.generation,
            fetch_endpoint: self.endpoints().fetch_endpoint,
        }
    }

    /// Applies a fetch result. Returns `false` when the ticket is stale and
    /// the result was discarded.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        records: Vec<Record>,
        identifier: &IdentifierField,
    ) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.columns = infer_columns(&records, identifier);
        self.records = records;
        self.load_state = LoadState::Ready;
        self.deletion = DeletionState::Idle;
        true
    }

    /// Captures the record with `id` and opens the confirmation dialog.
    pub fn request_delete(&mut self, id: &RecordId) -> Result<(), ListViewError> {
        if self.load_state != LoadState::Ready {
            return Err(ListViewError::NotReady);
        }
        if matches!(self.deletion, DeletionState::Deleting(_)) {
            return Err(ListViewError::DeletionInProgress);
        }
        let record = self
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| ListViewError::UnknownRecord(id.to_string()))?;
        self.deletion = DeletionState::ConfirmPending(record);
        Ok(())
    }

    /// Closes the confirmation dialog without side effects.
    pub fn cancel_delete(&mut self) {
        if matches!(self.deletion, DeletionState::ConfirmPending(_)) {
            self.deletion = DeletionState::Idle;
        }
    }

    /// Confirms the pending deletion.
    pub fn begin_delete(&mut self) -> Result<DeleteTicket, ListViewError> {
        let record = match &self.deletion {
            DeletionState::ConfirmPending(record) => record.clone(),
            DeletionState::Deleting(_) => return Err(ListViewError::DeletionInProgress),
            DeletionState::Idle => return Err(ListViewError::NothingToConfirm),
        };
        self.deletion = DeletionState::Deleting(record.clone());
        Ok(DeleteTicket {
            generation: self.generation,
            record,
            delete_endpoint_prefix: self.endpoints().delete_endpoint_prefix,
        })
    }

    /// Settles a deletion. On success the record leaves the list without a
    /// refetch; on failure the list is left untouched. Returns `false` when
    /// the list was reloaded meanwhile and the outcome was ignored.
    pub fn finish_delete<E>(&mut self, ticket: &DeleteTicket, outcome: &Result<(), E>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        if outcome.is_ok() {
            let id = ticket.record.id();
            self.records.retain(|record| record.id() != id);
        }
        self.deletion = DeletionState::Idle;
        true
    }

    pub fn endpoints(&self) -> ResolvedEndpoints {
        ResolvedEndpoints::from(self.descriptor.as_ref())
    }

    pub fn module_code(&self) -> Option<&str> {
        self.module_code.as_deref()
    }

    pub fn descriptor(&self) -> Option<&ModuleDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn deletion(&self) -> &DeletionState {
        &self.deletion
    }

    /// Record awaiting confirmation, if the dialog is open.
    pub fn pending_deletion(&self) -> Option<&Record> {
        match &self.deletion {
            DeletionState::ConfirmPending(record) => Some(record),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
