//! Services coordinating the list view, the master pages and the backend.

use thiserror::Error;

use crate::domain::list_view::ListViewError;
use crate::domain::module::{ModuleAction, PageTarget};
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::SubmitMethod;
use crate::repository::errors::RepositoryError;

pub mod base_master;
pub mod invoice;
pub mod ledger;
pub mod product;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Form(String),

    #[error("Record is read only")]
    ReadOnly,

    #[error("Type constraint violated: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    ListView(#[from] ListViewError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// Where and how a detail form is saved.
#[derive(Debug, PartialEq, Eq)]
pub struct SaveTarget {
    pub method: SubmitMethod,
    pub endpoint: String,
    /// Flash message shown after a successful save.
    pub success_message: &'static str,
}

impl SaveTarget {
    /// `POST {create}` for new records, `PUT {update_prefix}{pid}` otherwise.
    /// The pid is percent-encoded as a single path segment.
    pub fn for_page(
        target: &PageTarget,
        create: &str,
        update_prefix: &str,
    ) -> ServiceResult<SaveTarget> {
        match (target.action, &target.pid) {
            (ModuleAction::View, _) => Err(ServiceError::ReadOnly),
            (ModuleAction::Edit, Some(pid)) => Ok(SaveTarget {
                method: SubmitMethod::Put,
                endpoint: format!("{update_prefix}{}", pid.path_segment()),
                success_message: "Record updated successfully",
            }),
            _ => Ok(SaveTarget {
                method: SubmitMethod::Post,
                endpoint: create.to_string(),
                success_message: "Record saved successfully",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_target_follows_the_action() {
        let add = PageTarget::from_query(None, None);
        assert_eq!(
            SaveTarget::for_page(&add, "api/ledger/create", "api/ledger/update/").unwrap(),
            SaveTarget {
                method: SubmitMethod::Post,
                endpoint: "api/ledger/create".to_string(),
                success_message: "Record saved successfully",
            }
        );

        let edit = PageTarget::from_query(Some("edit"), Some("9"));
        let target = SaveTarget::for_page(&edit, "api/ledger/create", "api/ledger/update/").unwrap();
        assert_eq!(target.method, SubmitMethod::Put);
        assert_eq!(target.endpoint, "api/ledger/update/9");

        let slashed = PageTarget::from_query(Some("edit"), Some("A/1"));
        let target = SaveTarget::for_page(&slashed, "c", "api/ledger/update/").unwrap();
        assert_eq!(target.endpoint, "api/ledger/update/A%2F1");

        let view = PageTarget::from_query(Some("view"), Some("9"));
        assert!(matches!(
            SaveTarget::for_page(&view, "c", "u/"),
            Err(ServiceError::ReadOnly)
        ));
    }
}
