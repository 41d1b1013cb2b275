//! Services driving the generic record list page.
//!
//! A view is only locked to hand out or settle tickets; it is never locked
//! while the backend is called. The handle is held across the call so the
//! ticket is settled on the same view even if the store evicted it.

use uuid::Uuid;

use crate::domain::module::ModuleRegistry;
use crate::domain::types::{IdentifierField, RecordId};
use crate::dto::base_master::ListPageData;
use crate::models::list_views::{ListViewStore, lock_view};
use crate::repository::{RecordReader, RecordWriter};
use crate::services::ServiceResult;

/// Resolves `module_code`, fetches its records and rebuilds the view.
///
/// Unknown or missing codes render an empty list without calling the backend.
pub async fn load_list<R>(
    repo: &R,
    registry: &ModuleRegistry,
    views: &ListViewStore,
    view_id: Uuid,
    module_code: Option<&str>,
    identifier: &IdentifierField,
) -> ListPageData
where
    R: RecordReader + ?Sized,
{
    let descriptor = module_code.and_then(|code| registry.resolve(code)).cloned();
    if descriptor.is_none() {
        log::info!("No module registered for code {module_code:?}");
    }

    let handle = views.view(view_id);
    let ticket = lock_view(&handle).begin_load(module_code, descriptor);

    let records = if ticket.fetch_endpoint.is_empty() {
        Vec::new()
    } else {
        repo.fetch_all(&ticket.fetch_endpoint).await
    };

    let data = {
        let mut view = lock_view(&handle);
        if !view.finish_load(&ticket, records, identifier) {
            log::warn!(
                "Discarding stale response from {} (generation {})",
                ticket.fetch_endpoint,
                ticket.generation
            );
        }
        ListPageData::from(&*view)
    };
    if !views.restore(view_id, &handle) {
        log::warn!("List view {view_id} was replaced while loading");
    }
    data
}

/// Current state of the session's view, without refetching.
pub fn current_list(views: &ListViewStore, view_id: Uuid) -> ListPageData {
    views.with_view(view_id, |view| ListPageData::from(&*view))
}

/// Opens the delete confirmation for record `pid`.
pub fn request_delete(views: &ListViewStore, view_id: Uuid, pid: &str) -> ServiceResult<()> {
    let id = RecordId::new(pid)?;
    views.with_view(view_id, |view| view.request_delete(&id))?;
    Ok(())
}

/// Closes the delete confirmation.
pub fn cancel_delete(views: &ListViewStore, view_id: Uuid) {
    views.with_view(view_id, |view| view.cancel_delete());
}

/// Deletes the record awaiting confirmation.
///
/// On success the record leaves the list without a refetch. On failure the
/// list is unchanged and the backend error is returned.
pub async fn confirm_delete<R>(
    repo: &R,
    views: &ListViewStore,
    view_id: Uuid,
) -> ServiceResult<RecordId>
where
    R: RecordWriter + ?Sized,
{
    let handle = views.view(view_id);
    let ticket = lock_view(&handle).begin_delete()?;
    let id = ticket.record.id().clone();

    let outcome = repo
        .delete_one(&ticket.delete_endpoint_prefix, &id)
        .await
        .map_err(|err| {
            log::error!("Failed to delete record {id}: {err}");
            err
        });

    let applied = lock_view(&handle).finish_delete(&ticket, &outcome);
    if !applied {
        log::warn!("List reloaded while record {id} was being deleted");
    }
    if !views.restore(view_id, &handle) {
        log::warn!("List view {view_id} was replaced while deleting record {id}");
    }

    outcome?;
    Ok(id)
}
