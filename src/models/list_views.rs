//! In-memory store of per-session list views.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use uuid::Uuid;

use crate::domain::list_view::ListView;

/// Shared handle to one session's view.
pub type ViewHandle = Arc<Mutex<ListView>>;

/// List views keyed by the id kept in each session cookie.
///
/// Holds at most `capacity` views and evicts the least recently used one.
/// A request that awaits the backend keeps its [`ViewHandle`] and settles the
/// ticket on it, so eviction in the meantime cannot strand the response.
pub struct ListViewStore {
    views: Cache<Uuid, ViewHandle>,
}

/// Locks a view handed out by [`ListViewStore::view`].
pub fn lock_view(view: &Mutex<ListView>) -> MutexGuard<'_, ListView> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ListViewStore {
    pub fn new(capacity: usize) -> Self {
        let views = Cache::builder()
            .max_capacity(capacity.max(1) as u64)
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(|id, _, cause| log::info!("Evicting list view {id} ({cause:?})"))
            .build();
        Self { views }
    }

    /// Handle to the view `id`, creating an empty view when absent.
    pub fn view(&self, id: Uuid) -> ViewHandle {
        self.views.get_with(id, || Arc::new(Mutex::new(ListView::new())))
    }

    /// Puts `handle` back under `id` unless another view took its place.
    ///
    /// Returns whether `handle` is the stored view afterwards.
    pub fn restore(&self, id: Uuid, handle: &ViewHandle) -> bool {
        let current = self.views.get_with(id, || Arc::clone(handle));
        Arc::ptr_eq(&current, handle)
    }

    /// Runs `f` on the view `id`, creating an empty view when absent.
    pub fn with_view<T>(&self, id: Uuid, f: impl FnOnce(&mut ListView) -> T) -> T {
        let handle = self.view(id);
        let mut view = lock_view(&handle);
        f(&mut view)
    }

    /// Runs `f` on the view `id` if it exists.
    pub fn read<T>(&self, id: Uuid, f: impl FnOnce(&ListView) -> T) -> Option<T> {
        self.views.get(&id).map(|handle| f(&lock_view(&handle)))
    }

    pub fn len(&self) -> usize {
        self.views.run_pending_tasks();
        usize::try_from(self.views.entry_count()).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
