//! Preview references for the current upload selection.
//!
//! A [`PreviewHandle`] owns exactly one live reference in a [`PreviewStore`]
//! and revokes it when dropped, so replacement, reset and teardown all release
//! through the same path. [`PreviewManager`] is the only owner of handles;
//! everything else borrows the current [`PreviewId`].

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{error::PreviewError, upload::UploadSelection};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewId(String);

impl PreviewId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Allocator of revocable preview references.
pub trait PreviewStore: Send + Sync {
    fn create(&self, selection: &UploadSelection) -> Result<PreviewId, PreviewError>;
    fn revoke(&self, id: &PreviewId);
}

pub struct PreviewHandle {
    id: PreviewId,
    store: Arc<dyn PreviewStore>,
}

impl PreviewHandle {
    pub fn acquire(
        store: Arc<dyn PreviewStore>,
        selection: &UploadSelection,
    ) -> Result<Self, PreviewError> {
        let id = store.create(selection)?;
        debug!(preview = %id, file = %selection.file_name, "preview: created");
        Ok(Self { id, store })
    }

    pub fn id(&self) -> &PreviewId {
        &self.id
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        debug!(preview = %self.id, "preview: released");
        self.store.revoke(&self.id);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("id", &self.id).finish()
    }
}

pub struct PreviewManager {
    store: Arc<dyn PreviewStore>,
    current: Option<PreviewHandle>,
}

impl PreviewManager {
    pub fn new(store: Arc<dyn PreviewStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Points the preview at `selection`. The prior reference is released
    /// once the new one exists; `None` just releases.
    pub fn set_selection(
        &mut self,
        selection: Option<&UploadSelection>,
    ) -> Result<Option<&PreviewId>, PreviewError> {
        match selection {
            None => {
                self.dispose();
                Ok(None)
            }
            Some(selection) => {
                let next = PreviewHandle::acquire(Arc::clone(&self.store), selection)?;
                let previous = self.current.replace(next);
                drop(previous);
                Ok(self.current.as_ref().map(PreviewHandle::id))
            }
        }
    }

    pub fn dispose(&mut self) {
        self.current.take();
    }

    pub fn current(&self) -> Option<&PreviewId> {
        self.current.as_ref().map(PreviewHandle::id)
    }
}

impl Drop for PreviewManager {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// In-memory store handing out `blob:` style URLs over the selection bytes.
#[derive(Default)]
pub struct ObjectUrlStore {
    live: Mutex<HashMap<PreviewId, Arc<[u8]>>>,
    capacity_limit: Option<usize>,
}

impl ObjectUrlStore {
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            live: Mutex::new(HashMap::new()),
            capacity_limit: Some(limit),
        }
    }

    pub fn resolve(&self, id: &PreviewId) -> Option<Arc<[u8]>> {
        self.live().get(id).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.live().len()
    }

    fn live(&self) -> MutexGuard<'_, HashMap<PreviewId, Arc<[u8]>>> {
        // Every mutation is a single map call, so a poisoned map is still consistent.
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PreviewStore for ObjectUrlStore {
    fn create(&self, selection: &UploadSelection) -> Result<PreviewId, PreviewError> {
        let mut live = self.live();
        if let Some(limit) = self.capacity_limit {
            if live.len() >= limit {
                return Err(PreviewError::Exhausted { limit });
            }
        }
        let id = PreviewId(format!("blob:studio/{}", Uuid::new_v4()));
        live.insert(id.clone(), Arc::clone(&selection.bytes));
        Ok(id)
    }

    fn revoke(&self, id: &PreviewId) {
        if self.live().remove(id).is_none() {
            warn!(preview = %id, "preview: revoke of unknown reference");
        }
    }
}

#[cfg(test)]
#[path = "tests/preview_tests.rs"]
pub(crate) mod tests;
