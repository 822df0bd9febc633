use crate::types::{Result, SyncError};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-process exclusive claims on collection ids. Two passes against the same
/// collection never overlap within one process; a second caller is turned away
/// instead of queued.
#[derive(Debug, Clone, Default)]
pub struct CollectionLeases {
    held: Arc<Mutex<HashSet<String>>>,
}

impl CollectionLeases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, collection_id: &str) -> Result<CollectionLease> {
        let mut held = self.held.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !held.insert(collection_id.to_string()) {
            return Err(SyncError::PassInProgress {
                collection_id: collection_id.to_string(),
            });
        }
        debug!("Acquired sync lease for collection {}", collection_id);
        Ok(CollectionLease {
            collection_id: collection_id.to_string(),
            held: Arc::clone(&self.held),
        })
    }

    pub fn is_held(&self, collection_id: &str) -> bool {
        self.held
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(collection_id)
    }
}

/// Released on drop.
#[derive(Debug)]
pub struct CollectionLease {
    collection_id: String,
    held: Arc<Mutex<HashSet<String>>>,
}

impl Drop for CollectionLease {
    fn drop(&mut self) {
        let mut held = self.held.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        held.remove(&self.collection_id);
        debug!("Released sync lease for collection {}", self.collection_id);
    }
}
