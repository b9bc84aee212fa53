use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Per-user "submission in flight" markers, shared by every form instance.
#[derive(Clone, Default)]
pub struct SubmissionLocks {
    held: Arc<Mutex<HashSet<String>>>,
}

impl SubmissionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `owner` as submitting. Returns None while a previous guard for the same owner is alive.
    pub fn try_acquire(&self, owner: &str) -> Option<SubmissionGuard> {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        if !held.insert(owner.to_string()) {
            return None;
        }
        Some(SubmissionGuard {
            held: Arc::clone(&self.held),
            owner: owner.to_string(),
        })
    }

    pub fn is_held(&self, owner: &str) -> bool {
        let held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        held.contains(owner)
    }
}

/// Releases the owner's marker on drop, including when the submission future is cancelled.
pub struct SubmissionGuard {
    held: Arc<Mutex<HashSet<String>>>,
    owner: String,
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        held.remove(&self.owner);
    }
}
