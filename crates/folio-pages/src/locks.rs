//! Per-slug mutual exclusion.
//!
//! Operations on different slugs run in parallel; operations touching a
//! common slug run one at a time. An operation that involves two slugs (a
//! rename) takes both in one step, so two renames in opposite directions
//! cannot deadlock.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex};

/// Set of slugs currently held, with a condition variable to wait for
/// releases.
#[derive(Debug, Default)]
pub(crate) struct SlugLocks {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

impl SlugLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Block until none of `slugs` is held, then hold all of them.
    ///
    /// The slugs are released when the returned guard is dropped.
    pub(crate) fn lock(&self, slugs: &[&str]) -> SlugGuard<'_> {
        let mut wanted: Vec<String> = slugs.iter().map(|s| (*s).to_owned()).collect();
        wanted.sort();
        wanted.dedup();

        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        while wanted.iter().any(|slug| held.contains(slug)) {
            held = self.released.wait(held).unwrap_or_else(|e| e.into_inner());
        }
        held.extend(wanted.iter().cloned());

        SlugGuard {
            locks: self,
            slugs: wanted,
        }
    }

    #[cfg(test)]
    fn is_held(&self, slug: &str) -> bool {
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(slug)
    }
}

/// Releases its slugs on drop.
#[must_use = "slugs are released as soon as the guard is dropped"]
pub(crate) struct SlugGuard<'a> {
    locks: &'a SlugLocks,
    slugs: Vec<String>,
}

impl Drop for SlugGuard<'_> {
    fn drop(&mut self) {
        let mut held = self.locks.held.lock().unwrap_or_else(|e| e.into_inner());
        for slug in &self.slugs {
            held.remove(slug);
        }
        drop(held);
        self.locks.released.notify_all();
    }
}
