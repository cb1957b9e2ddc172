use std::{
    ops::{Deref, DerefMut},
    sync::{Mutex, PoisonError},
};

use super::search::Search;

// ----------------------------------------------
// SearchPool
// ----------------------------------------------

// Thread-safe free list of Search instances. The lock is only held while
// checking out or returning a Search, never while a search runs.
pub struct SearchPool {
    idle: Mutex<Vec<Search>>,
}

impl SearchPool {
    pub fn new() -> Self {
        Self { idle: Mutex::new(Vec::new()) }
    }

    // Pre-allocates `count` idle searches.
    pub fn with_capacity(count: usize) -> Self {
        Self { idle: Mutex::new((0..count).map(|_| Search::new()).collect()) }
    }

    // Takes an idle Search or creates a new one if none are available.
    // The Search goes back to the pool when the guard is dropped.
    pub fn checkout(&self) -> PooledSearch<'_> {
        let search = self.lock().pop().unwrap_or_default();
        PooledSearch { pool: self, search }
    }

    pub fn idle_count(&self) -> usize {
        self.lock().len()
    }

    fn release(&self, search: Search) {
        self.lock().push(search);
    }

    // A panic during a search cannot leave the free list itself in a
    // bad state, so poisoning is ignored.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Search>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SearchPool {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------
// PooledSearch
// ----------------------------------------------

pub struct PooledSearch<'pool> {
    pool: &'pool SearchPool,
    search: Search,
}

impl Deref for PooledSearch<'_> {
    type Target = Search;

    #[inline]
    fn deref(&self) -> &Search {
        &self.search
    }
}

impl DerefMut for PooledSearch<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Search {
        &mut self.search
    }
}

impl Drop for PooledSearch<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.search));
    }
}
