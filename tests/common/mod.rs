//! Shared utilities for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use route_dispatch::Router;

/// Router with the cap used across the routing scenarios.
#[allow(dead_code)]
pub fn create_router() -> Router {
    Router::with_max_parallel(100)
}

/// Thread-safe append-only log handlers can write into.
#[derive(Clone)]
#[allow(dead_code)]
pub struct Log<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

#[allow(dead_code)]
impl<T: Clone> Log<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, entry: T) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<T> {
        self.entries.lock().unwrap().clone()
    }
}

/// Tracks how many handlers run at once and the highest count observed.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct Occupancy {
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl Occupancy {
    pub fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    pub fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}
