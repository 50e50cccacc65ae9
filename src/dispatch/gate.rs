//! Admission gate bounding concurrent handler execution.
//!
//! # Responsibilities
//! - Enforce the configured cap via a semaphore
//! - Track handlers currently admitted
//! - Release the slot on every exit path (RAII permit)
//!
//! # Design Decisions
//! - No cap configured means no semaphore at all
//! - Waiters block until a slot frees; no timeout, no priority

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{RouterError, RouterResult};
use crate::observability::metrics;

/// Counting gate with an optional fixed capacity.
#[derive(Debug)]
pub struct AdmissionGate {
    /// Semaphore limiting concurrent handlers, absent when unbounded.
    limit: Option<Arc<Semaphore>>,
    /// Configured capacity.
    capacity: Option<usize>,
    /// Handlers currently holding a permit.
    in_flight: Arc<AtomicUsize>,
}

impl AdmissionGate {
    /// Create a gate. `None` (or zero) means unbounded.
    pub fn new(capacity: Option<usize>) -> Self {
        let capacity = capacity
            .filter(|c| *c > 0)
            .map(|c| c.min(Semaphore::MAX_PERMITS));

        Self {
            limit: capacity.map(|c| Arc::new(Semaphore::new(c))),
            capacity,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wait for a free slot.
    ///
    /// Returns the permit that must be held while the handler runs.
    pub async fn acquire(&self) -> RouterResult<AdmissionPermit> {
        let permit = match &self.limit {
            Some(semaphore) => Some(
                semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| RouterError::GateClosed)?,
            ),
            None => None,
        };

        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::record_in_flight(in_flight);

        Ok(AdmissionPermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Configured capacity, `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Free slots, `None` when unbounded.
    pub fn available_permits(&self) -> Option<usize> {
        self.limit.as_ref().map(|s| s.available_permits())
    }

    /// Handlers currently admitted.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Close the gate. Current and future waiters fail with `GateClosed`;
    /// permits already handed out stay valid until dropped.
    pub fn close(&self) {
        if let Some(semaphore) = &self.limit {
            semaphore.close();
        }
    }
}

/// A slot in the admission gate.
///
/// Dropping it returns the slot, including when the handler errors or panics.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: Option<OwnedSemaphorePermit>,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::record_in_flight(remaining);
        tracing::trace!(in_flight = remaining, "Admission permit released");
    }
}
