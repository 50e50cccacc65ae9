//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! register_route(template, names, handler)
//!     → writer lock
//!     → clone current RouteTree, insert, swap snapshot
//!
//! run_route(route)
//!     → gate.rs (acquire slot, waits if exhausted)
//!     → snapshot lookup
//!     → BoundAction::invoke
//!     → permit dropped (slot released)
//! ```

pub mod dispatcher;
pub mod gate;

pub use dispatcher::Router;
pub use gate::{AdmissionGate, AdmissionPermit};
