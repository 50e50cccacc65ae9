//! Action binding subsystem.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     handler fn(a: i64, b: Uuid) + names ["a", "b"]
//!     → handler.rs (param kinds from the Rust types, erase into Invoker)
//!     → action.rs (FormalParams, resolve slot per dynamic segment)
//!     → BoundAction attached to the terminal route node
//!
//! Dispatch:
//!     values in template order
//!     → BoundAction::arrange (reorder into handler order)
//!     → BoundAction::invoke
//! ```
//!
//! # Design Decisions
//! - Parameter names are declared at registration; kinds come from types
//! - Slot mapping is computed once, never per call
//! - Sync and async handlers share one erased calling convention

pub mod action;
pub mod handler;

pub use action::{BoundAction, FormalParams};
pub use handler::{AsyncHandler, Handler, IntoHandlerResult, Invoker, RouteParam};
