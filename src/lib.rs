//! Typed segment router with bounded-concurrency dispatch.
//!
//! Templates such as `orders/{id:int}/items/{item:guid}` are registered with
//! typed handlers. Route strings are matched segment by segment; dynamic
//! values are parsed, reordered into handler-parameter order and passed to
//! the handler, which runs under a configurable cap on concurrent executions.

pub mod binding;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod observability;
pub mod routing;

pub use binding::{AsyncHandler, Handler, RouteParam};
pub use config::{DispatchConfig, RouterConfig};
pub use dispatch::Router;
pub use error::{RouterError, RouterResult};
pub use routing::{RouteValue, ValueKind};
