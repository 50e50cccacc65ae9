//! Route registration and bounded dispatch.
//!
//! # Responsibilities
//! - Register templates with typed handlers
//! - Publish the route tree as immutable snapshots
//! - Run routes under the admission gate
//!
//! # Design Decisions
//! - Copy-on-write: writers clone, mutate and swap; readers never lock
//! - Registrations are serialized by a single writer mutex
//! - A failed registration publishes nothing
//! - Handlers run on the caller's task; the router spawns nothing

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use arc_swap::ArcSwap;

use crate::binding::action::FormalParams;
use crate::binding::handler::{erase_async, erase_sync, AsyncHandler, Handler, Invoker};
use crate::config::DispatchConfig;
use crate::dispatch::gate::AdmissionGate;
use crate::error::RouterResult;
use crate::observability::metrics;
use crate::routing::router::{RouteMatch, RouteTree};

/// Typed route dispatcher.
///
/// Share it behind an `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct Router {
    /// Current route tree snapshot.
    routes: ArcSwap<RouteTree>,
    /// Serializes registrations.
    writer: Mutex<()>,
    /// Bounds concurrently executing handlers.
    gate: AdmissionGate,
}

impl Router {
    /// Create a router from configuration.
    pub fn new(config: &DispatchConfig) -> Self {
        let limit = config.limit();
        tracing::info!(
            max_parallel_executions = config.max_parallel_executions,
            bounded = limit.is_some(),
            "Router created"
        );

        Self {
            routes: ArcSwap::from_pointee(RouteTree::new()),
            writer: Mutex::new(()),
            gate: AdmissionGate::new(limit),
        }
    }

    /// Create a router with the given cap. Values below 1 mean unlimited.
    pub fn with_max_parallel(max_parallel_executions: i64) -> Self {
        Self::new(&DispatchConfig {
            max_parallel_executions,
        })
    }

    /// Register a synchronous handler.
    ///
    /// `names` are the handler's parameter names, in parameter order; each
    /// dynamic segment of `template` binds to the parameter sharing its name.
    ///
    /// ```
    /// use route_dispatch::Router;
    ///
    /// let router = Router::with_max_parallel(4);
    /// router
    ///     .register_route("orders/{id:int}/{qty:int}", &["qty", "id"], |qty: i64, id: i64| {
    ///         println!("order {id} x{qty}");
    ///     })
    ///     .unwrap();
    /// ```
    pub fn register_route<H, Args>(&self, template: &str, names: &[&str], handler: H) -> RouterResult<()>
    where
        H: Handler<Args>,
    {
        let params = FormalParams::new(names, H::param_kinds())?;
        self.register(template, params, erase_sync(handler))
    }

    /// Register a handler returning a future.
    pub fn register_async_route<H, Args>(&self, template: &str, names: &[&str], handler: H) -> RouterResult<()>
    where
        H: AsyncHandler<Args>,
    {
        let params = FormalParams::new(names, H::param_kinds())?;
        self.register(template, params, erase_async(handler))
    }

    fn register(&self, template: &str, params: FormalParams, invoker: Invoker) -> RouterResult<()> {
        // Guards no data, so poisoning is recoverable.
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut draft = RouteTree::clone(&self.routes.load_full());
        let replaced = match draft.insert(template, &params, invoker) {
            Ok(replaced) => replaced,
            Err(e) => {
                tracing::warn!(template, error = %e, "Route registration rejected");
                return Err(e);
            }
        };
        self.routes.store(Arc::new(draft));

        if replaced.is_some() {
            tracing::warn!(template, "Route re-registered, previous handler replaced");
        } else {
            tracing::info!(template, params = params.len(), "Route registered");
        }
        metrics::record_registration();
        Ok(())
    }

    /// Resolve `route` against the current snapshot without invoking it.
    pub fn lookup(&self, route: &str) -> RouterResult<RouteMatch> {
        self.routes.load().lookup(route)
    }

    /// Run the handler bound to `route`.
    ///
    /// Waits for a free slot when the configured cap is reached. The slot is
    /// released when this returns, whatever the outcome.
    pub async fn run_route(&self, route: &str) -> RouterResult<()> {
        let _permit = self.gate.acquire().await?;

        let start = Instant::now();
        let result = match self.lookup(route) {
            Ok(found) => {
                tracing::debug!(route, template = found.action.template(), "Dispatching route");
                found.action.invoke(found.args).await
            }
            Err(e) => {
                tracing::debug!(route, "No route matched");
                Err(e)
            }
        };

        metrics::record_dispatch(metrics::outcome_label(&result), start.elapsed());
        result
    }

    /// Registered templates, depth-first in registration order.
    pub fn routes(&self) -> Vec<String> {
        self.routes.load().templates()
    }

    /// Configured cap, `None` when unlimited.
    pub fn max_parallel(&self) -> Option<usize> {
        self.gate.capacity()
    }

    /// Free execution slots, `None` when unlimited.
    pub fn available_slots(&self) -> Option<usize> {
        self.gate.available_permits()
    }

    /// Handlers currently executing.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Stop admitting new runs. Waiting and later callers get `GateClosed`;
    /// handlers already running finish normally.
    pub fn shutdown(&self) {
        tracing::info!(in_flight = self.in_flight(), "Router admission closed");
        self.gate.close();
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(&DispatchConfig::default())
    }
}
