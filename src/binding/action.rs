//! Bound actions and parameter-slot resolution.
//!
//! # Responsibilities
//! - Pair declared parameter names with the handler's parameter kinds
//! - Map template order of dynamic segments to handler parameter order
//! - Reorder extracted values and invoke the erased handler

use std::fmt;

use futures_util::future::BoxFuture;

use crate::binding::handler::Invoker;
use crate::error::{RouterError, RouterResult};
use crate::routing::matcher::DynamicSegment;
use crate::routing::value::{RouteValue, ValueKind};

/// A handler's formal parameters: declared names with the kinds of the
/// handler's argument types, in handler order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalParams {
    params: Vec<(String, ValueKind)>,
}

impl FormalParams {
    /// Pair `names` with `kinds`.
    ///
    /// Fails if the counts differ or a name repeats.
    pub fn new(names: &[&str], kinds: Vec<ValueKind>) -> RouterResult<Self> {
        if names.len() != kinds.len() {
            return Err(RouterError::ArityMismatch {
                expected: kinds.len(),
                found: names.len(),
            });
        }

        let mut params: Vec<(String, ValueKind)> = Vec::with_capacity(names.len());
        for (name, kind) in names.iter().zip(kinds) {
            if params.iter().any(|(existing, _)| existing == name) {
                return Err(RouterError::DuplicateParameter {
                    name: name.to_string(),
                });
            }
            params.push((name.to_string(), kind));
        }

        Ok(Self { params })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Kinds in handler order.
    pub fn kinds(&self) -> Vec<ValueKind> {
        self.params.iter().map(|(_, kind)| *kind).collect()
    }

    /// Position and kind of the parameter called `name`.
    pub fn position(&self, name: &str) -> Option<(usize, ValueKind)> {
        self.params
            .iter()
            .position(|(n, _)| n == name)
            .map(|idx| (idx, self.params[idx].1))
    }

    /// Compute, for each dynamic segment in template order, the handler
    /// parameter position its value occupies.
    pub fn resolve_slots(&self, dynamic: &[&DynamicSegment]) -> RouterResult<Vec<usize>> {
        if dynamic.len() != self.len() {
            return Err(RouterError::ArityMismatch {
                expected: self.len(),
                found: dynamic.len(),
            });
        }

        let mut slots = Vec::with_capacity(dynamic.len());
        for (i, segment) in dynamic.iter().enumerate() {
            if dynamic[..i].iter().any(|prev| prev.name() == segment.name()) {
                return Err(RouterError::DuplicateParameter {
                    name: segment.name().to_string(),
                });
            }

            let (position, expected) =
                self.position(segment.name())
                    .ok_or_else(|| RouterError::UnknownParameter {
                        name: segment.name().to_string(),
                    })?;
            if expected != segment.kind() {
                return Err(RouterError::TypeMismatch {
                    name: segment.name().to_string(),
                    declared: segment.kind(),
                    expected,
                });
            }
            slots.push(position);
        }

        Ok(slots)
    }
}

/// A handler attached to a terminal route node.
///
/// Immutable once built; shared read-only by concurrent dispatches.
pub struct BoundAction {
    template: String,
    slots: Vec<usize>,
    kinds: Vec<ValueKind>,
    invoker: Invoker,
}

impl BoundAction {
    pub fn new(template: impl Into<String>, slots: Vec<usize>, kinds: Vec<ValueKind>, invoker: Invoker) -> Self {
        Self {
            template: template.into(),
            slots,
            kinds,
            invoker,
        }
    }

    /// The template this action was registered under.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Number of handler parameters.
    pub fn arity(&self) -> usize {
        self.kinds.len()
    }

    /// Slot index per dynamic segment, in template order.
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Reorder values from template order into handler order.
    ///
    /// Slots that receive no value keep the zero value of their kind.
    pub fn arrange(&self, extracted: Vec<RouteValue>) -> Vec<RouteValue> {
        let mut args: Vec<RouteValue> = self.kinds.iter().map(ValueKind::zero).collect();
        for (value, &slot) in extracted.into_iter().zip(&self.slots) {
            if let Some(arg) = args.get_mut(slot) {
                *arg = value;
            }
        }
        args
    }

    /// Invoke the handler with arguments already in handler order.
    pub fn invoke(&self, args: Vec<RouteValue>) -> BoxFuture<'static, RouterResult<()>> {
        (self.invoker)(args)
    }
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("template", &self.template)
            .field("slots", &self.slots)
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}
