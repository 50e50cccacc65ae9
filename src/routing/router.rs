//! Route tree: registration and lookup.
//!
//! # Responsibilities
//! - Store registered templates as a forest of segment nodes
//! - Extend the forest on registration, sharing common prefixes
//! - Walk the forest on lookup, collecting extracted values
//!
//! # Design Decisions
//! - Siblings keep insertion order; lookup takes the first match (no scoring)
//! - Registration identifies nodes by raw segment text
//! - The tree is a plain value; the dispatcher publishes immutable snapshots
//!   of it, so lookups never observe a half-built node
//! - Explicit `RouteNotFound` rather than a default route

use std::sync::Arc;

use crate::binding::action::{BoundAction, FormalParams};
use crate::binding::handler::Invoker;
use crate::error::{RouterError, RouterResult};
use crate::routing::matcher::{DynamicSegment, Matcher, Segment, SegmentMatch};
use crate::routing::split_route;
use crate::routing::value::RouteValue;

/// A resolved route: the action plus arguments in handler order.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub action: Arc<BoundAction>,
    pub args: Vec<RouteValue>,
}

/// One node of the route forest.
#[derive(Debug, Clone)]
pub struct RouteNode {
    segment: Segment,
    children: Vec<RouteNode>,
    action: Option<Arc<BoundAction>>,
}

impl RouteNode {
    fn new(segment: Segment) -> Self {
        Self {
            segment,
            children: Vec::new(),
            action: None,
        }
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn children(&self) -> &[RouteNode] {
        &self.children
    }

    pub fn action(&self) -> Option<&Arc<BoundAction>> {
        self.action.as_ref()
    }
}

/// Forest of route nodes rooted at a list of heads.
#[derive(Debug, Clone, Default)]
pub struct RouteTree {
    heads: Vec<RouteNode>,
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `template` and bind `invoker` to its terminal node.
    ///
    /// Returns the action previously bound to the same template, if any.
    /// On error, nodes created for the leading segments of this template may
    /// remain in `self`; callers that need atomicity insert into a copy.
    pub fn insert(
        &mut self,
        template: &str,
        params: &FormalParams,
        invoker: Invoker,
    ) -> RouterResult<Option<Arc<BoundAction>>> {
        let tokens: Vec<&str> = split_route(template).collect();
        let last = match tokens.len().checked_sub(1) {
            Some(last) => last,
            None => return Err(RouterError::EmptyTemplate),
        };

        let mut siblings = &mut self.heads;
        let mut dynamic: Vec<DynamicSegment> = Vec::new();

        for (depth, token) in tokens.iter().enumerate() {
            let idx = match siblings.iter().position(|n| n.segment.raw() == *token) {
                Some(idx) => idx,
                None => {
                    siblings.push(RouteNode::new(Segment::parse(token)?));
                    siblings.len() - 1
                }
            };

            let node = &mut siblings[idx];
            if let Some(segment) = node.segment.as_dynamic() {
                dynamic.push(segment.clone());
            }

            if depth == last {
                let collected: Vec<&DynamicSegment> = dynamic.iter().collect();
                let slots = params.resolve_slots(&collected)?;
                let action = BoundAction::new(template, slots, params.kinds(), invoker);
                return Ok(node.action.replace(Arc::new(action)));
            }

            siblings = &mut node.children;
        }

        Err(RouterError::EmptyTemplate)
    }

    /// Resolve `route` to a bound action and its arguments.
    pub fn lookup(&self, route: &str) -> RouterResult<RouteMatch> {
        let not_found = || RouterError::RouteNotFound {
            route: route.to_string(),
        };

        let mut siblings = &self.heads;
        let mut candidate: Option<&Arc<BoundAction>> = None;
        let mut extracted = Vec::new();

        for token in split_route(route) {
            let (node, matched) = siblings
                .iter()
                .find_map(|n| n.segment.is_match(token).map(|m| (n, m)))
                .ok_or_else(not_found)?;

            if let SegmentMatch::Value(value) = matched {
                extracted.push(value);
            }
            candidate = node.action.as_ref();
            siblings = &node.children;
        }

        let action = candidate.cloned().ok_or_else(not_found)?;
        let args = action.arrange(extracted);
        Ok(RouteMatch { action, args })
    }

    /// Top-level nodes.
    pub fn heads(&self) -> &[RouteNode] {
        &self.heads
    }

    /// Templates with a bound action, depth-first in insertion order.
    pub fn templates(&self) -> Vec<String> {
        fn collect(nodes: &[RouteNode], out: &mut Vec<String>) {
            for node in nodes {
                if let Some(action) = &node.action {
                    out.push(action.template().to_string());
                }
                collect(&node.children, out);
            }
        }

        let mut out = Vec::new();
        collect(&self.heads, &mut out);
        out
    }

    /// Total number of nodes in the forest.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[RouteNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.heads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::handler::{erase_sync, Handler};
    use crate::routing::value::ValueKind;
    use uuid::Uuid;

    fn insert<H, Args>(tree: &mut RouteTree, template: &str, names: &[&str], handler: H) -> RouterResult<()>
    where
        H: Handler<Args>,
    {
        let params = FormalParams::new(names, H::param_kinds())?;
        tree.insert(template, &params, erase_sync(handler)).map(|_| ())
    }

    #[test]
    fn test_static_route() {
        let mut tree = RouteTree::new();
        insert(&mut tree, "/test1/test2/", &[], || {}).unwrap();

        let found = tree.lookup("test1/test2").unwrap();
        assert_eq!(found.action.template(), "/test1/test2/");
        assert!(found.args.is_empty());

        // Slashes are normalized.
        assert!(tree.lookup("//test1///test2/").is_ok());
    }

    #[test]
    fn test_reordered_arguments() {
        let mut tree = RouteTree::new();
        insert(&mut tree, "/test1/test2/{b:int}/{a:int}", &["a", "b"], |_a: i64, _b: i64| {}).unwrap();

        let found = tree.lookup("test1/test2/1/2").unwrap();
        assert_eq!(found.action.slots(), &[1, 0]);
        assert_eq!(found.args, vec![RouteValue::Int(2), RouteValue::Int(1)]);
    }

    #[test]
    fn test_shared_prefix() {
        let mut tree = RouteTree::new();
        insert(&mut tree, "a/b/{x:int}", &["x"], |_x: i64| {}).unwrap();
        insert(&mut tree, "a/b/{x:int}/c/{y:guid}", &["x", "y"], |_x: i64, _y: Uuid| {}).unwrap();

        // a, b, {x:int}, c, {y:guid}
        assert_eq!(tree.node_count(), 5);

        let short = tree.lookup("a/b/3").unwrap();
        assert_eq!(short.action.template(), "a/b/{x:int}");
        assert_eq!(short.args, vec![RouteValue::Int(3)]);

        let id = Uuid::new_v4();
        let long = tree.lookup(&format!("a/b/3/c/{}", id)).unwrap();
        assert_eq!(long.action.template(), "a/b/{x:int}/c/{y:guid}");
        assert_eq!(long.args, vec![RouteValue::Int(3), RouteValue::Uuid(id)]);
    }

    #[test]
    fn test_segment_count_must_match() {
        let mut tree = RouteTree::new();
        insert(&mut tree, "a/b/{x:int}/c", &["x"], |_x: i64| {}).unwrap();

        assert!(tree.lookup("a/b/1").unwrap_err().is_not_found());
        assert!(tree.lookup("a/b/1/c/d").unwrap_err().is_not_found());
        assert!(tree.lookup("a/b/1/c").is_ok());
    }

    #[test]
    fn test_empty_inputs() {
        let mut tree = RouteTree::new();
        insert(&mut tree, "a", &[], || {}).unwrap();

        assert!(tree.lookup("").unwrap_err().is_not_found());
        assert!(tree.lookup("///").unwrap_err().is_not_found());

        let err = insert(&mut tree, "//", &[], || {}).unwrap_err();
        assert!(matches!(err, RouterError::EmptyTemplate));
    }

    #[test]
    fn test_first_match_wins() {
        let mut tree = RouteTree::new();
        insert(&mut tree, "items/{id:int}", &["id"], |_id: i64| {}).unwrap();
        insert(&mut tree, "items/42", &[], || {}).unwrap();

        // The dynamic sibling was inserted first, so it shadows the literal.
        let found = tree.lookup("items/42").unwrap();
        assert_eq!(found.action.template(), "items/{id:int}");

        let found = tree.lookup("items/x").unwrap_err();
        assert!(found.is_not_found());
    }

    #[test]
    fn test_same_type_different_names_are_distinct_nodes() {
        let mut tree = RouteTree::new();
        insert(&mut tree, "n/{a:int}", &["a"], |_a: i64| {}).unwrap();
        insert(&mut tree, "n/{b:int}/x", &["b"], |_b: i64| {}).unwrap();

        assert_eq!(tree.heads()[0].children().len(), 2);
        // `{a:int}` matches first and has no `x` child.
        assert!(tree.lookup("n/1/x").unwrap_err().is_not_found());
    }

    #[test]
    fn test_reregistration_replaces_action() {
        let mut tree = RouteTree::new();
        let params = FormalParams::new(&[], Vec::new()).unwrap();

        let previous = tree.insert("a/b", &params, erase_sync(|| {})).unwrap();
        assert!(previous.is_none());

        let previous = tree.insert("/a/b/", &params, erase_sync(|| {})).unwrap();
        assert_eq!(previous.unwrap().template(), "a/b");
        assert_eq!(tree.lookup("a/b").unwrap().action.template(), "/a/b/");
        assert_eq!(tree.templates(), vec!["/a/b/".to_string()]);
    }

    #[test]
    fn test_registration_errors() {
        let mut tree = RouteTree::new();

        let err = insert(&mut tree, "a/{x:int}", &["y"], |_y: i64| {}).unwrap_err();
        assert!(matches!(err, RouterError::UnknownParameter { .. }));

        let err = insert(&mut tree, "a/{x:int}", &["x"], |_x: f64| {}).unwrap_err();
        assert!(matches!(
            err,
            RouterError::TypeMismatch {
                declared: ValueKind::Int,
                expected: ValueKind::Float,
                ..
            }
        ));

        let err = insert(&mut tree, "a/{x:int}/{y:int}", &["x"], |_x: i64| {}).unwrap_err();
        assert!(matches!(err, RouterError::ArityMismatch { expected: 1, found: 2 }));

        let err = insert(&mut tree, "a/{x:text}", &["x"], |_x: i64| {}).unwrap_err();
        assert!(matches!(err, RouterError::UnsupportedType { .. }));
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let mut tree = RouteTree::new();
        insert(&mut tree, "t/{when:datetime}/{f:float}", &["f", "when"], |_f: f64, _w: chrono::DateTime<chrono::Utc>| {}).unwrap();

        let first = tree.lookup("t/2024-01-02T03:04:05Z/1.25").unwrap();
        let second = tree.lookup("t/2024-01-02T03:04:05Z/1.25").unwrap();
        assert_eq!(first.args, second.args);
        assert_eq!(first.args[0], RouteValue::Float(1.25));
        assert!(Arc::ptr_eq(&first.action, &second.action));
    }
}
