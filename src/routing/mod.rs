//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     template "a/{id:int}/b"
//!     → split_route (drop empty components)
//!     → matcher.rs (parse each component into a Segment)
//!     → router.rs (extend the forest, bind the action)
//!
//! Lookup:
//!     route "a/17/b"
//!     → split_route
//!     → router.rs (walk the forest, first matching sibling per depth)
//!     → matcher.rs (match token, extract typed value)
//!     → Return: RouteMatch { action, args } or RouteNotFound
//! ```
//!
//! # Design Decisions
//! - Leading, trailing and repeated slashes are ignored
//! - First match wins at each depth (insertion order)
//! - Typed values only: int, float, guid, datetime

pub mod matcher;
pub mod router;
pub mod value;

pub use matcher::{Segment, SegmentMatch};
pub use router::{RouteMatch, RouteTree};
pub use value::{RouteValue, ValueKind};

/// Separator between route components.
pub const SEPARATOR: char = '/';

/// Split a route or template into its non-empty components.
pub fn split_route(route: &str) -> impl Iterator<Item = &str> {
    route.split(SEPARATOR).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_route() {
        let parts: Vec<&str> = split_route("/a//b/c/").collect();
        assert_eq!(parts, vec!["a", "b", "c"]);

        assert_eq!(split_route("").count(), 0);
        assert_eq!(split_route("///").count(), 0);
        assert_eq!(split_route("a").collect::<Vec<_>>(), vec!["a"]);
    }
}
