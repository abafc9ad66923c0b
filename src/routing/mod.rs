//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered scan)
//!     → matcher.rs (exact / prefix / prefix+suffix tests)
//!     → Return: Matched(route) | MethodNotAllowed | NotFound
//!
//! Route Compilation (at startup):
//!     table.rs per-resource descriptors
//!     → exact patterns first, declaration order otherwise
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always matches same route
//! - First match wins
//! - Non-canonical paths (dot or empty segments) are never routed

pub mod matcher;
pub mod router;
pub mod table;

pub use matcher::PathPattern;
pub use router::{Dispatch, Resource, RouteDescriptor, RouteTable, Target};
