//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the route descriptors
//! - Look up the descriptor for a (method, path) pair
//! - Distinguish "no such path" from "path exists, wrong method"
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) ordered scan (the route set is small and fixed)
//! - Exact patterns are ordered ahead of prefix patterns at construction
//! - Explicit NotFound rather than silent default

use axum::http::{Method, Uri};

use crate::http::relay::RelayMode;
use crate::routing::matcher::{is_canonical, PathPattern};
use crate::security::ForwardHeaders;

/// Logical upstream resource a route belongs to. Used as a log/metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Orders,
    Menu,
    Auth,
    AdminMenu,
    AdminOrders,
    AdminInventory,
    AdminAnalytics,
    Kitchen,
    Delivery,
    Customer,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Orders => "orders",
            Resource::Menu => "menu",
            Resource::Auth => "auth",
            Resource::AdminMenu => "admin_menu",
            Resource::AdminOrders => "admin_orders",
            Resource::AdminInventory => "admin_inventory",
            Resource::AdminAnalytics => "admin_analytics",
            Resource::Kitchen => "kitchen",
            Resource::Delivery => "delivery",
            Resource::Customer => "customer",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where on the upstream a matched request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Always this upstream path; the inbound query string is dropped.
    Fixed(&'static str),
    /// The inbound path and query string, unchanged.
    PassThrough,
}

impl Target {
    /// Path and query to request on the upstream, relative to its base.
    pub fn resolve<'a>(&self, inbound: &'a Uri) -> &'a str {
        match *self {
            Target::Fixed(path) => path,
            Target::PassThrough => inbound
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/"),
        }
    }
}

/// Static binding of a path/method to a target, header policy and relay mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Route identifier for logging/metrics.
    pub name: &'static str,
    pub resource: Resource,
    pub method: Method,
    pub pattern: PathPattern,
    pub target: Target,
    /// Inbound request headers that reach the upstream.
    pub forward: ForwardHeaders,
    pub relay: RelayMode,
}

/// Outcome of a route lookup.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch<'a> {
    Matched(&'a RouteDescriptor),
    /// A route owns the path but not this method; carries the allowed methods.
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// Immutable route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    /// Build a table. Exact patterns move ahead of prefix patterns; relative
    /// order is otherwise kept, so suffix rules must be declared before the
    /// plain prefix rule they refine.
    pub fn new(mut routes: Vec<RouteDescriptor>) -> Self {
        routes.sort_by_key(|route| !route.pattern.is_exact());
        Self { routes }
    }

    /// Select the route for a request.
    ///
    /// The first pattern matching `path` owns it; every descriptor declared
    /// with that same pattern is a candidate for `method`. Non-canonical
    /// paths are never routed.
    pub fn dispatch(&self, method: &Method, path: &str) -> Dispatch<'_> {
        if !is_canonical(path) {
            return Dispatch::NotFound;
        }

        let Some(owner) = self.routes.iter().find(|r| r.pattern.matches(path)) else {
            return Dispatch::NotFound;
        };

        let candidates = self
            .routes
            .iter()
            .filter(|r| r.pattern == owner.pattern);

        if let Some(route) = candidates.clone().find(|r| r.method == *method) {
            return Dispatch::Matched(route);
        }

        Dispatch::MethodNotAllowed(candidates.map(|r| r.method.clone()).collect())
    }

    /// All routes in dispatch order.
    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

}
