//! The storefront route table.
//!
//! One function per upstream resource. Within a function, suffix rules come
//! before the plain prefix rule they refine.

use axum::http::Method;

use crate::http::relay::RelayMode::{Buffered, Streaming};
use crate::routing::matcher::PathPattern::{Exact, Prefix, PrefixSuffix};
use crate::routing::router::{Resource, RouteDescriptor, RouteTable, Target};
use crate::security::ForwardHeaders;

impl Default for RouteTable {
    fn default() -> Self {
        let mut routes = Vec::new();
        routes.extend(orders());
        routes.extend(menu());
        routes.extend(auth());
        routes.extend(admin());
        routes.extend(kitchen());
        routes.extend(delivery());
        routes.extend(customer());
        RouteTable::new(routes)
    }
}

fn orders() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor {
            name: "create_order",
            resource: Resource::Orders,
            method: Method::POST,
            pattern: Exact("/orders"),
            target: Target::Fixed("/orders"),
            forward: ForwardHeaders::ContentType,
            relay: Buffered,
        },
        RouteDescriptor {
            name: "stream_order_status",
            resource: Resource::Orders,
            method: Method::GET,
            pattern: PrefixSuffix("/orders/", "/stream"),
            target: Target::PassThrough,
            forward: ForwardHeaders::None,
            relay: Streaming,
        },
        RouteDescriptor {
            name: "track_order",
            resource: Resource::Orders,
            method: Method::GET,
            pattern: Prefix("/orders/"),
            target: Target::PassThrough,
            forward: ForwardHeaders::None,
            relay: Buffered,
        },
    ]
}

fn menu() -> Vec<RouteDescriptor> {
    vec![RouteDescriptor {
        name: "list_menu",
        resource: Resource::Menu,
        method: Method::GET,
        pattern: Exact("/menu"),
        target: Target::Fixed("/menu"),
        forward: ForwardHeaders::Auth,
        relay: Buffered,
    }]
}

fn auth() -> Vec<RouteDescriptor> {
    let write = |name, path| RouteDescriptor {
        name,
        resource: Resource::Auth,
        method: Method::POST,
        pattern: Exact(path),
        target: Target::Fixed(path),
        forward: ForwardHeaders::ContentType,
        relay: Buffered,
    };

    vec![
        RouteDescriptor {
            name: "me",
            resource: Resource::Auth,
            method: Method::GET,
            pattern: Exact("/auth/me"),
            target: Target::Fixed("/auth/me"),
            forward: ForwardHeaders::Auth,
            relay: Buffered,
        },
        write("login", "/auth/login"),
        write("setup", "/auth/setup"),
        RouteDescriptor {
            forward: ForwardHeaders::ContentTypeAndAuth,
            ..write("register", "/auth/register")
        },
        RouteDescriptor {
            forward: ForwardHeaders::ContentTypeAndAuth,
            ..write("logout", "/auth/logout")
        },
    ]
}

fn admin() -> Vec<RouteDescriptor> {
    let read = |name, resource, path| RouteDescriptor {
        name,
        resource,
        method: Method::GET,
        pattern: Exact(path),
        target: Target::PassThrough,
        forward: ForwardHeaders::Auth,
        relay: Buffered,
    };
    let write = |name, resource, method, pattern| RouteDescriptor {
        name,
        resource,
        method,
        pattern,
        target: Target::PassThrough,
        forward: ForwardHeaders::ContentTypeAndAuth,
        relay: Buffered,
    };

    vec![
        read("admin_list_menu", Resource::AdminMenu, "/admin/menu"),
        write(
            "admin_toggle_availability",
            Resource::AdminMenu,
            Method::POST,
            PrefixSuffix("/admin/menu/", "/availability"),
        ),
        read("admin_list_orders", Resource::AdminOrders, "/admin/orders"),
        write(
            "admin_update_order_status",
            Resource::AdminOrders,
            Method::POST,
            PrefixSuffix("/admin/orders/", "/status"),
        ),
        read("admin_get_inventory", Resource::AdminInventory, "/admin/inventory"),
        write(
            "admin_adjust_stock",
            Resource::AdminInventory,
            Method::POST,
            PrefixSuffix("/admin/inventory/", "/adjust"),
        ),
        write(
            "admin_update_inventory",
            Resource::AdminInventory,
            Method::PUT,
            Prefix("/admin/inventory/"),
        ),
        read("admin_analytics", Resource::AdminAnalytics, "/admin/analytics"),
        RouteDescriptor {
            pattern: Prefix("/admin/analytics/"),
            ..read("admin_analytics_report", Resource::AdminAnalytics, "")
        },
    ]
}

fn kitchen() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor {
            name: "kitchen_stream",
            resource: Resource::Kitchen,
            method: Method::GET,
            pattern: Exact("/kitchen/stream"),
            target: Target::Fixed("/kitchen/stream"),
            forward: ForwardHeaders::Auth,
            relay: Streaming,
        },
        RouteDescriptor {
            name: "kitchen_list_orders",
            resource: Resource::Kitchen,
            method: Method::GET,
            pattern: Exact("/kitchen/orders"),
            target: Target::PassThrough,
            forward: ForwardHeaders::Auth,
            relay: Buffered,
        },
        RouteDescriptor {
            name: "kitchen_update_status",
            resource: Resource::Kitchen,
            method: Method::POST,
            pattern: PrefixSuffix("/kitchen/orders/", "/status"),
            target: Target::PassThrough,
            forward: ForwardHeaders::ContentTypeAndAuth,
            relay: Buffered,
        },
    ]
}

fn delivery() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor {
            name: "delivery_list_orders",
            resource: Resource::Delivery,
            method: Method::GET,
            pattern: Exact("/delivery/orders"),
            target: Target::PassThrough,
            forward: ForwardHeaders::Auth,
            relay: Buffered,
        },
        RouteDescriptor {
            name: "delivery_update_status",
            resource: Resource::Delivery,
            method: Method::POST,
            pattern: PrefixSuffix("/delivery/orders/", "/status"),
            target: Target::PassThrough,
            forward: ForwardHeaders::ContentTypeAndAuth,
            relay: Buffered,
        },
    ]
}

fn customer() -> Vec<RouteDescriptor> {
    vec![RouteDescriptor {
        name: "customer_order_history",
        resource: Resource::Customer,
        method: Method::GET,
        pattern: Prefix("/customer/order-history/"),
        target: Target::PassThrough,
        forward: ForwardHeaders::None,
        relay: Buffered,
    }]
}
