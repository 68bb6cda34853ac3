//! Routing module
//!
//! Builds the exact-match URL table from the registry's declarative route
//! metadata and serves lookups during dispatch.

mod table;

pub use table::{build_route_table, RouteEntry, RouteTable};
