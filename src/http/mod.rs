//! HTTP protocol layer module
//!
//! Query string parsing and response building, decoupled from the dispatch
//! logic itself.

pub mod query;
pub mod response;

pub use query::{parse_query, QueryMap};
pub use response::{build_404_response, build_dispatch_response};
