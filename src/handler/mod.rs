//! Request handler module
//!
//! Per-request dispatch: route lookup, argument binding, controller
//! invocation and response writing.

pub mod dispatch;

// Re-export main entry point
pub use dispatch::handle_request;
