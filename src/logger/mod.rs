//! Logger module
//!
//! Logging for the dispatch server: lifecycle messages, access logging in
//! several formats, and per-stage diagnostics (registration scan, route
//! table build, dispatch misses and invocation failures).

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use crate::config::{AppState, Config};
use crate::controller::InvokeError;

/// Initialize the logger with configuration.
///
/// Should be called once at application startup, before the registry scan so
/// discovery diagnostics land in the configured targets.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    write_info("======================================");
    write_info("MVC dispatch server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", state.config.logging.level));
    write_info(&format!(
        "Controllers: {}, routes: {}",
        state.registry.len(),
        state.routes.len()
    ));
    if let Some(ref path) = state.config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = state.config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

/// A controller singleton entered the registry during the scan
pub fn log_handler_registered(type_name: &str) {
    write_info(&format!("[Registry] Registered controller: {type_name}"));
}

/// A registration was skipped; the scan of siblings continues
pub fn log_handler_skipped(type_name: &str, reason: &str) {
    write_error(&format!(
        "[Registry] Skipping controller {type_name}: {reason}"
    ));
}

/// One final URL entered the route table
pub fn log_route_registered(url: &str, type_name: &str, method: &str) {
    write_info(&format!("[Routes] {url} -> {type_name}::{method}"));
}

/// Request path matched no registered route
pub fn log_dispatch_miss(path: &str) {
    write_info(&format!("[Dispatch] 404 {path}"));
}

/// Handler invocation failed; the response falls back to the "null" body
pub fn log_invoke_error(path: &str, err: &InvokeError) {
    write_error(&format!("[Dispatch] Invocation failed for {path}: {err}"));
}
