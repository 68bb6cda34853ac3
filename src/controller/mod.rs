//! Controller abstraction module
//!
//! A controller is a shared singleton exposing routed methods. Its routes are
//! declared as explicit descriptors (no runtime reflection) and invoked by a
//! stable method name.

mod context;
mod metadata;

pub use context::{BoundArg, CallContext, RequestInfo, ResponseSketch};
pub use metadata::{ParameterBinding, RouteSpec};

use std::fmt;

/// Why a controller invocation failed
#[derive(Debug)]
pub enum InvokeError {
    /// `invoke` was asked for a route name the controller does not declare
    UnknownRoute(String),
    /// The handler body itself failed
    Failed(String),
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRoute(route) => write!(f, "unknown route method '{route}'"),
            Self::Failed(message) => write!(f, "handler failed: {message}"),
        }
    }
}

impl std::error::Error for InvokeError {}

/// A handler group: one singleton instance exposing routed methods.
///
/// Instances are shared across all concurrent requests; implementations must
/// not keep unsynchronized mutable instance state. That constraint is
/// documented rather than enforced.
pub trait Controller: Send + Sync {
    /// Declared routed methods, in declaration order
    fn routes(&self) -> Vec<RouteSpec>;

    /// Invoke the routed method named `route` with the bound context.
    ///
    /// `Ok(Some(_))` is written verbatim as the response body, `Ok(None)`
    /// falls back to the literal `"null"` body.
    fn invoke(
        &self,
        route: &str,
        cx: &mut CallContext<'_>,
    ) -> Result<Option<String>, InvokeError>;
}
