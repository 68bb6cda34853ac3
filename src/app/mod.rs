//! Sample application controllers
//!
//! The `app.handlers` namespace wired into the registration table by `main`.
//! These exercise each binding kind: named values, the raw request view and
//! the response sketch.

use std::sync::Arc;

use crate::controller::{
    CallContext, Controller, InvokeError, ParameterBinding, RouteSpec,
};
use crate::registry::HandlerRegistration;

/// Registration table for the bundled application controllers
pub fn registrations() -> Vec<HandlerRegistration> {
    vec![
        HandlerRegistration {
            type_name: "app.handlers.HelloController",
            mapping: Some("/api"),
            construct: || Ok(Arc::new(HelloController)),
        },
        HandlerRegistration {
            type_name: "app.handlers.StatusController",
            mapping: None,
            construct: || Ok(Arc::new(StatusController)),
        },
    ]
}

/// Greeting endpoints under `/api`
struct HelloController;

impl HelloController {
    fn hello(name: Option<&str>) -> Option<String> {
        name.map(|n| format!("Hi {n}"))
    }

    fn echo(cx: &CallContext<'_>) -> String {
        let request = cx.request();
        format!("{} {} ({} query keys)", request.method, request.path, request.params.len())
    }
}

impl Controller for HelloController {
    fn routes(&self) -> Vec<RouteSpec> {
        vec![
            RouteSpec::new("hello", "hello").param(ParameterBinding::named("name", true)),
            RouteSpec::new("echo", "/echo").param(ParameterBinding::RawRequest),
        ]
    }

    fn invoke(
        &self,
        route: &str,
        cx: &mut CallContext<'_>,
    ) -> Result<Option<String>, InvokeError> {
        match route {
            "hello" => Ok(Self::hello(cx.arg(0))),
            "echo" => Ok(Some(Self::echo(cx))),
            other => Err(InvokeError::UnknownRoute(other.to_string())),
        }
    }
}

/// Service status endpoint
struct StatusController;

#[derive(serde::Serialize)]
struct StatusBody<'a> {
    service: &'a str,
    version: &'a str,
    status: &'a str,
}

impl Controller for StatusController {
    fn routes(&self) -> Vec<RouteSpec> {
        vec![RouteSpec::new("info", "/status").param(ParameterBinding::RawResponse)]
    }

    fn invoke(
        &self,
        route: &str,
        cx: &mut CallContext<'_>,
    ) -> Result<Option<String>, InvokeError> {
        match route {
            "info" => {
                cx.response_mut()
                    .set_header("Content-Type", "application/json");
                let body = StatusBody {
                    service: env!("CARGO_PKG_NAME"),
                    version: env!("CARGO_PKG_VERSION"),
                    status: "ok",
                };
                serde_json::to_string(&body)
                    .map(Some)
                    .map_err(|e| InvokeError::Failed(e.to_string()))
            }
            other => Err(InvokeError::UnknownRoute(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HandlerRegistry;
    use crate::routing::build_route_table;

    #[test]
    fn test_bundled_controllers_register_expected_urls() {
        let registry = HandlerRegistry::discover(&registrations(), "app.handlers");
        assert_eq!(registry.len(), 2);

        let table = build_route_table(&registry, "");
        assert!(table.lookup("/api/hello").is_some());
        assert!(table.lookup("/api/echo").is_some());
        assert!(table.lookup("/status").is_some());
    }

    #[test]
    fn test_status_body_is_json() {
        let registry = HandlerRegistry::discover(&registrations(), "app.handlers");
        let descriptor = registry.get("app.handlers.StatusController").unwrap();

        let params = crate::http::QueryMap::default();
        let method = hyper::Method::GET;
        let headers = hyper::HeaderMap::new();
        let request = crate::controller::RequestInfo {
            method: &method,
            path: "/status",
            headers: &headers,
            params: &params,
        };
        let mut sketch = crate::controller::ResponseSketch::default();
        let mut cx = CallContext::new(&request, &mut sketch, Vec::new());

        let body = descriptor.instance.invoke("info", &mut cx).unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(
            sketch.headers(),
            &[("Content-Type".to_string(), "application/json".to_string())]
        );
    }
}
