//! Request dispatch module
//!
//! The per-request pipeline: exact-match lookup of the path in the route
//! table, argument binding in declaration order, invocation of the handler
//! singleton, and writing of the textual result.
//!
//! Failure policy: a lookup miss is the only caller-visible error (404 with
//! an empty body). An invocation failure is logged server-side and the
//! caller receives the same `"null"` body with status 200 that a handler
//! returning nothing produces. That asymmetry is deliberate and inherited
//! from the baseline behavior this engine replicates.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{HeaderMap, Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::controller::{
    BoundArg, CallContext, ParameterBinding, RequestInfo, ResponseSketch,
};
use crate::http::{self, QueryMap};
use crate::logger::{self, AccessLogEntry};

/// Body written when a handler returns nothing or its invocation fails
const NULL_BODY: &str = "null";

/// Outcome of dispatching one request, before it becomes a hyper response
#[derive(Debug)]
pub struct DispatchResult {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl DispatchResult {
    fn not_found() -> Self {
        Self {
            status: 404,
            body: String::new(),
            headers: Vec::new(),
        }
    }

    fn fallback() -> Self {
        Self {
            status: 200,
            body: NULL_BODY.to_string(),
            headers: Vec::new(),
        }
    }
}

/// Main entry point for HTTP request handling.
///
/// Safe under concurrent calls: all shared state is immutable after
/// initialization and everything request-scoped lives on this stack.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // request bodies are not consumed: form data arrives via the query string
    let (parts, _body) = req.into_parts();

    let path = parts.uri.path();
    let params = http::parse_query(parts.uri.query());
    let result = dispatch(path, &parts.method, &parts.headers, &params, &state);

    if state.cached_access_log.load(Ordering::Relaxed) {
        let mut entry = AccessLogEntry::new(
            peer_addr.to_string(),
            parts.method.to_string(),
            path.to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = result.status;
        entry.body_bytes = result.body.len();
        entry.referer = header_string(&parts.headers, "referer");
        entry.user_agent = header_string(&parts.headers, "user-agent");
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(into_response(result, &state))
}

/// Resolve, bind and invoke for one request path.
///
/// Kept separate from the hyper adapter so the whole pipeline is exercisable
/// without a live connection.
pub fn dispatch(
    path: &str,
    method: &Method,
    headers: &HeaderMap,
    params: &QueryMap,
    state: &AppState,
) -> DispatchResult {
    // 1. Lookup: exact string match only
    let Some(entry) = state.routes.lookup(path) else {
        logger::log_dispatch_miss(path);
        return DispatchResult::not_found();
    };

    // Table entries always reference a registered handler; mirror the
    // baseline fallback if the instance is somehow gone
    let Some(handler) = state.registry.get(entry.handler()) else {
        return DispatchResult::fallback();
    };

    // 2. Bind arguments in declaration order
    let request = RequestInfo {
        method,
        path,
        headers,
        params,
    };
    let mut sketch = ResponseSketch::default();
    let args = bind_args(&entry.route().params, params);
    let mut cx = CallContext::new(&request, &mut sketch, args);

    // 3. Invoke the handler singleton; 4. fall back to "null" when the
    // result is absent or the invocation failed
    let body = match handler.instance.invoke(entry.route().name, &mut cx) {
        Ok(Some(value)) => value,
        Ok(None) => NULL_BODY.to_string(),
        Err(err) => {
            logger::log_invoke_error(path, &err);
            NULL_BODY.to_string()
        }
    };

    DispatchResult {
        status: sketch.status().unwrap_or(200),
        body,
        headers: sketch.headers().to_vec(),
    }
}

/// Bind one argument per declared parameter.
///
/// Multiple values for a named key join with a comma; an absent key binds as
/// an absent value. The required flag is informational and never enforced.
fn bind_args(params: &[ParameterBinding], values: &QueryMap) -> Vec<BoundArg> {
    params
        .iter()
        .map(|binding| match binding {
            ParameterBinding::RawRequest => BoundArg::Request,
            ParameterBinding::RawResponse => BoundArg::Response,
            ParameterBinding::Named { key, .. } => BoundArg::Value(values.joined(key)),
        })
        .collect()
}

fn into_response(result: DispatchResult, state: &AppState) -> Response<Full<Bytes>> {
    if result.status == 404 && result.body.is_empty() && result.headers.is_empty() {
        return http::build_404_response();
    }

    let mut sketch = ResponseSketch::default();
    sketch.set_status(result.status);
    for (name, value) in result.headers {
        sketch.set_header(&name, &value);
    }
    http::build_dispatch_response(
        result.body,
        &state.config.http.default_content_type,
        &state.config.http.server_name,
        &sketch,
    )
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Config, DispatchConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
    };
    use crate::controller::{Controller, InvokeError, RouteSpec};
    use crate::registry::{HandlerRegistration, HandlerRegistry};
    use crate::routing::build_route_table;

    struct GreetController;

    impl GreetController {
        fn hello(name: Option<&str>) -> Option<String> {
            name.map(|n| format!("Hi {n}"))
        }
    }

    impl Controller for GreetController {
        fn routes(&self) -> Vec<RouteSpec> {
            vec![
                RouteSpec::new("hello", "hello")
                    .param(ParameterBinding::named("name", true)),
                RouteSpec::new("tags", "/tags")
                    .param(ParameterBinding::named("tag", false)),
                RouteSpec::new("void", "/void"),
                RouteSpec::new("boom", "/boom"),
                RouteSpec::new("whoami", "/whoami")
                    .param(ParameterBinding::named("ignored", false))
                    .param(ParameterBinding::RawRequest),
                RouteSpec::new("teapot", "/teapot")
                    .param(ParameterBinding::RawResponse),
            ]
        }

        fn invoke(
            &self,
            route: &str,
            cx: &mut CallContext<'_>,
        ) -> Result<Option<String>, InvokeError> {
            match route {
                "hello" => Ok(Self::hello(cx.arg(0))),
                "tags" => Ok(cx.arg(0).map(ToString::to_string)),
                "void" => Ok(None),
                "boom" => Err(InvokeError::Failed("handler blew up".to_string())),
                "whoami" => {
                    assert_eq!(cx.args()[1], BoundArg::Request);
                    let request = cx.request();
                    Ok(Some(format!("{} {}", request.method, request.path)))
                }
                "teapot" => {
                    cx.response_mut().set_status(418);
                    cx.response_mut().set_header("X-Flavor", "oolong");
                    Ok(Some("short and stout".to_string()))
                }
                other => Err(InvokeError::UnknownRoute(other.to_string())),
            }
        }
    }

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            dispatch: DispatchConfig {
                controller_namespace: Some("app.handlers".to_string()),
                url_prefix: String::new(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            http: HttpConfig {
                default_content_type: "text/plain; charset=utf-8".to_string(),
                server_name: "test".to_string(),
            },
        }
    }

    fn test_state() -> AppState {
        let table = vec![HandlerRegistration {
            type_name: "app.handlers.GreetController",
            mapping: Some("/api"),
            construct: || Ok(Arc::new(GreetController)),
        }];
        let registry = HandlerRegistry::discover(&table, "app.handlers");
        let routes = build_route_table(&registry, "");
        AppState::new(test_config(), registry, routes)
    }

    fn get(state: &AppState, path: &str, query: Option<&str>) -> DispatchResult {
        let params = http::parse_query(query);
        dispatch(path, &Method::GET, &HeaderMap::new(), &params, state)
    }

    #[test]
    fn test_registered_route_invokes_with_bound_parameter() {
        let state = test_state();
        let result = get(&state, "/api/hello", Some("name=Bob"));
        assert_eq!(result.status, 200);
        assert_eq!(result.body, "Hi Bob");
    }

    #[test]
    fn test_unregistered_path_is_404_with_empty_body() {
        let state = test_state();
        let result = get(&state, "/api/missing", None);
        assert_eq!(result.status, 404);
        assert_eq!(result.body, "");
    }

    #[test]
    fn test_multiple_values_join_with_comma() {
        let state = test_state();
        let result = get(&state, "/api/tags", Some("tag=a&tag=b"));
        assert_eq!(result.body, "a,b");
    }

    #[test]
    fn test_absent_required_parameter_binds_absent_without_failing() {
        let state = test_state();
        // "name" is declared required, but binding never enforces the flag:
        // the handler sees an absent value and returns None -> "null"
        let result = get(&state, "/api/hello", None);
        assert_eq!(result.status, 200);
        assert_eq!(result.body, "null");
    }

    #[test]
    fn test_void_return_writes_null_body() {
        let state = test_state();
        let result = get(&state, "/api/void", None);
        assert_eq!(result.status, 200);
        assert_eq!(result.body, "null");
    }

    #[test]
    fn test_invocation_failure_writes_null_body_with_200() {
        let state = test_state();
        let result = get(&state, "/api/boom", None);
        assert_eq!(result.status, 200);
        assert_eq!(result.body, "null");
    }

    #[test]
    fn test_raw_request_binding_sees_live_request_at_any_position() {
        let state = test_state();
        let result = get(&state, "/api/whoami", None);
        assert_eq!(result.body, "GET /api/whoami");
    }

    #[test]
    fn test_response_sketch_overrides_status_and_adds_headers() {
        let state = test_state();
        let result = get(&state, "/api/teapot", None);
        assert_eq!(result.status, 418);
        assert_eq!(result.body, "short and stout");
        assert_eq!(
            result.headers,
            vec![("X-Flavor".to_string(), "oolong".to_string())]
        );
    }

    #[test]
    fn test_dispatch_ignores_http_verb() {
        let state = test_state();
        let params = http::parse_query(Some("name=Eve"));
        let result = dispatch(
            "/api/hello",
            &Method::POST,
            &HeaderMap::new(),
            &params,
            &state,
        );
        assert_eq!(result.body, "Hi Eve");
    }

    #[test]
    fn test_bind_args_order_matches_declaration() {
        let params = http::parse_query(Some("name=Bob"));
        let bindings = vec![
            ParameterBinding::RawRequest,
            ParameterBinding::named("name", true),
            ParameterBinding::RawResponse,
            ParameterBinding::named("missing", false),
        ];
        let args = bind_args(&bindings, &params);
        assert_eq!(
            args,
            vec![
                BoundArg::Request,
                BoundArg::Value(Some("Bob".to_string())),
                BoundArg::Response,
                BoundArg::Value(None),
            ]
        );
    }
}
