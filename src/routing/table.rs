//! Route table module
//!
//! Maps final URL strings to (handler identity, method descriptor) pairs.
//! Exact string match only: no path normalization beyond the single leading
//! slash fix, no trailing-slash handling, no duplicate detection.

use std::collections::HashMap;

use crate::controller::RouteSpec;
use crate::logger;
use crate::registry::HandlerRegistry;

/// One resolved route: owning handler type name plus the method descriptor
#[derive(Debug, Clone)]
pub struct RouteEntry {
    handler: String,
    route: RouteSpec,
}

impl RouteEntry {
    /// Fully-qualified type name of the owning controller
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// The method descriptor this URL resolves to
    pub const fn route(&self) -> &RouteSpec {
        &self.route
    }
}

/// Exact-match mapping from final URL to route entry.
///
/// Built once during initialization and read concurrently while serving.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteEntry>,
}

impl RouteTable {
    pub fn lookup(&self, path: &str) -> Option<&RouteEntry> {
        self.routes.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Registered final URLs, in arbitrary order (startup logging)
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

/// Build the route table from every discovered handler's declared routes.
///
/// `final_url = global_prefix + handler_mapping + suffix`, with the suffix
/// left-padded with `/` when missing. A later route with an already-taken
/// final URL silently replaces the earlier one (last writer wins).
pub fn build_route_table(registry: &HandlerRegistry, global_prefix: &str) -> RouteTable {
    let mut routes = HashMap::new();

    for (type_name, descriptor) in registry.iter() {
        for route in descriptor.instance.routes() {
            let url = format!(
                "{global_prefix}{}{}",
                descriptor.mapping,
                normalize_suffix(&route.url)
            );
            logger::log_route_registered(&url, type_name, route.name);
            routes.insert(
                url,
                RouteEntry {
                    handler: type_name.to_string(),
                    route,
                },
            );
        }
    }

    RouteTable { routes }
}

/// Force a leading slash; the one normalization the table performs
fn normalize_suffix(suffix: &str) -> String {
    if suffix.starts_with('/') {
        suffix.to_string()
    } else {
        format!("/{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{
        CallContext, Controller, InvokeError, ParameterBinding, RouteSpec,
    };
    use crate::registry::HandlerRegistration;
    use std::sync::Arc;

    struct ApiController;

    impl Controller for ApiController {
        fn routes(&self) -> Vec<RouteSpec> {
            vec![
                RouteSpec::new("hello", "hello")
                    .param(ParameterBinding::named("name", true)),
                RouteSpec::new("bye", "/bye"),
            ]
        }

        fn invoke(
            &self,
            route: &str,
            _cx: &mut CallContext<'_>,
        ) -> Result<Option<String>, InvokeError> {
            Err(InvokeError::UnknownRoute(route.to_string()))
        }
    }

    struct ShadowController;

    impl Controller for ShadowController {
        fn routes(&self) -> Vec<RouteSpec> {
            // same final URL as ApiController's "hello"
            vec![RouteSpec::new("hello2", "/hello")]
        }

        fn invoke(
            &self,
            route: &str,
            _cx: &mut CallContext<'_>,
        ) -> Result<Option<String>, InvokeError> {
            Err(InvokeError::UnknownRoute(route.to_string()))
        }
    }

    fn registry(table: &[HandlerRegistration]) -> crate::registry::HandlerRegistry {
        crate::registry::HandlerRegistry::discover(table, "app.handlers")
    }

    fn api_registration() -> HandlerRegistration {
        HandlerRegistration {
            type_name: "app.handlers.ApiController",
            mapping: Some("/api"),
            construct: || Ok(Arc::new(ApiController)),
        }
    }

    #[test]
    fn test_final_url_concatenation_and_slash_fix() {
        let registry = registry(&[api_registration()]);
        let table = build_route_table(&registry, "");

        // "hello" has no leading slash in its suffix, "bye" does
        assert!(table.lookup("/api/hello").is_some());
        assert!(table.lookup("/api/bye").is_some());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_global_prefix_prepended_to_every_route() {
        let registry = registry(&[api_registration()]);
        let table = build_route_table(&registry, "/v1");

        assert!(table.lookup("/v1/api/hello").is_some());
        assert!(table.lookup("/api/hello").is_none());
    }

    #[test]
    fn test_lookup_is_exact_match_only() {
        let registry = registry(&[api_registration()]);
        let table = build_route_table(&registry, "");

        assert!(table.lookup("/api/hello/").is_none());
        assert!(table.lookup("/api/hello/extra").is_none());
        assert!(table.lookup("/api").is_none());
        assert!(table.lookup("api/hello").is_none());
    }

    #[test]
    fn test_route_entry_carries_handler_and_descriptor() {
        let registry = registry(&[api_registration()]);
        let table = build_route_table(&registry, "");

        let entry = table.lookup("/api/hello").unwrap();
        assert_eq!(entry.handler(), "app.handlers.ApiController");
        assert_eq!(entry.route().name, "hello");
        assert_eq!(
            entry.route().params,
            vec![ParameterBinding::named("name", true)]
        );
    }

    #[test]
    fn test_last_registered_route_wins_on_collision() {
        let registry = registry(&[
            api_registration(),
            HandlerRegistration {
                type_name: "app.handlers.ShadowController",
                mapping: Some("/api"),
                construct: || Ok(Arc::new(ShadowController)),
            },
        ]);
        let table = build_route_table(&registry, "");

        // no error raised, later registration owns the URL
        let entry = table.lookup("/api/hello").unwrap();
        assert_eq!(entry.handler(), "app.handlers.ShadowController");
        assert_eq!(entry.route().name, "hello2");
    }

    #[test]
    fn test_empty_registry_builds_empty_table() {
        let registry = registry(&[]);
        let table = build_route_table(&registry, "");
        assert!(table.is_empty());
    }

    #[test]
    fn test_handler_without_mapping_uses_suffix_only() {
        let registry = registry(&[HandlerRegistration {
            type_name: "app.handlers.BareController",
            mapping: None,
            construct: || Ok(Arc::new(ApiController)),
        }]);
        let table = build_route_table(&registry, "");

        assert!(table.lookup("/hello").is_some());
        assert!(table.lookup("/bye").is_some());
    }
}
