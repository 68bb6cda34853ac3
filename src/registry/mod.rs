//! Handler registry module
//!
//! Startup-time discovery of controller singletons. Instead of scanning a
//! filesystem location for compiled artifacts, controllers appear in an
//! explicit registration table; `discover` selects the entries whose
//! hierarchical type name falls under the configured namespace and
//! constructs one shared instance per entry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::controller::Controller;
use crate::logger;

/// Constructor for one controller singleton
pub type Constructor = fn() -> Result<Arc<dyn Controller>, String>;

/// One entry in the application's registration table
#[derive(Clone)]
pub struct HandlerRegistration {
    /// Fully-qualified hierarchical type name, e.g. `app.handlers.HelloController`
    pub type_name: &'static str,
    /// Type-level URL prefix; `None` when the controller declares no mapping
    pub mapping: Option<&'static str>,
    /// Builds the singleton; a failure is logged and the entry skipped
    pub construct: Constructor,
}

/// A discovered controller: its singleton instance and type-level URL prefix
pub struct HandlerDescriptor {
    pub instance: Arc<dyn Controller>,
    /// URL prefix from the registration, empty when none was declared
    pub mapping: String,
}

/// Registry of controller singletons keyed by fully-qualified type name.
///
/// Built once during initialization, immutable afterward.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, HandlerDescriptor>,
    // registration order, so route table builds are deterministic
    order: Vec<String>,
}

impl HandlerRegistry {
    /// Discover controllers under `namespace` from the registration table.
    ///
    /// A construction failure is logged and that entry skipped; it never
    /// aborts the scan of sibling entries. An empty result is a valid
    /// terminal state the caller must detect.
    pub fn discover(table: &[HandlerRegistration], namespace: &str) -> Self {
        let mut registry = Self::default();

        for registration in table {
            if !in_namespace(registration.type_name, namespace) {
                continue;
            }
            match (registration.construct)() {
                Ok(instance) => {
                    logger::log_handler_registered(registration.type_name);
                    registry.insert(
                        registration.type_name,
                        instance,
                        registration.mapping.unwrap_or(""),
                    );
                }
                Err(err) => logger::log_handler_skipped(registration.type_name, &err),
            }
        }

        registry
    }

    fn insert(&mut self, type_name: &str, instance: Arc<dyn Controller>, mapping: &str) {
        let descriptor = HandlerDescriptor {
            instance,
            mapping: mapping.to_string(),
        };
        if self
            .handlers
            .insert(type_name.to_string(), descriptor)
            .is_none()
        {
            self.order.push(type_name.to_string());
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&HandlerDescriptor> {
        self.handlers.get(type_name)
    }

    /// Handlers in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HandlerDescriptor)> {
        self.order
            .iter()
            .filter_map(|name| self.handlers.get(name).map(|d| (name.as_str(), d)))
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}

/// Whether `type_name` sits at or below the hierarchical `namespace`
fn in_namespace(type_name: &str, namespace: &str) -> bool {
    if namespace.is_empty() {
        return true;
    }
    type_name == namespace
        || type_name
            .strip_prefix(namespace)
            .is_some_and(|rest| rest.starts_with('.'))
}
