//! Route metadata module
//!
//! Declarative descriptors that controllers attach to their routed methods.
//! These replace annotation-driven metadata: the registering code builds the
//! descriptors explicitly.

/// How one method argument is populated from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterBinding {
    /// The live request view (method, path, headers, query map)
    RawRequest,
    /// The mutable response sketch (status override, extra headers)
    RawResponse,
    /// A value extracted from the query/form data by key
    Named {
        key: String,
        /// Informational only; binding never rejects a missing value
        required: bool,
    },
}

impl ParameterBinding {
    pub fn named(key: &str, required: bool) -> Self {
        Self::Named {
            key: key.to_string(),
            required,
        }
    }
}

/// Descriptor for one routed method of a controller
#[derive(Debug, Clone)]
pub struct RouteSpec {
    /// Stable method identifier, matched in `Controller::invoke`
    pub name: &'static str,
    /// URL suffix appended to the controller mapping
    /// (left-padded with `/` at table build time when missing)
    pub url: String,
    /// Parameter bindings in declaration order
    pub params: Vec<ParameterBinding>,
}

impl RouteSpec {
    pub fn new(name: &'static str, url: &str) -> Self {
        Self {
            name,
            url: url.to_string(),
            params: Vec::new(),
        }
    }

    /// Append one parameter binding (builder style)
    #[must_use]
    pub fn param(mut self, binding: ParameterBinding) -> Self {
        self.params.push(binding);
        self
    }
}
