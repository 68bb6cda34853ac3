//! Invocation context module
//!
//! Per-request objects handed to a controller method: the bound argument
//! list, a read-only view of the live request and a mutable response sketch.

use hyper::{HeaderMap, Method};

use crate::http::query::QueryMap;

/// Read-only view of the live request
pub struct RequestInfo<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub headers: &'a HeaderMap,
    pub params: &'a QueryMap,
}

/// Response surface a controller may adjust before the body is written.
///
/// The dispatcher applies any status override and extra headers to the final
/// response; the body itself always comes from the method's return value.
#[derive(Debug, Default)]
pub struct ResponseSketch {
    status: Option<u16>,
    headers: Vec<(String, String)>,
}

impl ResponseSketch {
    pub fn set_status(&mut self, status: u16) {
        self.status = Some(status);
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// One bound argument, in the method's declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundArg {
    /// Slot for the live request view, reachable via [`CallContext::request`]
    Request,
    /// Slot for the response sketch, reachable via [`CallContext::response_mut`]
    Response,
    /// Joined named value; `None` when the key was absent from the request
    Value(Option<String>),
}

/// Everything a controller method sees for one invocation
pub struct CallContext<'a> {
    request: &'a RequestInfo<'a>,
    response: &'a mut ResponseSketch,
    args: Vec<BoundArg>,
}

impl<'a> CallContext<'a> {
    pub fn new(
        request: &'a RequestInfo<'a>,
        response: &'a mut ResponseSketch,
        args: Vec<BoundArg>,
    ) -> Self {
        Self {
            request,
            response,
            args,
        }
    }

    /// The live request view
    pub const fn request(&self) -> &'a RequestInfo<'a> {
        self.request
    }

    /// The mutable response sketch
    pub fn response_mut(&mut self) -> &mut ResponseSketch {
        self.response
    }

    /// Named value bound at `index`, `None` for absent values and raw-object slots
    pub fn arg(&self, index: usize) -> Option<&str> {
        match self.args.get(index) {
            Some(BoundArg::Value(Some(value))) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The full bound argument list, in declaration order
    pub fn args(&self) -> &[BoundArg] {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_returns_named_values_only() {
        let params = QueryMap::default();
        let method = Method::GET;
        let headers = HeaderMap::new();
        let request = RequestInfo {
            method: &method,
            path: "/x",
            headers: &headers,
            params: &params,
        };
        let mut sketch = ResponseSketch::default();
        let cx = CallContext::new(
            &request,
            &mut sketch,
            vec![
                BoundArg::Request,
                BoundArg::Value(Some("a,b".to_string())),
                BoundArg::Value(None),
            ],
        );

        assert_eq!(cx.arg(0), None);
        assert_eq!(cx.arg(1), Some("a,b"));
        assert_eq!(cx.arg(2), None);
        assert_eq!(cx.arg(3), None);
    }

    #[test]
    fn test_response_sketch_accumulates_headers() {
        let mut sketch = ResponseSketch::default();
        assert_eq!(sketch.status(), None);

        sketch.set_status(418);
        sketch.set_header("X-Flavor", "oolong");

        assert_eq!(sketch.status(), Some(418));
        assert_eq!(
            sketch.headers(),
            &[("X-Flavor".to_string(), "oolong".to_string())]
        );
    }
}
