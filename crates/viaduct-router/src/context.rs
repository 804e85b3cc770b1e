//! Platform boundary types
//!
//! The engine never touches a real request or response. The platform
//! adapter extracts a [`RequestHead`] from its native request, and the
//! two traits here are the only capabilities dispatch needs from the
//! native objects.

use viaduct_core::Params;

/// The request line fields dispatch matches against. The path must
/// already be percent-decoded by the adapter.
#[derive(Debug, Clone, Copy)]
pub struct RequestHead<'a> {
    /// Host header value, if the platform saw one
    pub host: Option<&'a str>,
    /// HTTP method, any casing
    pub method: &'a str,
    /// Request path, without query string
    pub path: &'a str,
}

impl<'a> RequestHead<'a> {
    pub fn new(method: &'a str, path: &'a str) -> Self {
        Self {
            host: None,
            method,
            path,
        }
    }

    pub fn with_host(mut self, host: &'a str) -> Self {
        self.host = Some(host);
        self
    }
}

/// Where a matched route's extractions land before its chain runs.
///
/// Bindings are overwritten on every match, so when several routes
/// match one request, each chain observes its own route's params.
pub trait RequestBindings {
    fn bind_params(&mut self, params: Params);
    fn bind_subdomains(&mut self, subdomains: Params);
}

/// The minimum response capability the engine itself uses.
pub trait ResponseSink {
    /// Whether a response has already been sent, if the platform can
    /// tell. `None` disables the not-found fallback.
    fn sent(&self) -> Option<bool> {
        None
    }

    /// Write a plain-text response. The engine only calls this for the
    /// not-found fallback; everything else is the handlers' concern.
    fn write(&mut self, status: u16, body: &str);
}
