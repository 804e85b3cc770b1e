//! Test doubles for the platform boundary
//!
//! [`TestRequest`] and [`TestResponse`] stand in for a platform's
//! native request and response objects, recording what dispatch does
//! to them. [`CallLog`] tracks handler execution order across a
//! dispatch from inside handler closures.

use std::sync::Arc;

use parking_lot::Mutex;
use viaduct_core::Params;
use viaduct_router::{RequestBindings, ResponseSink};

/// Request double recording the bindings the engine writes.
#[derive(Debug, Default, Clone)]
pub struct TestRequest {
    pub params: Params,
    pub subdomains: Params,
}

impl TestRequest {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RequestBindings for TestRequest {
    fn bind_params(&mut self, params: Params) {
        self.params = params;
    }

    fn bind_subdomains(&mut self, subdomains: Params) {
        self.subdomains = subdomains;
    }
}

/// Response double capturing what handlers wrote. The first write
/// wins; later writes are dropped, as they would be once a real
/// response's headers have gone out.
#[derive(Debug, Default, Clone)]
pub struct TestResponse {
    status: Option<u16>,
    body: String,
    sent: bool,
}

impl TestResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, status: u16, body: &str) {
        if self.sent {
            return;
        }
        self.status = Some(status);
        self.body = body.to_string();
        self.sent = true;
    }

    /// Write a 200 with the given body.
    pub fn end(&mut self, body: &str) {
        self.send(200, body);
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }
}

impl ResponseSink for TestResponse {
    fn sent(&self) -> Option<bool> {
        Some(self.sent)
    }

    fn write(&mut self, status: u16, body: &str) {
        self.send(status, body);
    }
}

/// Response double for platforms that cannot report send state: every
/// write is recorded and `sent` stays unknown.
#[derive(Debug, Default)]
pub struct OpaqueResponse {
    pub writes: Vec<(u16, String)>,
}

impl OpaqueResponse {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResponseSink for OpaqueResponse {
    fn write(&mut self, status: u16, body: &str) {
        self.writes.push((status, body.to_string()));
    }
}

/// Shared execution log for asserting handler order. Clone it into
/// each handler closure.
#[derive(Debug, Default, Clone)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: &str) {
        self.entries.lock().push(entry.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn joined(&self) -> String {
        self.entries.lock().join(",")
    }
}
