//! Request context and the captured, read-only view rendered by the inspector.
//!
//! # Design
//! The host fills a `RequestContext` with plain owned data (method, client
//! address, target, headers, body bytes). `InspectedRequest::capture` consumes
//! it, decides whether a body section applies, and decodes it. After capture
//! the fields are only reachable through `&self` accessors.

use crate::body::{ContentKind, DecodedBody};
use crate::error::BodyError;

/// Everything the inspector reads from one inbound request.
#[derive(Debug)]
pub struct RequestContext {
    pub method: String,
    /// Client IP as seen by the server; empty when unknown.
    pub remote_addr: String,
    /// Path plus query string exactly as received.
    pub target: String,
    /// Headers in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Result<Vec<u8>, BodyError>,
}

impl RequestContext {
    pub fn new(method: &str, target: &str) -> Self {
        Self {
            method: method.to_string(),
            remote_addr: String::new(),
            target: target.to_string(),
            headers: Vec::new(),
            body: Ok(Vec::new()),
        }
    }

    pub fn remote_addr(mut self, addr: &str) -> Self {
        self.remote_addr = addr.to_string();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body = Ok(bytes.into());
        self
    }

    /// Record that the host failed to read the body.
    pub fn unreadable_body(mut self, reason: impl Into<String>) -> Self {
        self.body = Err(BodyError::Unreadable(reason.into()));
        self
    }
}

/// A request after capture: metadata, headers and the optional decoded body.
#[derive(Debug)]
pub struct InspectedRequest {
    method: String,
    remote_addr: String,
    request_line: String,
    headers: Vec<(String, String)>,
    body: Option<DecodedBody>,
    body_error: Option<BodyError>,
}

impl InspectedRequest {
    /// Capture a request. Only a `POST` whose `Content-Type` classifies gets a
    /// body; every other combination leaves `body` empty and ignores the bytes.
    pub fn capture(ctx: RequestContext) -> Self {
        let kind = if ctx.method == "POST" {
            ContentKind::classify(content_type(&ctx.headers))
        } else {
            None
        };

        let (body, body_error) = match (kind, ctx.body) {
            (None, _) => (None, None),
            (Some(kind), Ok(raw)) => {
                let (decoded, err) = kind.decode(&raw);
                (Some(decoded), err)
            }
            (Some(kind), Err(read_err)) => {
                let (decoded, _) = kind.decode(&[]);
                (Some(decoded), Some(read_err))
            }
        };

        Self {
            method: ctx.method,
            remote_addr: ctx.remote_addr,
            request_line: ctx.target,
            headers: ctx.headers,
            body,
            body_error,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    pub fn request_line(&self) -> &str {
        &self.request_line
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn content_type(&self) -> Option<&str> {
        content_type(&self.headers)
    }

    pub fn body(&self) -> Option<&DecodedBody> {
        self.body.as_ref()
    }

    pub fn body_error(&self) -> Option<&BodyError> {
        self.body_error.as_ref()
    }
}

/// First `Content-Type` header, matched case-insensitively by name.
fn content_type(headers: &[(String, String)]) -> Option<&str> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.as_str())
}
