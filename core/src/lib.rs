//! I/O-free core of the request inspector.
//!
//! # Overview
//! The host (the HTTP server) copies what it knows about an inbound request
//! into a `RequestContext`. The core turns that into an `InspectedRequest`
//! and renders it as a standalone HTML page. Nothing here reads sockets or
//! global state, so every behavior is testable with synthetic requests.
//!
//! # Design
//! - `RequestContext` is an explicit value; there is no ambient request state.
//! - `InspectedRequest` is read-only once captured; rendering borrows it.
//! - Body handling is a classification step (`ContentKind::classify`) followed
//!   by a decoder per kind.
//! - All request-derived text is HTML-escaped at the render boundary.
//! - `message` is the client side: raw HTTP/1.1 requests are built or parsed
//!   and marshalled here, and the host does the socket work.

pub mod body;
pub mod error;
pub mod message;
pub mod render;
pub mod request;

pub use body::{ContentKind, DecodedBody, FormFields};
pub use error::{BodyError, MessageError};
pub use message::{HttpRequest, HttpResponse};
pub use render::{render, RenderOptions};
pub use request::{InspectedRequest, RequestContext};
