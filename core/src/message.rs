//! Raw HTTP/1.1 messages for the companion client.
//!
//! # Design
//! Same split as the rest of the core: `HttpRequest` values are built from a
//! URL (or parsed from raw text) and marshalled to bytes, and `HttpResponse`
//! values are parsed from whatever bytes the host read back. Opening sockets
//! and reading files is left to the caller.
//!
//! Parsing is lenient in the way a diagnostic tool wants: `\r\n` and bare `\n`
//! line endings are both accepted, and a message without a blank line is all
//! head and no body.

use serde_json::Value;
use url::{form_urlencoded, Url};

use crate::error::MessageError;

pub const HTTP_1_1: &str = "HTTP/1.1";
pub const USER_AGENT: &str = "request-inspector";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// An outbound (or file-loaded) request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    /// Path plus query, as written on the start line.
    pub target: String,
    pub version: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// A response read back from a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub version: String,
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// Request for `url` with the default `Host`, `User-Agent` and
    /// `Connection: close` headers.
    pub fn from_url(method: &str, url: &str) -> Result<Self, MessageError> {
        let parsed = Url::parse(url)?;
        if parsed.scheme() != "http" {
            return Err(MessageError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        let host = parsed
            .host_str()
            .ok_or_else(|| MessageError::MissingHost(url.to_string()))?;
        let host = match parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let mut target = parsed.path().to_string();
        if let Some(query) = parsed.query() {
            target.push('?');
            target.push_str(query);
        }

        Ok(Self {
            method: method.to_string(),
            target,
            version: HTTP_1_1.to_string(),
            headers: vec![
                ("Host".to_string(), host),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
                ("Connection".to_string(), "close".to_string()),
            ],
            body: String::new(),
        })
    }

    pub fn get(url: &str) -> Result<Self, MessageError> {
        Self::from_url("GET", url)
    }

    /// POST with a form-urlencoded body built from `fields`, in order.
    pub fn post_form(url: &str, fields: &[(&str, &str)]) -> Result<Self, MessageError> {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        Ok(Self::from_url("POST", url)?
            .header("Content-Type", FORM_CONTENT_TYPE)
            .with_body(body))
    }

    /// POST with `value` encoded as compact JSON.
    pub fn post_json(url: &str, value: &Value) -> Result<Self, MessageError> {
        let body = serde_json::to_string(value)?;
        Ok(Self::from_url("POST", url)?
            .header("Content-Type", JSON_CONTENT_TYPE)
            .with_body(body))
    }

    /// Set a header, replacing an existing one with the same name
    /// (case-insensitive) in place.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        set_header(&mut self.headers, name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    /// Wire form. `Content-Length` is added when there is a body and none
    /// was set.
    pub fn to_bytes(&self) -> Vec<u8> {
        let start = format!("{} {} {}", self.method, self.target, self.version);
        marshal(&start, &self.headers, &self.body)
    }

    pub fn parse(raw: &str) -> Result<Self, MessageError> {
        let (start, headers, body) = split_message(raw)?;
        let parts: Vec<&str> = start.split(' ').collect();
        let [method, target, version] = parts.as_slice() else {
            return Err(MessageError::MalformedStartLine(start.to_string()));
        };
        if method.is_empty() || target.is_empty() || !version.starts_with("HTTP/") {
            return Err(MessageError::MalformedStartLine(start.to_string()));
        }
        Ok(Self {
            method: method.to_string(),
            target: target.to_string(),
            version: version.to_string(),
            headers,
            body,
        })
    }
}

impl HttpResponse {
    pub fn header_value(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let start = format!("{} {} {}", self.version, self.status, self.reason);
        marshal(start.trim_end(), &self.headers, &self.body)
    }

    /// Parse a status line (`HTTP/1.1 404 Not Found`; the reason may contain
    /// spaces or be missing), headers and body.
    pub fn parse(raw: &str) -> Result<Self, MessageError> {
        let (start, headers, body) = split_message(raw)?;
        let mut parts = start.splitn(3, ' ');
        let version = parts.next().unwrap_or_default();
        let status = parts.next().and_then(|s| s.parse::<u16>().ok());
        let (true, Some(status)) = (version.starts_with("HTTP/"), status) else {
            return Err(MessageError::MalformedStartLine(start.to_string()));
        };
        Ok(Self {
            version: version.to_string(),
            status,
            reason: parts.next().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
        Some(slot) => slot.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

fn marshal(start: &str, headers: &[(String, String)], body: &str) -> Vec<u8> {
    let mut out = format!("{start}\r\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    if !body.is_empty() && header_value(headers, "content-length").is_none() {
        out.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    out.push_str("\r\n");
    out.push_str(body);
    out.into_bytes()
}

/// Split raw text into start line, headers and body.
fn split_message(raw: &str) -> Result<(&str, Vec<(String, String)>, String), MessageError> {
    let (head, body) = match (raw.find("\r\n\r\n"), raw.find("\n\n")) {
        (Some(crlf), Some(lf)) if lf < crlf => (&raw[..lf], &raw[lf + 2..]),
        (Some(crlf), _) => (&raw[..crlf], &raw[crlf + 4..]),
        (None, Some(lf)) => (&raw[..lf], &raw[lf + 2..]),
        (None, None) => (raw, ""),
    };

    let mut lines = head.lines();
    let start = lines
        .next()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .ok_or(MessageError::MissingStartLine)?;

    let mut headers = Vec::new();
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            return Err(MessageError::MalformedHeader(line.to_string()));
        };
        if name.is_empty() {
            return Err(MessageError::MalformedHeader(line.to_string()));
        }
        headers.push((name.to_string(), value.trim().to_string()));
    }

    Ok((start, headers, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(req: &HttpRequest) -> String {
        String::from_utf8(req.to_bytes()).unwrap()
    }

    #[test]
    fn from_url_sets_default_headers() {
        let req = HttpRequest::get("http://example.test/a/b?x=1").unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.target, "/a/b?x=1");
        assert_eq!(req.version, "HTTP/1.1");
        assert_eq!(req.header_value("host"), Some("example.test"));
        assert_eq!(req.header_value("user-agent"), Some(USER_AGENT));
        assert_eq!(req.header_value("connection"), Some("close"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn from_url_keeps_explicit_port_and_defaults_path() {
        let req = HttpRequest::get("http://127.0.0.1:8000").unwrap();
        assert_eq!(req.target, "/");
        assert_eq!(req.header_value("Host"), Some("127.0.0.1:8000"));
    }

    #[test]
    fn from_url_rejects_https_and_garbage() {
        assert!(matches!(
            HttpRequest::get("https://example.test/"),
            Err(MessageError::UnsupportedScheme(s)) if s == "https"
        ));
        assert!(matches!(
            HttpRequest::get("not a url"),
            Err(MessageError::Url(_))
        ));
    }

    #[test]
    fn get_marshals_without_body() {
        let req = HttpRequest::get("http://example.test/").unwrap();
        assert_eq!(
            wire(&req),
            "GET / HTTP/1.1\r\nHost: example.test\r\nUser-Agent: request-inspector\r\n\
             Connection: close\r\n\r\n"
        );
    }

    #[test]
    fn post_form_encodes_values() {
        let req = HttpRequest::post_form(
            "http://example.test/submit",
            &[("name", "Ada Lovelace"), ("q", "a&b=c")],
        )
        .unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.header_value("content-type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(req.body, "name=Ada+Lovelace&q=a%26b%3Dc");
        assert!(wire(&req).contains("\r\nContent-Length: 29\r\n\r\nname=Ada+Lovelace"));
    }

    #[test]
    fn post_json_is_compact() {
        let value = serde_json::json!({"b": 1, "a": [true, null]});
        let req = HttpRequest::post_json("http://example.test/api", &value).unwrap();
        assert_eq!(req.header_value("Content-Type"), Some(JSON_CONTENT_TYPE));
        assert_eq!(req.body, r#"{"b":1,"a":[true,null]}"#);
    }

    #[test]
    fn header_replaces_case_insensitively_in_place() {
        let req = HttpRequest::get("http://example.test/")
            .unwrap()
            .header("user-agent", "curl/8")
            .header("X-Extra", "1");
        assert_eq!(req.headers[1], ("User-Agent".to_string(), "curl/8".to_string()));
        assert_eq!(req.headers.len(), 4);
    }

    #[test]
    fn explicit_content_length_is_not_duplicated() {
        let req = HttpRequest::get("http://example.test/")
            .unwrap()
            .header("Content-Length", "3")
            .with_body("abc");
        assert_eq!(wire(&req).matches("Content-Length").count(), 1);
    }

    #[test]
    fn parse_request_with_crlf() {
        let req = HttpRequest::parse(
            "POST /form HTTP/1.1\r\nHost: example.test\r\nContent-Type: text/plain\r\n\r\nhi\r\nthere",
        )
        .unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.target, "/form");
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.header_value("content-type"), Some("text/plain"));
        assert_eq!(req.body, "hi\r\nthere");
    }

    #[test]
    fn parse_request_with_bare_newlines_and_no_body() {
        let req = HttpRequest::parse("GET / HTTP/1.0\nHost: a:8080\n").unwrap();
        assert_eq!(req.version, "HTTP/1.0");
        assert_eq!(req.header_value("host"), Some("a:8080"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn parse_request_round_trips_marshalled_form() {
        let req = HttpRequest::post_form("http://example.test/", &[("a", "1")]).unwrap();
        let back = HttpRequest::parse(&wire(&req)).unwrap();
        assert_eq!(back.body, "a=1");
        assert_eq!(back.header_value("content-length"), Some("3"));
    }

    #[test]
    fn parse_request_errors() {
        assert!(matches!(HttpRequest::parse(""), Err(MessageError::MissingStartLine)));
        assert!(matches!(
            HttpRequest::parse("GET /\r\n\r\n"),
            Err(MessageError::MalformedStartLine(_))
        ));
        assert!(matches!(
            HttpRequest::parse("GET / HTTP/1.1\r\nnot a header\r\n\r\n"),
            Err(MessageError::MalformedHeader(line)) if line == "not a header"
        ));
    }

    #[test]
    fn parse_response_reason_with_spaces() {
        let resp = HttpResponse::parse(
            "HTTP/1.1 404 Not Found\r\nServer: test\r\ncontent-length: 9\r\n\r\nNot found",
        )
        .unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(resp.reason, "Not Found");
        assert_eq!(resp.header_value("Content-Length"), Some("9"));
        assert_eq!(resp.body, "Not found");
    }

    #[test]
    fn parse_response_without_reason() {
        let resp = HttpResponse::parse("HTTP/1.1 204\r\n\r\n").unwrap();
        assert_eq!(resp.status, 204);
        assert_eq!(resp.reason, "");
    }

    #[test]
    fn parse_response_rejects_bad_status() {
        assert!(matches!(
            HttpResponse::parse("HTTP/1.1 OK\r\n\r\n"),
            Err(MessageError::MalformedStartLine(_))
        ));
        assert!(matches!(
            HttpResponse::parse("200 OK\r\n\r\n"),
            Err(MessageError::MalformedStartLine(_))
        ));
    }

    #[test]
    fn response_marshal_parses_back() {
        let resp = HttpResponse {
            version: HTTP_1_1.to_string(),
            status: 200,
            reason: "OK".to_string(),
            headers: vec![("Server".to_string(), "test".to_string())],
            body: "<p>hi</p>".to_string(),
        };
        let raw = String::from_utf8(resp.to_bytes()).unwrap();
        assert!(raw.starts_with("HTTP/1.1 200 OK\r\nServer: test\r\nContent-Length: 9\r\n\r\n"));
        let back = HttpResponse::parse(&raw).unwrap();
        assert_eq!(back.body, resp.body);
        assert_eq!(back.status, 200);
    }
}
