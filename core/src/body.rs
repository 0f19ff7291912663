//! Body classification and decoding.
//!
//! # Design
//! The `Content-Type` value is matched against an ordered table of
//! `(substring, kind)` pairs; the first hit wins. Matching is a plain
//! substring test, so `application/json; charset=utf-8` and
//! `application/x-www-form-urlencoded;foo` are both recognised. Each kind has
//! one decoder, and decoding never fails: malformed input degrades to a
//! placeholder plus a `BodyError` kept for diagnostics.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::BodyError;

/// Body formats the inspector knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Form,
    Json,
}

/// Checked in order against the `Content-Type` header value.
const CLASSIFIERS: &[(&str, ContentKind)] = &[
    ("application/x-www-form-urlencoded", ContentKind::Form),
    ("application/json", ContentKind::Json),
];

impl ContentKind {
    /// Map a `Content-Type` value to a decoder, or `None` when the header is
    /// missing or names a format we do not decode.
    pub fn classify(content_type: Option<&str>) -> Option<ContentKind> {
        let content_type = content_type?;
        CLASSIFIERS
            .iter()
            .find(|(needle, _)| content_type.contains(needle))
            .map(|(_, kind)| *kind)
    }

    /// Decode `raw` according to this kind.
    pub fn decode(self, raw: &[u8]) -> (DecodedBody, Option<BodyError>) {
        match self {
            ContentKind::Form => (DecodedBody::Form(FormFields::parse(raw)), None),
            ContentKind::Json => match serde_json::from_slice::<Value>(raw) {
                Ok(value) => (DecodedBody::Json(Some(value)), None),
                Err(e) => (DecodedBody::Json(None), Some(e.into())),
            },
        }
    }
}

/// Flat key/value view of a form-urlencoded body.
///
/// Keys are unique: a repeated key keeps the slot of its first occurrence and
/// the value of its last. Pairs with an empty key are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn parse(raw: &[u8]) -> Self {
        let mut fields: Vec<(String, String)> = Vec::new();
        for (key, value) in form_urlencoded::parse(raw) {
            if key.is_empty() {
                continue;
            }
            match fields.iter_mut().find(|(k, _)| k.as_str() == &*key) {
                Some(slot) => slot.1 = value.into_owned(),
                None => fields.push((key.into_owned(), value.into_owned())),
            }
        }
        Self(fields)
    }

    /// Re-encode as a canonical `key=value&key=value` query string.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

/// A POST body after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    Form(FormFields),
    /// `None` when the body was not valid JSON.
    Json(Option<Value>),
}

impl DecodedBody {
    pub fn kind(&self) -> ContentKind {
        match self {
            DecodedBody::Form(_) => ContentKind::Form,
            DecodedBody::Json(_) => ContentKind::Json,
        }
    }

    /// Text shown in the page's body section.
    pub fn display(&self) -> String {
        match self {
            DecodedBody::Form(fields) => fields.to_query_string(),
            DecodedBody::Json(Some(value)) => pretty_json(value),
            DecodedBody::Json(None) => "null".to_string(),
        }
    }
}

/// Pretty-print with four-space indentation.
fn pretty_json(value: &Value) -> String {
    let mut out = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    if value.serialize(&mut ser).is_err() {
        return "null".to_string();
    }
    String::from_utf8_lossy(&out).into_owned()
}
