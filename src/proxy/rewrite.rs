//! Response body annotation.
//!
//! # Responsibilities
//! - Mark which backend produced a response, keyed off the declared
//!   content type
//! - Leave everything unrecognized byte-identical
//!
//! Works on raw bytes so binary payloads survive untouched; only the JSON
//! strategy ever interprets the body, and it falls back to the text trailer
//! when the payload does not parse.

use serde_json::{json, Value};

/// Annotate `body` with the serving backend's port.
///
/// The strategy is chosen by the main content type (the part before any
/// `;` parameter, compared case-insensitively):
/// types containing `html` get an HTML comment, `json` gets a `_server`
/// field, `text` gets a plain trailer line, anything else passes through
/// unchanged. Each call marks one hop; applying it twice appends twice.
pub fn annotate(body: &[u8], content_type: &str, port: u16) -> Vec<u8> {
    let main_type = main_content_type(content_type);

    if main_type.contains("html") {
        annotate_html(body, port)
    } else if main_type.contains("json") {
        annotate_json(body, port)
    } else if main_type.contains("text") {
        annotate_text(body, port)
    } else {
        body.to_vec()
    }
}

/// Main type before any parameter, lowercased.
/// `"text/html; charset=utf-8"` becomes `"text/html"`.
fn main_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Insert an HTML comment before the first `</body>` (any case), or append
/// it at the end when the document has no closing body tag.
fn annotate_html(body: &[u8], port: u16) -> Vec<u8> {
    let comment = format!("<!-- Served by backend server on port {} -->", port);
    let mut out = Vec::with_capacity(body.len() + comment.len() + 1);

    match find_ignore_ascii_case(body, b"</body>") {
        Some(pos) => {
            out.extend_from_slice(&body[..pos]);
            out.extend_from_slice(comment.as_bytes());
            out.push(b'\n');
            out.extend_from_slice(&body[pos..]);
        }
        None => {
            out.extend_from_slice(body);
            out.push(b'\n');
            out.extend_from_slice(comment.as_bytes());
        }
    }

    out
}

/// Add a `_server` field to the root object, wrapping non-object documents
/// under `data` first. Bodies that fail to parse get the text trailer
/// instead.
fn annotate_json(body: &[u8], port: u16) -> Vec<u8> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => return annotate_text(body, port),
    };

    let server = format!("backend-{}", port);
    let annotated = match value {
        Value::Object(mut map) => {
            map.insert("_server".to_string(), Value::String(server));
            Value::Object(map)
        }
        other => json!({ "data": other, "_server": server }),
    };

    serde_json::to_vec(&annotated).unwrap_or_else(|_| annotate_text(body, port))
}

fn annotate_text(body: &[u8], port: u16) -> Vec<u8> {
    let trailer = format!("\n[Served by backend server on port {}]", port);
    let mut out = Vec::with_capacity(body.len() + trailer.len());
    out.extend_from_slice(body);
    out.extend_from_slice(trailer.as_bytes());
    out
}

/// First occurrence of `needle` in `haystack`, comparing ASCII
/// case-insensitively.
fn find_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}
