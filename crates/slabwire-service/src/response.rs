//! Outbound responses.

use std::io::{self, Write};

use indexmap::IndexMap;

/// Well-known header names.
pub mod header {
    /// Byte length of the response content.
    pub const CONTENT_LENGTH: &str = "Content-Length";
    /// Media type of the response content.
    pub const CONTENT_TYPE: &str = "Content-Type";
}

/// A status code, ordered headers, and UTF-8 content.
///
/// Headers keep insertion order so encoded output is deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: IndexMap<String, String>,
    content: String,
}

impl Response {
    /// An empty `200` response.
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: IndexMap::new(),
            content: String::new(),
        }
    }

    /// Status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Set the status code.
    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Set a header, replacing any previous value but keeping its position.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Value of header `name`, if set.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// All headers in insertion order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Response content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content. `Content-Length` is not updated.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Replace the content and set `Content-Length` to its byte length.
    pub fn set_body(&mut self, content: impl Into<String>) {
        self.set_content(content);
        let len = self.content.len().to_string();
        self.set_header(header::CONTENT_LENGTH, len);
    }

    /// Write the status line, headers, blank line, and content to `out`.
    ///
    /// An arena [`Message`](slabwire_arena::Message) is a valid `out`; a
    /// full arena surfaces as [`io::ErrorKind::WouldBlock`].
    pub fn encode_into<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "HTTP/1.1 {} {}\r\n", self.status, reason(self.status))?;
        for (name, value) in &self.headers {
            write!(out, "{name}: {value}\r\n")?;
        }
        out.write_all(b"\r\n")?;
        out.write_all(self.content.as_bytes())
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_response_is_empty_ok() {
        let response = Response::new();
        assert_eq!(response.status(), 200);
        assert_eq!(response.content(), "");
        assert_eq!(response.headers().count(), 0);
    }

    #[test]
    fn set_body_updates_content_length() {
        let mut response = Response::new();
        response.set_body("héllo");
        assert_eq!(response.header(header::CONTENT_LENGTH), Some("6"));
    }

    #[test]
    fn headers_keep_insertion_order() {
        let mut response = Response::new();
        response.set_header("B", "1");
        response.set_header("A", "2");
        response.set_header("B", "3");
        let names: Vec<_> = response.headers().collect();
        assert_eq!(names, vec![("B", "3"), ("A", "2")]);
    }

    #[test]
    fn encode_writes_status_headers_and_content() {
        let mut response = Response::new();
        response.set_status(404);
        response.set_header(header::CONTENT_TYPE, "text/plain");
        response.set_body("gone");
        let mut out = Vec::new();
        response.encode_into(&mut out).unwrap();
        assert_eq!(
            out,
            b"HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\nContent-Length: 4\r\n\r\ngone"
        );
    }
}
