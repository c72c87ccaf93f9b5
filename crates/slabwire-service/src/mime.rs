//! A service that reports the media type implied by a request path.
//!
//! Paths are read as `/<top-level type>/<name>.<extension>`, so
//! `/image/logo.png` describes `image/png`.

use std::fmt;

use crate::response::{header, Response};
use crate::service::{Request, Service};

/// A `type/subtype` pair derived from a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MimeType {
    /// Top-level type, the first path segment.
    pub top: String,
    /// Subtype, the extension of the last path segment.
    pub sub: String,
}

impl MimeType {
    /// Derive the media type of `path`.
    ///
    /// Returns `None` unless the path has a non-empty first segment
    /// followed by a file name with a non-empty extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let (top, rest) = path.split_once('/')?;
        let file = rest.rsplit('/').next()?;
        let (_, ext) = file.rsplit_once('.')?;
        if top.is_empty() || ext.is_empty() {
            return None;
        }
        Some(Self {
            top: top.to_owned(),
            sub: ext.to_owned(),
        })
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.top, self.sub)
    }
}

/// Describes the media type of the requested path in plain text.
#[derive(Clone, Copy, Debug, Default)]
pub struct MimeService;

impl Service for MimeService {
    fn service(&self, request: &Request<'_>, response: &mut Response) {
        response.set_header(header::CONTENT_TYPE, "text/plain; charset=utf-8");
        let Some(path) = request.target() else {
            response.set_status(400);
            response.set_body("request target is not valid UTF-8");
            return;
        };
        match MimeType::from_path(path) {
            Some(mime) => {
                response.set_body(format!(
                    "You have requested {path} and the mime type of the file is {mime}"
                ));
            }
            None => {
                tracing::debug!(path, "no media type for path");
                response.set_status(400);
                response.set_body(format!("cannot determine the mime type of {path}"));
            }
        }
    }
}
