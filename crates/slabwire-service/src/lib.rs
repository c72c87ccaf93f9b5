//! Service-layer glue for finished slabwire messages.
//!
//! A service never touches arena bookkeeping. It receives a read-only
//! [`Request`] view of a completed message, fills in a [`Response`], and
//! [`dispatch`] releases the message afterwards. A response can then be
//! encoded into a fresh outbound message for the write path.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod mime;
pub mod response;
pub mod service;

pub use mime::{MimeService, MimeType};
pub use response::{header, Response};
pub use service::{dispatch, Request, Service};
