//! The service trait and message dispatch.

use slabwire_arena::Message;
use slabwire_core::SocketId;

use crate::response::Response;

/// Read-only view of a finished inbound message.
///
/// The protocol layer stores the request target as the message content;
/// this view exposes it without copying.
#[derive(Clone, Copy, Debug)]
pub struct Request<'m> {
    socket_id: SocketId,
    content: &'m [u8],
}

impl<'m> Request<'m> {
    /// Wrap `content` read from `socket_id`.
    pub fn new(socket_id: SocketId, content: &'m [u8]) -> Self {
        Self { socket_id, content }
    }

    /// The socket the request arrived on.
    pub fn socket_id(&self) -> SocketId {
        self.socket_id
    }

    /// Raw message bytes.
    pub fn content(&self) -> &'m [u8] {
        self.content
    }

    /// The request target, trimmed of surrounding whitespace.
    ///
    /// `None` if the content is not UTF-8.
    pub fn target(&self) -> Option<&'m str> {
        std::str::from_utf8(self.content).ok().map(str::trim)
    }
}

/// Produces a response for one request.
pub trait Service {
    /// Handle `request`, writing status, headers and content to `response`.
    fn service(&self, request: &Request<'_>, response: &mut Response);
}

/// Run `service` over a finished message, then release the message.
///
/// The message's block is returned to the arena before the response is
/// handed back, so the response may be encoded into a new message without
/// holding two blocks for one exchange.
pub fn dispatch<S: Service + ?Sized>(mut message: Message<'_>, service: &S) -> Response {
    let mut response = Response::new();
    let socket_id = message.socket_id();
    {
        let bytes = message.bytes();
        let request = Request::new(socket_id, &bytes);
        service.service(&request, &mut response);
    }
    tracing::trace!(
        socket = %socket_id,
        len = message.len(),
        status = response.status(),
        "request served"
    );
    message.release();
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Service for Echo {
        fn service(&self, request: &Request<'_>, response: &mut Response) {
            response.set_content(String::from_utf8_lossy(request.content()));
        }
    }

    #[test]
    fn target_trims_whitespace() {
        let request = Request::new(SocketId(1), b"  /text/a.txt\r\n");
        assert_eq!(request.target(), Some("/text/a.txt"));
        assert_eq!(request.socket_id(), SocketId(1));
    }

    #[test]
    fn target_rejects_invalid_utf8() {
        let request = Request::new(SocketId(1), &[0xff, 0xfe]);
        assert_eq!(request.target(), None);
    }

    #[test]
    fn service_trait_is_object_safe() {
        let service: Box<dyn Service> = Box::new(Echo);
        let mut response = Response::new();
        service.service(&Request::new(SocketId(0), b"hi"), &mut response);
        assert_eq!(response.content(), "hi");
    }
}
