//! Raw and typed response models.
//!
//! # Responsibilities
//! - Hold a wire-level response (status, headers, single-pass body stream)
//! - Build immutable typed responses with an optional entity
//!
//! # Design Decisions
//! - Status codes outside 100..=599 are rejected at construction
//! - `ResponseBuilder::build` consumes the builder, so a response is built once
//! - An undecoded body stream can ride along until someone extracts a typed entity

use std::fmt;
use std::io::{Cursor, Read};

use http::StatusCode;

use crate::decoding::types::{DecodeError, DecodeResult, Entity};
use crate::http::headers::HeaderMultimap;

/// Single-pass response body.
pub type BodyStream = Box<dyn Read + Send + Sync>;

/// Validate a numeric status code.
pub fn status_from_u16(code: u16) -> DecodeResult<StatusCode> {
    if !(100..=599).contains(&code) {
        return Err(DecodeError::InvalidStatus(code));
    }
    StatusCode::from_u16(code).map_err(|_| DecodeError::InvalidStatus(code))
}

/// A response as received from the transport.
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMultimap,
    body: Option<BodyStream>,
}

impl RawResponse {
    pub fn new(status: u16, headers: HeaderMultimap, body: Option<BodyStream>) -> DecodeResult<Self> {
        Ok(Self {
            status: status_from_u16(status)?,
            headers,
            body,
        })
    }

    /// Response with a fully buffered body.
    pub fn from_bytes(status: u16, headers: HeaderMultimap, body: impl Into<Vec<u8>>) -> DecodeResult<Self> {
        Self::new(status, headers, Some(Box::new(Cursor::new(body.into()))))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMultimap {
        &self.headers
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMultimap, Option<BodyStream>) {
        (self.status, self.headers, self.body)
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Payload carried by a typed response.
pub enum ResponseEntity {
    /// Entity decoded into a typed value.
    Decoded(Entity),
    /// Body not yet decoded.
    Stream(BodyStream),
}

impl fmt::Debug for ResponseEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseEntity::Decoded(entity) => f.debug_tuple("Decoded").field(entity).finish(),
            ResponseEntity::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Response with status, headers and an optional entity.
#[derive(Debug)]
pub struct TypedResponse {
    status: StatusCode,
    headers: HeaderMultimap,
    entity: Option<ResponseEntity>,
}

impl TypedResponse {
    pub fn builder(status: StatusCode) -> ResponseBuilder {
        ResponseBuilder::new(status)
    }

    /// Wrap a raw response without decoding its body.
    pub fn unread(raw: RawResponse) -> Self {
        let (status, headers, body) = raw.into_parts();
        Self {
            status,
            headers,
            entity: body.map(ResponseEntity::Stream),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMultimap {
        &self.headers
    }

    /// The decoded entity, if one was attached.
    pub fn entity(&self) -> Option<&Entity> {
        match &self.entity {
            Some(ResponseEntity::Decoded(entity)) => Some(entity),
            _ => None,
        }
    }

    pub fn entity_as<T: 'static>(&self) -> Option<&T> {
        self.entity().and_then(|e| e.downcast_ref::<T>())
    }

    pub fn has_entity(&self) -> bool {
        self.entity().is_some()
    }

    pub fn has_body_stream(&self) -> bool {
        matches!(self.entity, Some(ResponseEntity::Stream(_)))
    }

    /// Take the undecoded body. Subsequent calls return `None`.
    pub fn take_body_stream(&mut self) -> Option<BodyStream> {
        match self.entity.take() {
            Some(ResponseEntity::Stream(stream)) => Some(stream),
            other => {
                self.entity = other;
                None
            }
        }
    }

    pub fn into_entity(self) -> Option<Entity> {
        match self.entity {
            Some(ResponseEntity::Decoded(entity)) => Some(entity),
            _ => None,
        }
    }
}

/// Accumulates the parts of a [`TypedResponse`].
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMultimap,
    entity: Option<ResponseEntity>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMultimap::new(),
            entity: None,
        }
    }

    /// Append a header value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn entity(mut self, entity: Entity) -> Self {
        self.entity = Some(ResponseEntity::Decoded(entity));
        self
    }

    pub fn body_stream(mut self, stream: BodyStream) -> Self {
        self.entity = Some(ResponseEntity::Stream(stream));
        self
    }

    pub fn build(self) -> TypedResponse {
        TypedResponse {
            status: self.status,
            headers: self.headers,
            entity: self.entity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_status_range() {
        assert_eq!(status_from_u16(100).unwrap(), StatusCode::CONTINUE);
        assert_eq!(status_from_u16(599).unwrap().as_u16(), 599);
        assert!(matches!(status_from_u16(99), Err(DecodeError::InvalidStatus(99))));
        assert!(matches!(status_from_u16(600), Err(DecodeError::InvalidStatus(600))));
    }

    #[test]
    fn test_builder() {
        let response = TypedResponse::builder(StatusCode::CREATED)
            .header("Location", "/items/7")
            .header("Vary", "Accept")
            .header("Vary", "Origin")
            .entity(Entity::new(7u32))
            .build();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get("vary"), ["Accept", "Origin"]);
        assert_eq!(response.entity_as::<u32>(), Some(&7));
        assert!(!response.has_body_stream());
    }

    #[test]
    fn test_unread_body_taken_once() {
        let raw = RawResponse::from_bytes(200, HeaderMultimap::new(), "hello").unwrap();
        let mut response = TypedResponse::unread(raw);
        assert!(response.has_body_stream());
        assert!(!response.has_entity());

        let mut body = String::new();
        response
            .take_body_stream()
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "hello");
        assert!(response.take_body_stream().is_none());
    }

    #[test]
    fn test_builder_body_stream() {
        let mut response = TypedResponse::builder(StatusCode::OK)
            .header("Content-Type", "text/plain")
            .body_stream(Box::new(Cursor::new(b"raw".to_vec())))
            .build();
        assert!(response.has_body_stream());
        assert!(response.entity().is_none());
        assert!(response.take_body_stream().is_some());
    }

    #[test]
    fn test_take_body_keeps_decoded_entity() {
        let mut response = TypedResponse::builder(StatusCode::OK)
            .entity(Entity::new("x".to_string()))
            .build();
        assert!(response.take_body_stream().is_none());
        assert!(response.has_entity());
    }
}
