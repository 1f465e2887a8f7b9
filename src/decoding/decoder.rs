//! Decoder capability and decode request types.

use std::fmt;
use std::io::Read;

use http::StatusCode;

use crate::decoding::types::{Annotation, DecodeResult, Entity, TypeKey};
use crate::http::headers::HeaderMultimap;
use crate::http::media::MediaType;

/// Inbound message details visible to context-sensitive decoders.
#[derive(Debug, Clone, Default)]
pub struct MessageContext {
    requestor: bool,
    status: Option<StatusCode>,
    headers: HeaderMultimap,
}

impl MessageContext {
    /// Context for a response read on the client (requestor) side.
    pub fn inbound_client(headers: HeaderMultimap) -> Self {
        Self {
            requestor: true,
            status: None,
            headers,
        }
    }

    /// Attach the status code of the message being read.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_requestor(&self) -> bool {
        self.requestor
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMultimap {
        &self.headers
    }
}

/// Lookup key for a decoder, also passed to the decoder itself.
#[derive(Debug, Clone, Copy)]
pub struct DecodeRequest<'a> {
    pub class: TypeKey,
    pub generic_type: TypeKey,
    pub annotations: &'a [Annotation],
    pub media_type: &'a MediaType,
    pub context: Option<&'a MessageContext>,
}

impl<'a> DecodeRequest<'a> {
    /// Request with the generic type equal to `class` and no annotations.
    pub fn new(class: TypeKey, media_type: &'a MediaType) -> Self {
        Self {
            class,
            generic_type: class,
            annotations: &[],
            media_type,
            context: None,
        }
    }

    pub fn with_generic_type(mut self, generic_type: TypeKey) -> Self {
        self.generic_type = generic_type;
        self
    }

    pub fn with_annotations(mut self, annotations: &'a [Annotation]) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_context(mut self, context: &'a MessageContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name() == name)
    }
}

/// Converts a body stream into a typed value.
pub trait BodyDecoder: Send + Sync + fmt::Debug {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Media types this decoder reads. Used to rank competing decoders.
    fn consumes(&self) -> &[MediaType];

    /// Returns true if this decoder can produce the requested type.
    fn can_decode(&self, request: &DecodeRequest<'_>) -> bool;

    /// Read the entity. May consume `body` fully.
    fn decode(
        &self,
        request: &DecodeRequest<'_>,
        headers: &HeaderMultimap,
        body: &mut dyn Read,
    ) -> DecodeResult<Entity>;

    /// Best specificity among consumed media types compatible with `media_type`.
    fn rank(&self, media_type: &MediaType) -> u8 {
        self.consumes()
            .iter()
            .filter(|mt| mt.is_compatible(media_type))
            .map(MediaType::specificity)
            .max()
            .unwrap_or(0)
    }
}
