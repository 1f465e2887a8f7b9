//! Response decoder: raw response in, typed response out.
//!
//! # Responsibilities
//! - Copy status and every header value into a typed response
//! - Resolve a decoder for the declared entity type and decode the body
//! - Extract a typed entity from an already received response on behalf of a client
//! - Serve requests for whole [`TypedResponse`] values when registered as a decoder
//!
//! # Design Decisions
//! - Hard fail on `decode`: a requested entity type with no decoder is an error
//! - Soft fail on `extract_entity`: missing inputs or decoder yield `None`
//! - Decoder errors pass through `decode` unchanged; `extract_entity` wraps them
//! - The configured entity type is only changed through `&mut self`;
//!   `extract_entity` takes its target as a parameter and cannot disturb it
//! - As a decoder, the status comes from the message context, never the body

use std::io::{self, BufRead, BufReader, Read};
use std::sync::Arc;

use crate::client::Client;
use crate::config::DecodingConfig;
use crate::decoding::decoder::{BodyDecoder, DecodeRequest, MessageContext};
use crate::decoding::registry::DecoderRegistry;
use crate::decoding::types::{DecodeError, DecodeResult, Entity, EntityType, TypeKey};
use crate::http::headers::HeaderMultimap;
use crate::http::media::MediaType;
use crate::http::response::{BodyStream, RawResponse, TypedResponse};
use crate::observability::metrics;

/// Converts raw responses into typed responses.
#[derive(Debug, Clone)]
pub struct ResponseDecoder {
    registry: Arc<DecoderRegistry>,
    settings: DecodingConfig,
    entity_type: Option<EntityType>,
    consumes: Vec<MediaType>,
}

impl ResponseDecoder {
    /// Decoder with default settings and no configured entity type.
    pub fn new(registry: Arc<DecoderRegistry>) -> Self {
        Self {
            registry,
            settings: DecodingConfig::default(),
            entity_type: None,
            consumes: vec![MediaType::wildcard()],
        }
    }

    /// Decoder that reads entities of `entity_type`.
    pub fn for_entity(registry: Arc<DecoderRegistry>, entity_type: EntityType) -> Self {
        Self {
            entity_type: Some(entity_type),
            ..Self::new(registry)
        }
    }

    pub fn with_settings(mut self, settings: DecodingConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn set_entity_type(&mut self, entity_type: EntityType) {
        self.entity_type = Some(entity_type);
    }

    /// Stop decoding entities. Returns the previous entity type.
    pub fn clear_entity_type(&mut self) -> Option<EntityType> {
        self.entity_type.take()
    }

    pub fn entity_type(&self) -> Option<&EntityType> {
        self.entity_type.as_ref()
    }

    pub fn registry(&self) -> &Arc<DecoderRegistry> {
        &self.registry
    }

    pub fn settings(&self) -> &DecodingConfig {
        &self.settings
    }

    /// Decode using the configured entity type, if any.
    pub fn decode(&self, raw: RawResponse) -> DecodeResult<TypedResponse> {
        self.decode_as(raw, self.entity_type.as_ref())
    }

    /// Decode reading the entity as `entity_type`, ignoring the configured one.
    pub fn decode_as(&self, raw: RawResponse, entity_type: Option<&EntityType>) -> DecodeResult<TypedResponse> {
        let result = self.decode_inner(raw, entity_type);
        if result.is_err() {
            metrics::record_decode("error");
        }
        result
    }

    fn decode_inner(&self, raw: RawResponse, entity_type: Option<&EntityType>) -> DecodeResult<TypedResponse> {
        let (status, headers, body) = raw.into_parts();

        let mut builder = TypedResponse::builder(status);
        for (name, values) in headers.iter() {
            for value in values {
                builder = builder.header(name, value.as_str());
            }
        }

        let Some(entity_type) = entity_type else {
            metrics::record_decode("no_entity");
            return Ok(builder.build());
        };

        let media_type = self.resolve_media_type(&headers)?;
        let request = DecodeRequest::new(entity_type.class(), &media_type)
            .with_generic_type(entity_type.generic_type())
            .with_annotations(entity_type.annotations());

        let decoder = self.registry.find(&request).ok_or_else(|| {
            tracing::warn!(
                status = status.as_u16(),
                entity = entity_type.class().name(),
                media_type = %media_type,
                "No reader for response entity"
            );
            metrics::record_no_reader();
            DecodeError::NoReaderAvailable {
                entity: entity_type.class().name().to_string(),
            }
        })?;

        let Some(mut body) = self.open_body(body)? else {
            metrics::record_decode("empty_body");
            return Ok(builder.build());
        };

        tracing::debug!(
            status = status.as_u16(),
            entity = entity_type.class().name(),
            media_type = %media_type,
            decoder = decoder.name(),
            "Decoding response entity"
        );

        let entity = decoder.decode(&request, &headers, &mut body)?;
        metrics::record_decode("decoded");
        Ok(builder.entity(entity).build())
    }

    fn resolve_media_type(&self, headers: &HeaderMultimap) -> DecodeResult<MediaType> {
        match headers.content_type() {
            Some(value) => MediaType::parse(value),
            None if self.settings.require_content_type => Err(DecodeError::UnsupportedMediaType {
                content_type: "<missing Content-Type>".to_string(),
            }),
            None => Ok(MediaType::wildcard()),
        }
    }

    /// Wrap the body in the size limit and peek for content.
    /// Returns `None` when there is no body or it is empty.
    fn open_body(&self, body: Option<BodyStream>) -> DecodeResult<Option<BufReader<LimitedReader<BodyStream>>>> {
        let Some(body) = body else {
            return Ok(None);
        };
        let mut body = BufReader::new(LimitedReader::new(body, self.settings.max_entity_bytes));
        if body.fill_buf()?.is_empty() {
            return Ok(None);
        }
        Ok(Some(body))
    }

    /// Read the undecoded body of `response` as `target`, using the decoders
    /// scoped to `client`.
    ///
    /// Returns `Ok(None)` when the response has no `Content-Type`, no body, or
    /// no client-scoped decoder accepts `target`. Any other failure is wrapped
    /// in [`DecodeError::ClientDecode`].
    pub fn extract_entity(
        &self,
        client: &Client,
        response: &mut TypedResponse,
        target: TypeKey,
    ) -> DecodeResult<Option<Entity>> {
        let result = self.extract_inner(client, response, target);
        let outcome = match &result {
            Ok(Some(_)) => "decoded",
            Ok(None) => "absent",
            Err(_) => "error",
        };
        metrics::record_extract(outcome);
        result.map_err(|source| DecodeError::ClientDecode {
            target: target.name().to_string(),
            source: Box::new(source),
        })
    }

    fn extract_inner(
        &self,
        client: &Client,
        response: &mut TypedResponse,
        target: TypeKey,
    ) -> DecodeResult<Option<Entity>> {
        let headers = response.headers().clone();
        let Some(content_type) = headers.content_type() else {
            return Ok(None);
        };
        if !response.has_body_stream() {
            return Ok(None);
        }

        let media_type = MediaType::parse(content_type)?;
        let registry = client.endpoint().registry();
        let context = MessageContext::inbound_client(headers.clone()).with_status(response.status());
        let request = DecodeRequest::new(target, &media_type).with_context(&context);

        let Some(decoder) = registry.find(&request) else {
            tracing::debug!(entity = target.name(), media_type = %media_type, "No client reader for entity");
            return Ok(None);
        };

        let Some(mut body) = self.open_body(response.take_body_stream())? else {
            return Ok(None);
        };

        tracing::debug!(
            entity = target.name(),
            media_type = %media_type,
            decoder = decoder.name(),
            "Extracting response entity"
        );
        decoder.decode(&request, &headers, &mut body).map(Some)
    }
}

impl BodyDecoder for ResponseDecoder {
    fn name(&self) -> &str {
        "response"
    }

    fn consumes(&self) -> &[MediaType] {
        &self.consumes
    }

    fn can_decode(&self, request: &DecodeRequest<'_>) -> bool {
        request.class.is::<TypedResponse>()
    }

    /// Rebuild the response from the context status and `headers`, then run
    /// it through [`ResponseDecoder::decode`] with the configured entity type.
    fn decode(
        &self,
        request: &DecodeRequest<'_>,
        headers: &HeaderMultimap,
        body: &mut dyn Read,
    ) -> DecodeResult<Entity> {
        let status = request
            .context
            .and_then(MessageContext::status)
            .ok_or(DecodeError::MissingStatus)?;

        let mut buf = Vec::new();
        LimitedReader::new(body, self.settings.max_entity_bytes).read_to_end(&mut buf)?;

        let raw = RawResponse::from_bytes(status.as_u16(), headers.clone(), buf)?;
        ResponseDecoder::decode(self, raw).map(Entity::new)
    }
}

/// Reader that fails once more than `limit` bytes are available.
struct LimitedReader<R> {
    inner: R,
    limit: u64,
    remaining: u64,
}

impl<R> LimitedReader<R> {
    fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            limit,
            remaining: limit,
        }
    }
}

impl<R: Read> Read for LimitedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.remaining == 0 {
            // At the limit: any further byte is an overflow
            let mut probe = [0u8; 1];
            return match self.inner.read(&mut probe)? {
                0 => Ok(0),
                _ => Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("entity exceeds {} bytes", self.limit),
                )),
            };
        }
        let max = self.remaining.min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..max])?;
        self.remaining -= n as u64;
        Ok(n)
    }
}
