//! Built-in decoders: JSON (serde), UTF-8 text and raw bytes.

use std::fmt;
use std::io::Read;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::decoding::decoder::{BodyDecoder, DecodeRequest};
use crate::decoding::types::{DecodeError, DecodeResult, Entity, TypeKey};
use crate::http::headers::HeaderMultimap;
use crate::http::media::MediaType;

/// Deserializes JSON bodies into `T`.
///
/// Accepts `application/json` and any `+json` structured suffix.
pub struct JsonDecoder<T> {
    consumes: Vec<MediaType>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new() -> Self {
        Self {
            consumes: vec![MediaType::application_json()],
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonDecoder")
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> BodyDecoder for JsonDecoder<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        "json"
    }

    fn consumes(&self) -> &[MediaType] {
        &self.consumes
    }

    fn can_decode(&self, request: &DecodeRequest<'_>) -> bool {
        request.class == TypeKey::of::<T>()
            && (request.media_type.is_compatible(&self.consumes[0])
                || request.media_type.suffix() == Some("json"))
    }

    /// A `+json` suffix counts as an exact match.
    fn rank(&self, media_type: &MediaType) -> u8 {
        if media_type.suffix() == Some("json") {
            return 2;
        }
        self.consumes
            .iter()
            .filter(|mt| mt.is_compatible(media_type))
            .map(MediaType::specificity)
            .max()
            .unwrap_or(0)
    }

    fn decode(
        &self,
        _request: &DecodeRequest<'_>,
        _headers: &HeaderMultimap,
        body: &mut dyn Read,
    ) -> DecodeResult<Entity> {
        let value: T = serde_json::from_reader(body)?;
        Ok(Entity::new(value))
    }
}

/// Reads `text/*` bodies into a `String`.
///
/// UTF-8 is assumed when no charset is declared. `us-ascii` bodies must be
/// 7-bit clean.
#[derive(Debug)]
pub struct TextDecoder {
    consumes: Vec<MediaType>,
}

impl TextDecoder {
    pub fn new() -> Self {
        Self {
            consumes: vec![MediaType::any_text()],
        }
    }
}

impl Default for TextDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyDecoder for TextDecoder {
    fn name(&self) -> &str {
        "text"
    }

    fn consumes(&self) -> &[MediaType] {
        &self.consumes
    }

    fn can_decode(&self, request: &DecodeRequest<'_>) -> bool {
        request.class.is::<String>() && request.media_type.is_compatible(&self.consumes[0])
    }

    fn decode(
        &self,
        request: &DecodeRequest<'_>,
        _headers: &HeaderMultimap,
        body: &mut dyn Read,
    ) -> DecodeResult<Entity> {
        let ascii = match request.media_type.charset() {
            None => false,
            Some(cs) if cs.eq_ignore_ascii_case("utf-8") => false,
            Some(cs) if cs.eq_ignore_ascii_case("us-ascii") => true,
            Some(cs) => {
                return Err(DecodeError::InvalidText(format!("unsupported charset {}", cs)));
            }
        };

        let mut buf = Vec::new();
        body.read_to_end(&mut buf)?;
        if ascii {
            if let Some(pos) = buf.iter().position(|b| !b.is_ascii()) {
                return Err(DecodeError::InvalidText(format!("non-ASCII byte at offset {}", pos)));
            }
        }
        let text = String::from_utf8(buf).map_err(|e| DecodeError::InvalidText(e.to_string()))?;
        Ok(Entity::new(text))
    }
}

/// Reads any body into a `Vec<u8>`.
#[derive(Debug)]
pub struct BytesDecoder {
    consumes: Vec<MediaType>,
}

impl BytesDecoder {
    pub fn new() -> Self {
        Self {
            consumes: vec![MediaType::wildcard()],
        }
    }
}

impl Default for BytesDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyDecoder for BytesDecoder {
    fn name(&self) -> &str {
        "bytes"
    }

    fn consumes(&self) -> &[MediaType] {
        &self.consumes
    }

    fn can_decode(&self, request: &DecodeRequest<'_>) -> bool {
        request.class.is::<Vec<u8>>()
    }

    fn decode(
        &self,
        _request: &DecodeRequest<'_>,
        _headers: &HeaderMultimap,
        body: &mut dyn Read,
    ) -> DecodeResult<Entity> {
        let mut buf = Vec::new();
        body.read_to_end(&mut buf)?;
        Ok(Entity::new(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        id: i64,
    }

    fn decode_with(
        decoder: &dyn BodyDecoder,
        class: TypeKey,
        content_type: &str,
        body: &[u8],
    ) -> DecodeResult<Entity> {
        let mt = MediaType::parse(content_type).unwrap();
        let request = DecodeRequest::new(class, &mt);
        assert!(decoder.can_decode(&request), "{} should accept {}", decoder.name(), content_type);
        decoder.decode(&request, &HeaderMultimap::new(), &mut Cursor::new(body.to_vec()))
    }

    #[test]
    fn test_json_decoder() {
        let decoder = JsonDecoder::<Record>::new();
        let entity = decode_with(&decoder, TypeKey::of::<Record>(), "application/json", br#"{"id":7}"#).unwrap();
        assert_eq!(entity.downcast_ref::<Record>(), Some(&Record { id: 7 }));
    }

    #[test]
    fn test_json_decoder_suffix_and_wildcard() {
        let decoder = JsonDecoder::<Record>::new();
        decode_with(&decoder, TypeKey::of::<Record>(), "application/problem+json", br#"{"id":1}"#).unwrap();
        decode_with(&decoder, TypeKey::of::<Record>(), "*/*", br#"{"id":2}"#).unwrap();

        let text = MediaType::parse("text/plain").unwrap();
        assert!(!decoder.can_decode(&DecodeRequest::new(TypeKey::of::<Record>(), &text)));
        let json = MediaType::application_json();
        assert!(!decoder.can_decode(&DecodeRequest::new(TypeKey::of::<String>(), &json)));
    }

    #[test]
    fn test_json_decoder_malformed() {
        let decoder = JsonDecoder::<Record>::new();
        let err = decode_with(&decoder, TypeKey::of::<Record>(), "application/json", b"{\"id\":").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_text_decoder() {
        let decoder = TextDecoder::new();
        let entity = decode_with(&decoder, TypeKey::of::<String>(), "text/plain; charset=UTF-8", "héllo".as_bytes()).unwrap();
        assert_eq!(entity.downcast_ref::<String>().map(String::as_str), Some("héllo"));

        let err = decode_with(&decoder, TypeKey::of::<String>(), "text/plain", &[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidText(_)));

        let err = decode_with(&decoder, TypeKey::of::<String>(), "text/plain; charset=latin1", b"x").unwrap_err();
        assert!(err.to_string().contains("latin1"));
    }

    #[test]
    fn test_text_decoder_us_ascii() {
        let decoder = TextDecoder::new();
        let entity = decode_with(&decoder, TypeKey::of::<String>(), "text/plain; charset=US-ASCII", b"plain").unwrap();
        assert_eq!(entity.downcast_ref::<String>().map(String::as_str), Some("plain"));

        let err = decode_with(&decoder, TypeKey::of::<String>(), "text/plain; charset=us-ascii", "héllo".as_bytes())
            .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidText(ref msg) if msg.contains("offset 1")));
    }

    #[test]
    fn test_json_decoder_ranks_suffix_as_exact() {
        let decoder = JsonDecoder::<Record>::new();
        assert_eq!(decoder.rank(&MediaType::parse("application/problem+json").unwrap()), 2);
        assert_eq!(decoder.rank(&MediaType::application_json()), 2);
        assert_eq!(decoder.rank(&MediaType::wildcard()), 2);
        assert_eq!(decoder.rank(&MediaType::parse("text/plain").unwrap()), 0);
    }

    #[test]
    fn test_bytes_decoder() {
        let decoder = BytesDecoder::new();
        let entity = decode_with(&decoder, TypeKey::of::<Vec<u8>>(), "image/png", &[1, 2, 3]).unwrap();
        assert_eq!(entity.downcast_ref::<Vec<u8>>(), Some(&vec![1, 2, 3]));
        assert_eq!(decoder.rank(&MediaType::application_json()), 0);
    }
}
