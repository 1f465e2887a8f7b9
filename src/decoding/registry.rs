//! Decoder registry.
//!
//! # Responsibilities
//! - Store decoders in registration order
//! - Find the decoder for a (class, generic type, annotations, media type) request
//! - Return an explicit `None` rather than failing when nothing matches
//!
//! # Design Decisions
//! - O(n) scan over registered decoders (registries are small)
//! - Most specific consumed media type wins; ties go to the first registered
//! - Shared as `Arc<DecoderRegistry>`, immutable once handed out

use std::sync::Arc;

use crate::config::DecodingConfig;
use crate::decoding::builtin::{BytesDecoder, JsonDecoder, TextDecoder};
use crate::decoding::decoder::{BodyDecoder, DecodeRequest};

#[derive(Debug, Clone, Default)]
pub struct DecoderRegistry {
    decoders: Vec<Arc<dyn BodyDecoder>>,
}

impl DecoderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in decoders enabled in `config`.
    ///
    /// The JSON decoder targets `serde_json::Value`; typed records need their
    /// own `JsonDecoder<T>` registration.
    pub fn from_config(config: &DecodingConfig) -> Self {
        let mut registry = Self::new();
        if config.json {
            registry.register(JsonDecoder::<serde_json::Value>::new());
        }
        if config.text {
            registry.register(TextDecoder::new());
        }
        if config.bytes {
            registry.register(BytesDecoder::new());
        }
        registry
    }

    /// Append a decoder. Earlier registrations win ties.
    pub fn register(&mut self, decoder: impl BodyDecoder + 'static) -> &mut Self {
        self.register_arc(Arc::new(decoder))
    }

    pub fn register_arc(&mut self, decoder: Arc<dyn BodyDecoder>) -> &mut Self {
        tracing::debug!(decoder = decoder.name(), "Registered body decoder");
        self.decoders.push(decoder);
        self
    }

    /// Builder-style registration.
    pub fn with(mut self, decoder: impl BodyDecoder + 'static) -> Self {
        self.register(decoder);
        self
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decoders.iter().map(|d| d.name())
    }

    /// Find the best decoder for a request.
    pub fn find(&self, request: &DecodeRequest<'_>) -> Option<Arc<dyn BodyDecoder>> {
        let mut best: Option<(u8, &Arc<dyn BodyDecoder>)> = None;

        for decoder in &self.decoders {
            if !decoder.can_decode(request) {
                continue;
            }
            let rank = decoder.rank(request.media_type);
            // Strictly greater: the first registered keeps a tie
            match best {
                Some((best_rank, _)) if best_rank >= rank => {}
                _ => best = Some((rank, decoder)),
            }
        }

        best.map(|(_, decoder)| decoder.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    use crate::decoding::types::{DecodeResult, Entity, TypeKey};
    use crate::http::headers::HeaderMultimap;
    use crate::http::media::MediaType;

    /// Accepts one class for a fixed media type and yields its own tag.
    #[derive(Debug)]
    struct Tagged {
        tag: &'static str,
        class: TypeKey,
        consumes: Vec<MediaType>,
    }

    impl Tagged {
        fn new(tag: &'static str, media: &str) -> Self {
            Self::for_class(tag, media, TypeKey::of::<String>())
        }

        fn for_class(tag: &'static str, media: &str, class: TypeKey) -> Self {
            Self {
                tag,
                class,
                consumes: vec![MediaType::parse(media).unwrap()],
            }
        }
    }

    impl BodyDecoder for Tagged {
        fn name(&self) -> &str {
            self.tag
        }

        fn consumes(&self) -> &[MediaType] {
            &self.consumes
        }

        fn can_decode(&self, request: &DecodeRequest<'_>) -> bool {
            request.class == self.class && self.consumes[0].is_compatible(request.media_type)
        }

        fn decode(&self, _: &DecodeRequest<'_>, _: &HeaderMultimap, _: &mut dyn Read) -> DecodeResult<Entity> {
            Ok(Entity::new(self.tag.to_string()))
        }
    }

    fn find_name(registry: &DecoderRegistry, class: TypeKey, media: &str) -> Option<String> {
        let mt = MediaType::parse(media).unwrap();
        registry
            .find(&DecodeRequest::new(class, &mt))
            .map(|d| d.name().to_string())
    }

    #[test]
    fn test_empty_registry_finds_nothing() {
        let registry = DecoderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(find_name(&registry, TypeKey::of::<String>(), "text/plain"), None);
    }

    #[test]
    fn test_most_specific_media_type_wins() {
        let registry = DecoderRegistry::new()
            .with(Tagged::new("any", "*/*"))
            .with(Tagged::new("text", "text/*"))
            .with(Tagged::new("plain", "text/plain"));

        assert_eq!(find_name(&registry, TypeKey::of::<String>(), "text/plain").as_deref(), Some("plain"));
        assert_eq!(find_name(&registry, TypeKey::of::<String>(), "text/html").as_deref(), Some("text"));
        assert_eq!(find_name(&registry, TypeKey::of::<String>(), "image/png").as_deref(), Some("any"));
    }

    #[test]
    fn test_tie_goes_to_first_registered() {
        let registry = DecoderRegistry::new()
            .with(Tagged::new("first", "text/plain"))
            .with(Tagged::new("second", "text/plain"));

        assert_eq!(find_name(&registry, TypeKey::of::<String>(), "text/plain").as_deref(), Some("first"));
    }

    #[test]
    fn test_json_suffix_beats_earlier_catch_all() {
        let value = TypeKey::of::<serde_json::Value>();
        let registry = DecoderRegistry::new()
            .with(Tagged::for_class("catch-all", "*/*", value))
            .with(JsonDecoder::<serde_json::Value>::new());

        assert_eq!(find_name(&registry, value, "application/json").as_deref(), Some("json"));
        assert_eq!(find_name(&registry, value, "application/problem+json").as_deref(), Some("json"));
        assert_eq!(find_name(&registry, value, "text/plain").as_deref(), Some("catch-all"));
    }

    #[test]
    fn test_class_must_match() {
        let registry = DecoderRegistry::new().with(Tagged::new("plain", "text/plain"));
        assert_eq!(find_name(&registry, TypeKey::of::<u32>(), "text/plain"), None);
    }

    #[test]
    fn test_builtins_from_config() {
        let config = DecodingConfig::default();
        let registry = DecoderRegistry::from_config(&config);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["json", "text", "bytes"]);

        assert_eq!(
            find_name(&registry, TypeKey::of::<serde_json::Value>(), "application/json").as_deref(),
            Some("json")
        );
        assert_eq!(find_name(&registry, TypeKey::of::<String>(), "text/csv").as_deref(), Some("text"));
        assert_eq!(find_name(&registry, TypeKey::of::<Vec<u8>>(), "application/json").as_deref(), Some("bytes"));

        let config = DecodingConfig {
            text: false,
            ..DecodingConfig::default()
        };
        let registry = DecoderRegistry::from_config(&config);
        assert_eq!(find_name(&registry, TypeKey::of::<String>(), "text/csv"), None);
    }
}
