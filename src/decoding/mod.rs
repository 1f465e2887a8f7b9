//! Entity decoding subsystem.
//!
//! # Data Flow
//! ```text
//! RawResponse (status, headers, body stream)
//!     → reader.rs (copy status + headers into builder)
//!     → [no entity type configured] → TypedResponse without entity
//!     → media type from Content-Type (or */*)
//!     → registry.rs (find decoder for class, generic type, annotations, media type)
//!     → decoder.rs / builtin.rs (decode body stream)
//!     → TypedResponse with entity
//! ```
//!
//! # Design Decisions
//! - Decoders are trait objects queried by predicate, first best match wins
//! - The body stream is read at most once and only when non-empty
//! - No caching: every decode re-resolves its decoder

pub mod builtin;
pub mod decoder;
pub mod reader;
pub mod registry;
pub mod types;

pub use builtin::{BytesDecoder, JsonDecoder, TextDecoder};
pub use decoder::{BodyDecoder, DecodeRequest, MessageContext};
pub use reader::ResponseDecoder;
pub use registry::DecoderRegistry;
pub use types::{Annotation, DecodeError, DecodeResult, Entity, EntityType, TypeKey};
