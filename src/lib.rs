//! Typed HTTP response reader.
//!
//! Turns a wire-level response (status, headers, body stream) into a
//! [`TypedResponse`], decoding the entity through a pluggable
//! [`DecoderRegistry`].

pub mod client;
pub mod config;
pub mod decoding;
pub mod http;
pub mod observability;

pub use client::{Client, Endpoint};
pub use config::ReaderConfig;
pub use decoding::{DecodeError, DecoderRegistry, EntityType, ResponseDecoder, TypeKey};
pub use crate::http::{HeaderMultimap, MediaType, RawResponse, TypedResponse};
