//! Client subsystem.
//!
//! # Data Flow
//! ```text
//! ClientConfig + Arc<DecoderRegistry>
//!     → web_client.rs (reqwest client, GET relative to endpoint)
//!     → http::transport (buffer into RawResponse)
//!     → decoding::reader (typed response or later entity extraction)
//!
//! endpoint.rs carries the client-scoped registry used by
//! ResponseDecoder::extract_entity.
//! ```

pub mod endpoint;
pub mod web_client;

pub use endpoint::Endpoint;
pub use web_client::{Client, ClientError, ClientResult};
