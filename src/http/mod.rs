//! HTTP response model.
//!
//! # Data Flow
//! ```text
//! reqwest / http::Response
//!     → transport.rs (buffer body, collect headers)
//!     → response.rs RawResponse (status, headers.rs multimap, body stream)
//!     → decoding::reader
//!     → response.rs TypedResponse (built once via ResponseBuilder)
//! ```

pub mod headers;
pub mod media;
pub mod response;
pub mod transport;

pub use headers::HeaderMultimap;
pub use media::MediaType;
pub use response::{BodyStream, RawResponse, ResponseBuilder, ResponseEntity, TypedResponse};
