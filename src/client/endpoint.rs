//! Client endpoint: target address plus the client-scoped decoder registry.

use std::sync::Arc;

use url::Url;

use crate::decoding::registry::DecoderRegistry;

#[derive(Debug, Clone)]
pub struct Endpoint {
    address: Url,
    registry: Arc<DecoderRegistry>,
}

impl Endpoint {
    pub fn new(address: Url, registry: Arc<DecoderRegistry>) -> Self {
        Self { address, registry }
    }

    /// Base URL for relative request paths.
    pub fn address(&self) -> &Url {
        &self.address
    }

    /// Decoders available to this endpoint's responses.
    pub fn registry(&self) -> &Arc<DecoderRegistry> {
        &self.registry
    }

    /// Resolve `path` against the endpoint address. Absolute URLs pass through.
    pub fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        self.address.join(path)
    }
}
