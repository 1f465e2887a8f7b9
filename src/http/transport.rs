//! Conversions from transport responses into [`RawResponse`].

use crate::client::ClientResult;
use crate::decoding::types::DecodeError;
use crate::http::headers::HeaderMultimap;
use crate::http::response::RawResponse;

/// Buffer a reqwest response into a raw response.
///
/// Streaming is not supported; the body is read to completion before the
/// blocking decode pipeline sees it.
pub async fn from_reqwest(response: reqwest::Response) -> ClientResult<RawResponse> {
    let status = response.status().as_u16();
    let headers = HeaderMultimap::from(response.headers());
    let body = response.bytes().await?;

    tracing::debug!(status, body_len = body.len(), "Buffered transport response");

    Ok(RawResponse::from_bytes(status, headers, body.to_vec())?)
}

impl TryFrom<http::Response<Vec<u8>>> for RawResponse {
    type Error = DecodeError;

    fn try_from(response: http::Response<Vec<u8>>) -> Result<Self, Self::Error> {
        let (parts, body) = response.into_parts();
        RawResponse::from_bytes(parts.status.as_u16(), HeaderMultimap::from(&parts.headers), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_response() {
        let response = http::Response::builder()
            .status(418)
            .header("content-type", "text/plain")
            .header("x-trace", "a")
            .header("x-trace", "b")
            .body(b"short and stout".to_vec())
            .unwrap();

        let raw = RawResponse::try_from(response).unwrap();
        assert_eq!(raw.status().as_u16(), 418);
        assert_eq!(raw.headers().content_type(), Some("text/plain"));
        assert_eq!(raw.headers().get("X-Trace"), ["a", "b"]);
        assert!(raw.has_body());
    }
}
