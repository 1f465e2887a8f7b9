//! Media type parsing and matching.
//!
//! # Design Decisions
//! - Parsing is delegated to the `mime` crate
//! - `*` in either position matches anything (wildcard compatibility)
//! - Specificity ranks `type/subtype` above `type/*` above `*/*`

use std::fmt;
use std::str::FromStr;

use mime::Mime;

use crate::decoding::types::DecodeError;

/// A parsed `Content-Type` value.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaType(Mime);

impl MediaType {
    /// Parse a header value such as `application/json; charset=utf-8`.
    pub fn parse(value: &str) -> Result<Self, DecodeError> {
        value
            .trim()
            .parse::<Mime>()
            .map(Self)
            .map_err(|_| DecodeError::UnsupportedMediaType {
                content_type: value.to_string(),
            })
    }

    /// `*/*`
    pub fn wildcard() -> Self {
        Self(mime::STAR_STAR)
    }

    pub fn application_json() -> Self {
        Self(mime::APPLICATION_JSON)
    }

    /// `text/*`
    pub fn any_text() -> Self {
        Self(mime::TEXT_STAR)
    }

    pub fn type_(&self) -> &str {
        self.0.type_().as_str()
    }

    pub fn subtype(&self) -> &str {
        self.0.subtype().as_str()
    }

    /// Structured syntax suffix, e.g. `json` for `application/problem+json`.
    pub fn suffix(&self) -> Option<&str> {
        self.0.suffix().map(|s| s.as_str())
    }

    /// `type/subtype` without parameters.
    pub fn essence(&self) -> &str {
        self.0.essence_str()
    }

    pub fn charset(&self) -> Option<&str> {
        self.0.get_param(mime::CHARSET).map(|c| c.as_str())
    }

    pub fn is_wildcard_type(&self) -> bool {
        self.type_() == "*"
    }

    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype() == "*"
    }

    /// 0 for `*/*`, 1 for `type/*`, 2 for a concrete type.
    pub fn specificity(&self) -> u8 {
        if self.is_wildcard_type() {
            0
        } else if self.is_wildcard_subtype() {
            1
        } else {
            2
        }
    }

    /// Returns true if either side's wildcards cover the other.
    pub fn is_compatible(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() || other.is_wildcard_type() {
            return true;
        }
        if !self.type_().eq_ignore_ascii_case(other.type_()) {
            return false;
        }
        self.is_wildcard_subtype()
            || other.is_wildcard_subtype()
            || self.subtype().eq_ignore_ascii_case(other.subtype())
    }
}

impl FromStr for MediaType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
