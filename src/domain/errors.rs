//! Domain Errors

use std::fmt;

/// Failures while framing or parsing a single request off the wire.
///
/// Every variant is scoped to the connection it happened on.
#[derive(Debug)]
pub enum RequestError {
    /// Request line or headers could not be parsed.
    Malformed,
    TooManyHeaders,
    HeadersTooLarge,
    InvalidContentLength,
    PayloadTooLarge,
    /// A syntactically valid method the inspector has no handler for.
    UnsupportedMethod(String),
    /// Peer went away before a full request arrived.
    ConnectionClosed,
    Io(std::io::Error),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => f.write_str("malformed request"),
            Self::TooManyHeaders => f.write_str("too many headers"),
            Self::HeadersTooLarge => f.write_str("header section too large"),
            Self::InvalidContentLength => f.write_str("invalid content-length"),
            Self::PayloadTooLarge => f.write_str("payload too large"),
            Self::UnsupportedMethod(method) => write!(f, "Unsupported method ('{method}')"),
            Self::ConnectionClosed => f.write_str("connection closed before request completed"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RequestError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Why a request body could not be read as a JSON object.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BodyError {
    Empty,
    InvalidJson,
    NotAnObject,
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty body"),
            Self::InvalidJson => f.write_str("body is not valid json"),
            Self::NotAnObject => f.write_str("body is not a json object"),
        }
    }
}

impl std::error::Error for BodyError {}
