use std::str::FromStr;

use enum_map::{Enum, EnumMap};
use httparse::{ParserConfig, Status};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::domain::errors::RequestError;
use crate::infrastructure::server_impl::request::InspectedRequest;

/// Header count above which a request is rejected.
pub const MAX_HEADERS: usize = 100;
/// Request line plus headers.
pub const MAX_HEAD_LEN: usize = 64 * 1024;
pub const MAX_BODY_LEN: usize = 16 * 1024 * 1024;

/// Headers the inspector reads or writes by name. Lookups are case-insensitive.
#[allow(clippy::upper_case_acronyms, non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Enum, IntoStaticStr, EnumIter)]
#[non_exhaustive]
pub enum Header {
    #[strum(serialize = "Access-Control-Allow-Headers")]
    ACCESS_CONTROL_ALLOW_HEADERS,
    #[strum(serialize = "Access-Control-Allow-Methods")]
    ACCESS_CONTROL_ALLOW_METHODS,
    #[strum(serialize = "Access-Control-Allow-Origin")]
    ACCESS_CONTROL_ALLOW_ORIGIN,
    #[strum(serialize = "Connection")]
    CONNECTION,
    #[strum(serialize = "Content-Length")]
    CONTENT_LENGTH,
    #[strum(serialize = "Content-Type")]
    CONTENT_TYPE,
    #[strum(serialize = "Date")]
    DATE,
    #[strum(serialize = "Server")]
    SERVER,
}

impl Header {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl FromStr for Header {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter().find(|c| unicase::eq(c.as_str(), s)).ok_or(())
    }
}

#[allow(clippy::upper_case_acronyms, non_camel_case_types)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString, IntoStaticStr, EnumIter, Display)]
pub enum Method {
    DELETE,
    GET,
    OPTIONS,
    PATCH,
    POST,
    PUT,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

fn parse_head<'h, 'b>(
    req: &mut httparse::Request<'h, 'b>,
    buf: &'b [u8],
) -> Result<Option<usize>, RequestError> {
    match ParserConfig::default().parse_request(req, buf) {
        Ok(Status::Complete(len)) if len > MAX_HEAD_LEN => Err(RequestError::HeadersTooLarge),
        Ok(Status::Complete(len)) => Ok(Some(len)),
        Ok(Status::Partial) if buf.len() > MAX_HEAD_LEN => Err(RequestError::HeadersTooLarge),
        Ok(Status::Partial) => Ok(None),
        Err(httparse::Error::TooManyHeaders) => Err(RequestError::TooManyHeaders),
        Err(_) => Err(RequestError::Malformed),
    }
}

/// First `Content-Length` header, if any.
fn content_length(headers: &[httparse::Header<'_>]) -> Result<Option<usize>, RequestError> {
    let Some(header) = headers
        .iter()
        .find(|h| unicase::eq(h.name, Header::CONTENT_LENGTH.as_str()))
    else {
        return Ok(None);
    };

    let length = std::str::from_utf8(header.value)
        .ok()
        .and_then(|v| usize::from_str(v.trim()).ok())
        .ok_or(RequestError::InvalidContentLength)?;

    if length > MAX_BODY_LEN {
        return Err(RequestError::PayloadTooLarge);
    }
    Ok(Some(length))
}

/// Total length of the request (head plus declared body) once its head has fully arrived.
///
/// Returns `Ok(None)` while more bytes are needed to see the end of the header section.
pub fn frame_len(buf: &[u8]) -> Result<Option<usize>, RequestError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut headers);

    let Some(head_len) = parse_head(&mut req, buf)? else {
        return Ok(None);
    };
    let body_len = content_length(req.headers)?.unwrap_or(0);
    Ok(Some(head_len + body_len))
}

/// Returns an [InspectedRequest] borrowing from `request`.
///
/// The buffer is expected to hold a complete head; a body shorter than its declared
/// `Content-Length` is truncated to what is available.
pub fn parse_http(request: &[u8]) -> Result<InspectedRequest<'_>, RequestError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut headers);

    let head_len = parse_head(&mut req, request)?.ok_or(RequestError::Malformed)?;
    let method_name = req.method.ok_or(RequestError::Malformed)?;
    let method = Method::from_str(method_name)
        .map_err(|_| RequestError::UnsupportedMethod(method_name.to_string()))?;
    let target = req.path.ok_or(RequestError::Malformed)?;
    let content_length = content_length(req.headers)?;

    let mut known: EnumMap<Header, Option<&str>> = EnumMap::default();
    for header in req.headers.iter() {
        let Ok(name) = Header::from_str(header.name) else {
            continue;
        };
        if known[name].is_none() {
            known[name] = std::str::from_utf8(header.value).ok();
        }
    }

    let headers = req
        .headers
        .iter()
        .map(|h| (h.name, String::from_utf8_lossy(h.value)))
        .collect();

    let body = match content_length {
        Some(len) if len > 0 => {
            let end = (head_len + len).min(request.len());
            Some(&request[head_len..end])
        }
        _ => None,
    };

    Ok(InspectedRequest {
        method,
        target,
        headers,
        known,
        content_length,
        body,
    })
}
