use bytes::Bytes;
use compact_str::CompactString;
use derive_more::Deref;
use fnv::FnvHashMap;
use serde::Serialize;
use std::fmt::Write;
use strum::{EnumMessage, EnumString, IntoStaticStr};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::infrastructure::server_impl::server::Header;

pub const SERVER_NAME: &str = concat!("request-inspector/", env!("CARGO_PKG_VERSION"));

#[allow(clippy::upper_case_acronyms, non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoStaticStr, EnumString, EnumMessage)]
pub enum StatusCode {
    #[strum(serialize = "200", message = "OK")]
    Ok,
    #[strum(serialize = "201", message = "Created")]
    Created,
    #[strum(serialize = "204", message = "No Content")]
    NoContent,
    #[strum(serialize = "400", message = "Bad Request")]
    BadRequest,
    #[strum(serialize = "401", message = "Unauthorized")]
    Unauthorized,
    #[strum(serialize = "413", message = "Payload Too Large")]
    PayloadTooLarge,
    #[strum(serialize = "431", message = "Request Header Fields Too Large")]
    RequestHeaderFieldsTooLarge,
    #[strum(serialize = "501", message = "Not Implemented")]
    NotImplemented,
}

impl StatusCode {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn reason(self) -> &'static str {
        self.get_message().unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct Response {
    pub headers: FnvHashMap<Header, CompactString>,
    pub status_code: StatusCode,
    pub body: Option<String>,
}

impl Response {
    pub fn from_status_code(value: StatusCode, body: impl Into<Option<String>>) -> Self {
        let mut headers = FnvHashMap::default();
        headers.insert(Header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".into());

        Self {
            headers,
            status_code: value,
            body: body.into(),
        }
    }

    pub fn with_header(mut self, header: Header, value: impl Into<CompactString>) -> Self {
        self.headers.insert(header, value.into());
        self
    }

    pub fn header(&self, header: Header) -> Option<&str> {
        self.headers.get(&header).map(CompactString::as_str)
    }
}

fn http_date(now: OffsetDateTime) -> Option<String> {
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    now.format(&format).ok()
}

impl Response {
    /// Serializes status line, headers and body. One request is served per connection, so
    /// every response announces `Connection: close`.
    pub fn into_http(self) -> Bytes {
        let mut buf = String::with_capacity(256 + self.body.as_ref().map_or(0, String::len));
        let status_code = self.status_code.as_str();
        let status_message = self.status_code.reason();

        // writing into a String cannot fail
        let _ = write!(buf, "HTTP/1.1 {status_code} {status_message}\r\n");
        if let Some(date) = http_date(OffsetDateTime::now_utc()) {
            let _ = write!(buf, "{}: {date}\r\n", Header::DATE.as_str());
        }
        let _ = write!(buf, "{}: {SERVER_NAME}\r\n", Header::SERVER.as_str());
        let _ = write!(buf, "{}: close\r\n", Header::CONNECTION.as_str());

        for (header, value) in &self.headers {
            let _ = write!(buf, "{}: {value}\r\n", header.as_str());
        }

        match self.body {
            Some(body) => {
                let length = body.len();
                let _ = write!(
                    buf,
                    "Content-Type: application/json; charset=utf-8\r\n\
                     Content-Length: {length}\r\n\r\n{body}"
                );
            }
            // a 204 must not carry a Content-Length
            None if self.status_code == StatusCode::NoContent => buf.push_str("\r\n"),
            None => buf.push_str("Content-Length: 0\r\n\r\n"),
        }

        buf.into()
    }
}

#[derive(Debug, Deref)]
pub struct JsonResponse(pub Response);

impl JsonResponse {
    /// Body is pretty-printed with two-space indentation; non-ASCII stays unescaped.
    pub fn from<T>(status_code: StatusCode, body: T) -> Self
    where
        T: Serialize,
    {
        let body = serde_json::to_string_pretty(&body).ok();
        Self(Response::from_status_code(status_code, body))
    }

    pub fn into_inner(self) -> Response {
        self.0
    }
}
