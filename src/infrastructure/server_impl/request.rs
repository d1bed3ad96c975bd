use std::borrow::Cow;

use enum_map::EnumMap;

use crate::infrastructure::server_impl::server::{Header, Method};

/// One request as read off the wire, borrowed from the connection buffer.
#[derive(Debug)]
pub struct InspectedRequest<'a> {
    pub method: Method,
    /// Raw request target, query and all.
    pub target: &'a str,
    /// Every header in wire order, duplicates included.
    pub headers: Vec<(&'a str, Cow<'a, str>)>,
    pub known: EnumMap<Header, Option<&'a str>>,
    /// Parsed `Content-Length`, present whenever the header was sent.
    pub content_length: Option<usize>,
    /// Only set for a nonzero `Content-Length`.
    pub body: Option<&'a [u8]>,
}

impl<'a> InspectedRequest<'a> {
    pub fn header(&self, header: Header) -> Option<&'a str> {
        self.known[header]
    }

    pub fn is_json(&self) -> bool {
        self.header(Header::CONTENT_TYPE)
            .is_some_and(|ct| ct.contains("application/json"))
    }
}
