use serde::Serialize;
use time::format_description::well_known::Iso8601;

use crate::domain::envelope::{AuthOutcome, Envelope};

#[derive(Debug, Serialize)]
pub struct EnvelopeDTO<'a> {
    pub status: &'a str,
    pub message: &'a str,
    pub timestamp: String,
}

impl<'a> From<&'a Envelope> for EnvelopeDTO<'a> {
    fn from(value: &'a Envelope) -> Self {
        let timestamp = value
            .received_at
            .format(&Iso8601::DEFAULT)
            .unwrap_or_else(|_| value.received_at.unix_timestamp().to_string());

        Self {
            status: value.status,
            message: &value.message,
            timestamp,
        }
    }
}

/// `{"message": ...}` body used by the auth route and error replies.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct MessageDTO<'a> {
    pub message: &'a str,
}

impl From<AuthOutcome> for MessageDTO<'static> {
    fn from(value: AuthOutcome) -> Self {
        Self {
            message: value.message(),
        }
    }
}
