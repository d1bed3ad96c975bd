use time::OffsetDateTime;

use crate::application::adapters::{EnvelopeDTO, MessageDTO};
use crate::application::body::decode_object;
use crate::application::inspection;
use crate::domain::envelope::{AuthOutcome, Envelope, AUTH_ROUTE};
use crate::domain::errors::RequestError;
use crate::infrastructure::server_impl::request::InspectedRequest;
use crate::infrastructure::server_impl::response::{JsonResponse, Response, StatusCode};
use crate::infrastructure::server_impl::server::{Header, Method};

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, OPTIONS";

/// What handling one request produced: the response and, unless suppressed, its inspection log.
#[derive(Debug)]
pub struct Routed {
    pub inspection: Option<String>,
    pub response: Response,
}

pub fn match_routes(request: &InspectedRequest<'_>, now: OffsetDateTime) -> Routed {
    let response = match request.method {
        // preflights are answered without being inspected
        Method::OPTIONS => {
            return Routed {
                inspection: None,
                response: options_route(),
            }
        }
        Method::POST if request.target == AUTH_ROUTE => auth_route(request),
        Method::POST => envelope_route(request.method, StatusCode::Created, now),
        Method::GET | Method::PUT | Method::DELETE | Method::PATCH => {
            envelope_route(request.method, StatusCode::Ok, now)
        }
    };

    Routed {
        inspection: Some(inspection::render(request, now)),
        response,
    }
}

pub fn envelope_route(method: Method, status_code: StatusCode, now: OffsetDateTime) -> Response {
    let envelope = Envelope::success(method.as_str(), now);
    JsonResponse::from(status_code, EnvelopeDTO::from(&envelope)).into_inner()
}

/// Auth simulation: a single hardcoded password compared against the JSON body.
pub fn auth_route(request: &InspectedRequest<'_>) -> Response {
    let credentials = match decode_object(request.body.unwrap_or_default()) {
        Ok(credentials) => credentials,
        Err(_) => return message_response(StatusCode::BadRequest, "Bad Request"),
    };

    let outcome = AuthOutcome::check(&credentials);
    let status_code = match outcome {
        AuthOutcome::Authenticated => StatusCode::Ok,
        AuthOutcome::InvalidPassword => StatusCode::Unauthorized,
    };
    JsonResponse::from(status_code, MessageDTO::from(outcome)).into_inner()
}

pub fn options_route() -> Response {
    Response::from_status_code(StatusCode::NoContent, None)
        .with_header(Header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
        .with_header(Header::ACCESS_CONTROL_ALLOW_HEADERS, "*")
}

fn message_response(status_code: StatusCode, message: &str) -> Response {
    JsonResponse::from(status_code, MessageDTO { message }).into_inner()
}

/// Reply for a request that never made it to a handler.
pub fn error_response(error: &RequestError) -> Response {
    match error {
        RequestError::UnsupportedMethod(_) => {
            message_response(StatusCode::NotImplemented, &error.to_string())
        }
        RequestError::TooManyHeaders | RequestError::HeadersTooLarge => message_response(
            StatusCode::RequestHeaderFieldsTooLarge,
            "Request Header Fields Too Large",
        ),
        RequestError::PayloadTooLarge => {
            message_response(StatusCode::PayloadTooLarge, "Payload Too Large")
        }
        RequestError::Malformed
        | RequestError::InvalidContentLength
        | RequestError::ConnectionClosed
        | RequestError::Io(_) => message_response(StatusCode::BadRequest, "Bad Request"),
    }
}
