//! Functions used to send and consume C2DM http messages.
//! This module can be used to build custom clients.

use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, RETRY_AFTER};
use http::{HeaderMap, Method, Request, StatusCode, Uri};
use url::form_urlencoded;

use crate::error::{BackendError, C2dmError, RetryAfter};
use crate::message::Message;
use crate::options::ClientOptions;
use crate::response::DeliveryReceipt;

/// Builds the form-encoded POST request for one message.
///
/// The message is expected to be valid already; this function only shapes
/// the wire format.
///
/// # Example
///
/// ```
/// # use c2dm::{ClientOptions, Message, C2DM_SEND_URI};
/// # use c2dm::request_builder::build_request;
/// let message = Message::new("device-token", "news", [("headline", "hello")]);
///
/// let request = build_request(C2DM_SEND_URI, "auth-token", &ClientOptions::default(), &message).unwrap();
///
/// assert_eq!("GoogleLogin auth=auth-token", request.headers()["Authorization"].to_str().unwrap());
/// ```
pub fn build_request(
    endpoint: &str,
    token: &str,
    options: &ClientOptions,
    message: &Message,
) -> Result<Request<Vec<u8>>, C2dmError> {
    let uri: Uri = endpoint.parse()?;

    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("registration_id", message.registration_id());
    form.append_pair("collapse_key", message.collapse_key());

    for (k, v) in message.data() {
        form.append_pair(&format!("data.{}", k), v);
    }

    if options.delay_while_idle {
        form.append_pair("delay_while_idle", "1");
    }

    let body = form.finish().into_bytes();

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("GoogleLogin auth={}", token))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded;charset=UTF-8")
        .header(CONTENT_LENGTH, body.len())
        .body(body)?;

    Ok(request)
}

/// Parses the response from the C2DM backend, and will return `Err` if the
/// message was not accepted.
///
/// A 503 or an unreadable body is a transient `ServerUnavailable`, a 401 is
/// an `InvalidAuthToken`, and an `Error=<code>` body is a `Backend` error.
/// Any other single `key=value` body counts as delivered.
pub fn parse_response(
    response_status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<DeliveryReceipt, C2dmError> {
    let retry_after = headers
        .get(RETRY_AFTER)
        .and_then(|ra| ra.to_str().ok())
        .and_then(RetryAfter::from_str);

    match response_status {
        StatusCode::SERVICE_UNAVAILABLE => return Err(C2dmError::ServerUnavailable { retry_after }),
        StatusCode::UNAUTHORIZED => return Err(C2dmError::InvalidAuthToken),
        _ => (),
    }

    let body = match std::str::from_utf8(body) {
        Ok(body) => body.trim(),
        Err(_) => return Err(C2dmError::ServerUnavailable { retry_after }),
    };

    let mut parts = body.split('=');

    let (key, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => (key.trim(), value.trim()),
        _ => return Err(C2dmError::ServerUnavailable { retry_after }),
    };

    if key.eq_ignore_ascii_case("error") {
        return Err(C2dmError::Backend(BackendError::from(value)));
    }

    Ok(DeliveryReceipt {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http::header::RETRY_AFTER;
    use http::{HeaderMap, HeaderValue, Method, StatusCode};
    use regex::Regex;
    use url::form_urlencoded;

    use crate::clients::request_builder::*;
    use crate::error::{BackendError, C2dmError};
    use crate::message::Message;
    use crate::options::ClientOptions;
    use crate::response::DeliveryReceipt;

    fn form_fields(body: &[u8]) -> Vec<(String, String)> {
        form_urlencoded::parse(body).into_owned().collect()
    }

    fn parse(status: StatusCode, body: &str) -> Result<DeliveryReceipt, C2dmError> {
        parse_response(status, &HeaderMap::new(), body.as_bytes())
    }

    #[test]
    fn builds_a_correct_request() {
        let message = Message::new("device-token", "news", [("headline", "hello world"), ("count", "3")]);

        let request = build_request(crate::C2DM_SEND_URI, "secret", &ClientOptions::default(), &message).unwrap();

        let authorization = request.headers().get("Authorization").unwrap().to_str().unwrap();
        let content_type = request.headers().get("Content-Type").unwrap().to_str().unwrap();
        let length = request.headers().get("Content-Length").unwrap().to_str().unwrap();

        assert_eq!(&Method::POST, request.method());
        assert_eq!(Some("android.apis.google.com"), request.uri().host());
        assert_eq!("/c2dm/send", request.uri().path());
        assert!(Regex::new(r"^GoogleLogin auth=\S+$").unwrap().is_match(authorization));
        assert!(content_type.starts_with("application/x-www-form-urlencoded"));
        assert_eq!(request.body().len().to_string(), length);

        assert_eq!(
            vec![
                (String::from("registration_id"), String::from("device-token")),
                (String::from("collapse_key"), String::from("news")),
                (String::from("data.count"), String::from("3")),
                (String::from("data.headline"), String::from("hello world")),
            ],
            form_fields(request.body())
        );
    }

    #[test]
    fn adds_delay_while_idle_only_when_enabled() {
        let message = Message::new("device-token", "news", [("headline", "hello")]);

        let options = ClientOptions {
            delay_while_idle: true,
            ..ClientOptions::default()
        };

        let delayed = build_request(crate::C2DM_SEND_URI, "secret", &options, &message).unwrap();
        let plain = build_request(crate::C2DM_SEND_URI, "secret", &ClientOptions::default(), &message).unwrap();

        assert!(form_fields(delayed.body()).contains(&(String::from("delay_while_idle"), String::from("1"))));
        assert!(!form_fields(plain.body()).iter().any(|(k, _)| k == "delay_while_idle"));
    }

    #[test]
    fn rejects_an_invalid_endpoint() {
        let message = Message::new("device-token", "news", [("headline", "hello")]);

        assert!(matches!(
            build_request("not a uri", "secret", &ClientOptions::default(), &message),
            Err(C2dmError::InvalidUri)
        ));
    }

    #[test]
    fn parses_a_successful_response_correctly() {
        let receipt = parse(StatusCode::OK, "id=1:2345\n").unwrap();

        assert_eq!(Some("1:2345"), receipt.message_id());
    }

    #[test]
    fn parses_a_service_unavailable_response_regardless_of_body() {
        assert!(matches!(
            parse(StatusCode::SERVICE_UNAVAILABLE, "id=1:2345"),
            Err(C2dmError::ServerUnavailable { retry_after: None })
        ));
    }

    #[test]
    fn reads_retry_after_from_a_service_unavailable_response() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));

        let result = parse_response(StatusCode::SERVICE_UNAVAILABLE, &headers, b"");

        assert_eq!(Some(Duration::from_secs(30)), result.unwrap_err().retry_after());
    }

    #[test]
    fn parses_an_unauthorized_response_correctly() {
        assert!(matches!(
            parse(StatusCode::UNAUTHORIZED, "Error=NotRegistered"),
            Err(C2dmError::InvalidAuthToken)
        ));
    }

    #[test]
    fn parses_a_not_registered_response_correctly() {
        assert!(matches!(
            parse(StatusCode::OK, "Error=NotRegistered"),
            Err(C2dmError::Backend(BackendError::NotRegistered))
        ));
    }

    #[test]
    fn matches_the_error_key_case_insensitively() {
        assert!(matches!(
            parse(StatusCode::OK, "error=QuotaExceeded"),
            Err(C2dmError::Backend(BackendError::QuotaExceeded))
        ));
    }

    #[test]
    fn parses_an_unknown_backend_code_correctly() {
        match parse(StatusCode::OK, "Error=SomeFutureCode") {
            Err(C2dmError::Backend(BackendError::Other(code))) => assert_eq!("SomeFutureCode", code),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn parses_an_empty_body_as_unavailable() {
        assert!(matches!(
            parse(StatusCode::OK, ""),
            Err(C2dmError::ServerUnavailable { .. })
        ));
    }

    #[test]
    fn parses_a_body_with_too_many_parts_as_unavailable() {
        assert!(matches!(
            parse(StatusCode::OK, "id=1=2"),
            Err(C2dmError::ServerUnavailable { .. })
        ));

        assert!(matches!(
            parse(StatusCode::OK, "<html>oops</html>"),
            Err(C2dmError::ServerUnavailable { .. })
        ));
    }

    #[test]
    fn parses_a_non_utf8_body_as_unavailable() {
        assert!(matches!(
            parse_response(StatusCode::OK, &HeaderMap::new(), &[0xff, b'=', 0xfe]),
            Err(C2dmError::ServerUnavailable { .. })
        ));
    }
}
