use std::convert::Infallible;
use std::str::FromStr;
use std::time::{Duration, SystemTime};
use std::{convert::From, error::Error, fmt, io::Error as IoError};

use http::uri::InvalidUri;

/// Error codes the C2DM backend reports in an `Error=<code>` response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Too many messages sent by the sender. Retry after a while.
    QuotaExceeded,
    /// Too many messages sent to this specific device. Retry after a while.
    DeviceQuotaExceeded,
    /// The request was missing a `registration_id`.
    MissingRegistration,
    /// The `registration_id` is malformed or unknown.
    InvalidRegistration,
    /// The sender account is not the one the device registered with.
    MismatchSenderId,
    /// The application was uninstalled or the registration expired. Stop
    /// sending to this `registration_id`.
    NotRegistered,
    /// The payload exceeds the maximum size the backend accepts.
    MessageTooBig,
    /// The request was missing a `collapse_key`.
    MissingCollapseKey,
    /// The backend could not process the request right now.
    Unavailable,
    /// A code outside the documented vocabulary, kept verbatim.
    Other(String),
}

impl BackendError {
    /// The code as the backend spells it.
    pub fn as_str(&self) -> &str {
        match self {
            BackendError::QuotaExceeded => "QuotaExceeded",
            BackendError::DeviceQuotaExceeded => "DeviceQuotaExceeded",
            BackendError::MissingRegistration => "MissingRegistration",
            BackendError::InvalidRegistration => "InvalidRegistration",
            BackendError::MismatchSenderId => "MismatchSenderId",
            BackendError::NotRegistered => "NotRegistered",
            BackendError::MessageTooBig => "MessageTooBig",
            BackendError::MissingCollapseKey => "MissingCollapseKey",
            BackendError::Unavailable => "Unavailable",
            BackendError::Other(code) => code,
        }
    }
}

impl<'a> From<&'a str> for BackendError {
    fn from(code: &'a str) -> BackendError {
        match code {
            "QuotaExceeded" => BackendError::QuotaExceeded,
            "DeviceQuotaExceeded" => BackendError::DeviceQuotaExceeded,
            "MissingRegistration" => BackendError::MissingRegistration,
            "InvalidRegistration" => BackendError::InvalidRegistration,
            "MismatchSenderId" => BackendError::MismatchSenderId,
            "NotRegistered" => BackendError::NotRegistered,
            "MessageTooBig" => BackendError::MessageTooBig,
            "MissingCollapseKey" => BackendError::MissingCollapseKey,
            "Unavailable" => BackendError::Unavailable,
            other => BackendError::Other(other.to_string()),
        }
    }
}

impl FromStr for BackendError {
    type Err = Infallible;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Ok(BackendError::from(code))
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum C2dmError {
    /// An unknown error happened in the HTTP client library
    Unspecified,
    /// A caller-supplied value had the wrong shape or type
    InvalidArgument(String),
    /// The message is missing its registration id, collapse key or data
    InvalidMessage,
    /// Sending a message requires a ClientLogin token
    MissingAuthToken,
    /// The backend rejected the ClientLogin token
    InvalidAuthToken,
    /// The backend is unavailable or answered with something unreadable.
    /// Contains an optional `Duration`, until the user can retry the request
    ServerUnavailable { retry_after: Option<Duration> },
    /// The backend answered `Error=<code>`
    Backend(BackendError),
    /// The provided URI is invalid
    InvalidUri,
    /// The response body exceeded the maximum size the transports read
    ResponseTooLarge,
    /// No HTTP client feature was enabled and no transport was injected
    MissingTransport,
    /// Error in network or body i/o
    Io(IoError),
}

impl Error for C2dmError {}

impl From<InvalidUri> for C2dmError {
    fn from(_: InvalidUri) -> C2dmError {
        C2dmError::InvalidUri
    }
}

impl From<http::Error> for C2dmError {
    fn from(err: http::Error) -> C2dmError {
        C2dmError::InvalidArgument(err.to_string())
    }
}

impl From<serde_json::Error> for C2dmError {
    fn from(err: serde_json::Error) -> C2dmError {
        C2dmError::InvalidArgument(err.to_string())
    }
}

impl From<BackendError> for C2dmError {
    fn from(err: BackendError) -> C2dmError {
        C2dmError::Backend(err)
    }
}

#[cfg(any(feature = "hyper-client", feature = "hyper-rustls-client"))]
impl From<hyper::Error> for C2dmError {
    fn from(_: hyper::Error) -> Self {
        Self::Unspecified
    }
}

#[cfg(feature = "isahc-client")]
impl From<isahc::Error> for C2dmError {
    fn from(_: isahc::Error) -> Self {
        Self::Unspecified
    }
}

impl From<IoError> for C2dmError {
    fn from(err: IoError) -> C2dmError {
        C2dmError::Io(err)
    }
}

impl C2dmError {
    pub fn short_description(&self) -> &'static str {
        match *self {
            C2dmError::Unspecified => "unspecified",
            C2dmError::InvalidArgument(_) => "invalid_argument",
            C2dmError::InvalidMessage => "invalid_message",
            C2dmError::MissingAuthToken => "missing_auth_token",
            C2dmError::InvalidAuthToken => "invalid_auth_token",
            C2dmError::ServerUnavailable { .. } => "server_unavailable",
            C2dmError::Backend(_) => "backend_error",
            C2dmError::InvalidUri => "invalid_uri",
            C2dmError::ResponseTooLarge => "response_too_large",
            C2dmError::MissingTransport => "missing_transport",
            C2dmError::Io(_) => "io_error",
        }
    }

    /// True for outcomes where sending the same message again later may
    /// succeed. The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            C2dmError::ServerUnavailable { .. }
                | C2dmError::Backend(BackendError::Unavailable)
                | C2dmError::Backend(BackendError::QuotaExceeded)
                | C2dmError::Backend(BackendError::DeviceQuotaExceeded)
        )
    }

    /// The `Retry-After` hint of a `ServerUnavailable` error.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            C2dmError::ServerUnavailable { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl fmt::Display for C2dmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            C2dmError::Unspecified => write!(f, "unspecified error"),
            C2dmError::InvalidArgument(reason) => write!(f, "invalid argument: {}", reason),
            C2dmError::InvalidMessage => write!(f, "unable to validate the message"),
            C2dmError::MissingAuthToken => {
                write!(f, "sending a message requires a Google authorization token")
            }
            C2dmError::InvalidAuthToken => write!(f, "the auth token was rejected"),
            C2dmError::ServerUnavailable { retry_after: Some(after) } => {
                write!(f, "server unavailable, retry after {}s", after.as_secs())
            }
            C2dmError::ServerUnavailable { retry_after: None } => write!(f, "server unavailable"),
            C2dmError::Backend(code) => write!(f, "backend error: {}", code),
            C2dmError::InvalidUri => write!(f, "invalid uri provided"),
            C2dmError::ResponseTooLarge => write!(f, "response body exceeded the maximum size"),
            C2dmError::MissingTransport => write!(f, "no http client available"),
            C2dmError::Io(err) => write!(f, "i/o error: {}", err),
        }
    }
}

pub struct RetryAfter;
impl RetryAfter {
    pub fn from_str(header_value: &str) -> Option<Duration> {
        if let Ok(seconds) = header_value.parse::<u64>() {
            Some(Duration::from_secs(seconds))
        } else {
            chrono::DateTime::parse_from_rfc2822(header_value)
                .map(|date_time| {
                    let systime: SystemTime = date_time.into();

                    systime
                        .duration_since(SystemTime::now())
                        .unwrap_or_else(|_| Duration::new(0, 0))
                })
                .ok()
        }
    }
}
