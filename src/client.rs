use std::fmt;
use std::sync::Arc;

use http::Response;
use serde_json::Value;

use crate::clients::{default_transport, request_builder, HttpTransport};
use crate::error::C2dmError;
use crate::message::Message;
use crate::options::{parse_settings, ClientOptions, Setting};
use crate::response::DeliveryReceipt;

/// The C2DM endpoint messages are posted to unless overridden.
pub const C2DM_SEND_URI: &str = "https://android.apis.google.com/c2dm/send";

/// The ClientLogin service name to request a C2DM auth token for.
pub const AUTH_SERVICE_NAME: &str = "ac2dm";

/// What the most recent [`C2dmClient::send_message`] call sent and received.
#[derive(Debug, Default)]
pub struct LastAttempt {
    /// The message passed to the call, recorded even when it was invalid.
    pub message: Option<Message>,
    /// The raw response, if the request got that far.
    pub response: Option<Response<Vec<u8>>>,
}

/// Sends messages to the C2DM backend.
///
/// The client keeps the last attempt around for inspection after a failed
/// send. That state belongs to one client; callers that share a client
/// between tasks have to serialize access to it, for example with a mutex.
///
/// ```no_run
/// # use c2dm::{C2dmClient, C2dmError, Message};
/// # async fn run() -> Result<(), C2dmError> {
/// let mut client = C2dmClient::with_options(serde_json::json!({
///     "loginToken": "DQAAAH4AAAD...",
///     "delayWhileIdle": true,
/// }))?;
///
/// let message = Message::new("APA91bHun4MxP5egoKMwt2KZFBaFUH", "score", [("score", "4-2")]);
///
/// match client.send_message(&message).await {
///     Ok(receipt) => println!("delivered as {:?}", receipt.message_id()),
///     Err(e) if e.is_retryable() => println!("try again in {:?}", e.retry_after()),
///     Err(e) => return Err(e),
/// }
/// # Ok(())
/// # }
/// ```
pub struct C2dmClient {
    endpoint: String,
    login_token: Option<String>,
    options: ClientOptions,
    transport: Option<Arc<dyn HttpTransport>>,
    last_attempt: LastAttempt,
}

impl fmt::Debug for C2dmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("C2dmClient")
            .field("endpoint", &self.endpoint)
            .field("login_token", &self.login_token.as_ref().map(|_| "<redacted>"))
            .field("options", &self.options)
            .field("last_attempt", &self.last_attempt)
            .finish()
    }
}

impl Default for C2dmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl C2dmClient {
    /// Creates a client for the default endpoint, without a token.
    pub fn new() -> Self {
        Self {
            endpoint: C2DM_SEND_URI.to_string(),
            login_token: None,
            options: ClientOptions::default(),
            transport: None,
            last_attempt: LastAttempt::default(),
        }
    }

    /// Creates a client and applies `config` with [`set_options`](C2dmClient::set_options).
    pub fn with_options(config: Value) -> Result<Self, C2dmError> {
        let mut client = Self::new();
        client.set_options(config)?;

        Ok(client)
    }

    /// Applies a JSON object of options.
    ///
    /// `loginToken`, `delayWhileIdle` and `endpointUri` (or their snake_case
    /// forms) go to their setters. Every other key is kept as given in
    /// [`ClientOptions::passthrough`]. Nothing changes if any value has the
    /// wrong type.
    pub fn set_options(&mut self, config: Value) -> Result<(), C2dmError> {
        for setting in parse_settings(config)? {
            match setting {
                Setting::LoginToken(token) => self.set_login_token(token),
                Setting::DelayWhileIdle(flag) => self.set_delay_while_idle(flag),
                Setting::Endpoint(endpoint) => self.set_endpoint(endpoint),
                Setting::Passthrough(key, value) => {
                    self.options.passthrough.insert(key, value);
                }
            }
        }

        Ok(())
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Ask the backend not to wake idle devices for messages sent from now on.
    pub fn set_delay_while_idle(&mut self, delay_while_idle: bool) {
        self.options.delay_while_idle = delay_while_idle;
    }

    pub fn login_token(&self) -> Option<&str> {
        self.login_token.as_deref()
    }

    /// The ClientLogin token sent in the `Authorization` header.
    pub fn set_login_token<S: Into<String>>(&mut self, token: S) {
        self.login_token = Some(token.into());
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Overrides [`C2DM_SEND_URI`]. The value is parsed when a message is sent.
    pub fn set_endpoint<S: Into<String>>(&mut self, endpoint: S) {
        self.endpoint = endpoint.into();
    }

    /// The transport used for sending, creating the default one of the
    /// enabled client feature on first use.
    pub fn http_client(&mut self) -> Result<Arc<dyn HttpTransport>, C2dmError> {
        if let Some(ref transport) = self.transport {
            return Ok(transport.clone());
        }

        let transport = default_transport()?;
        self.transport = Some(transport.clone());

        Ok(transport)
    }

    /// Sends all following messages through `transport`.
    pub fn set_http_client<T: HttpTransport + 'static>(&mut self, transport: T) {
        self.transport = Some(Arc::new(transport));
    }

    /// Validates and sends one message, classifying the backend's answer.
    ///
    /// Nothing is sent if the message is invalid or no token is set. The
    /// client never retries; use [`C2dmError::is_retryable`] and
    /// [`C2dmError::retry_after`] to decide whether to send again.
    pub async fn send_message(&mut self, message: &Message) -> Result<DeliveryReceipt, C2dmError> {
        self.last_attempt = LastAttempt {
            message: Some(message.clone()),
            response: None,
        };

        if !message.validate() {
            return Err(C2dmError::InvalidMessage);
        }

        let request = match self.login_token.as_deref() {
            Some(token) if !token.is_empty() => {
                request_builder::build_request(&self.endpoint, token, &self.options, message)?
            }
            _ => return Err(C2dmError::MissingAuthToken),
        };

        trace!("Message: {:?}", message);

        let transport = self.http_client()?;
        let response = transport.execute(request).await?;

        trace!("Response status: {}", response.status());
        trace!("Body text: {:?}", std::str::from_utf8(response.body()));

        let response = self.last_attempt.response.insert(response);
        let result = request_builder::parse_response(response.status(), response.headers(), response.body());

        debug!("Response: {:?}", result);

        result
    }

    pub fn last_attempt(&self) -> &LastAttempt {
        &self.last_attempt
    }

    /// The message of the most recent send attempt.
    pub fn last_message(&self) -> Option<&Message> {
        self.last_attempt.message.as_ref()
    }

    /// The raw response of the most recent send attempt, if one arrived.
    pub fn last_response(&self) -> Option<&Response<Vec<u8>>> {
        self.last_attempt.response.as_ref()
    }
}
