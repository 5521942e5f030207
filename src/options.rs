//! Client configuration and the option keys the client recognizes.

use serde_json::{Map, Value};

use crate::error::C2dmError;

/// Delivery options sent along with every message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientOptions {
    /// Ask the backend to hold the message until the device is active.
    pub delay_while_idle: bool,
    /// Keys the client does not recognize, stored as given.
    pub passthrough: Map<String, Value>,
}

/// A single option, checked and ready to apply to a client.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Setting {
    LoginToken(String),
    DelayWhileIdle(bool),
    Endpoint(String),
    Passthrough(String, Value),
}

/// Maps every key of a JSON object to a [`Setting`].
///
/// Both camelCase and snake_case spellings of the recognized keys are
/// accepted. Nothing is returned unless every value has the right type.
pub(crate) fn parse_settings(config: Value) -> Result<Vec<Setting>, C2dmError> {
    let config = match config {
        Value::Object(map) => map,
        other => {
            return Err(C2dmError::InvalidArgument(format!(
                "options must be a JSON object, got {}",
                type_name(&other)
            )))
        }
    };

    config
        .into_iter()
        .map(|(key, value)| match key.as_str() {
            "loginToken" | "login_token" => expect_string(&key, value).map(Setting::LoginToken),
            "endpointUri" | "endpoint_uri" => expect_string(&key, value).map(Setting::Endpoint),
            "delayWhileIdle" | "delay_while_idle" => match value {
                Value::Bool(flag) => Ok(Setting::DelayWhileIdle(flag)),
                other => Err(wrong_type(&key, "a bool", &other)),
            },
            _ => Ok(Setting::Passthrough(key, value)),
        })
        .collect()
}

fn expect_string(key: &str, value: Value) -> Result<String, C2dmError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(wrong_type(key, "a string", &other)),
    }
}

fn wrong_type(key: &str, expected: &str, got: &Value) -> C2dmError {
    C2dmError::InvalidArgument(format!("{} expects {}, got {}", key, expected, type_name(got)))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
