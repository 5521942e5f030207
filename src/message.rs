use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::C2dmError;

/// One notification to deliver to a single device.
///
/// A message can be built field by field and may be invalid until it is
/// sent. [`C2dmClient::send_message`](crate::C2dmClient::send_message)
/// checks [`validate`](Message::validate) before anything goes out.
///
/// ```
/// # use c2dm::Message;
/// let mut message = Message::default();
/// assert!(!message.validate());
///
/// message.set_registration_id("APA91bHun4MxP5egoKMwt2KZFBaFUH-1RYqx");
/// message.set_collapse_key("score-update");
/// message.set_data([("score", "4-2")]);
///
/// assert!(message.validate());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    registration_id: String,
    collapse_key: String,
    data: BTreeMap<String, String>,
}

impl Message {
    /// A constructor function to create a new `Message` with every field set.
    pub fn new<S, I, K, V>(registration_id: S, collapse_key: S, data: I) -> Message
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut message = Message::default();

        message.set_registration_id(registration_id);
        message.set_collapse_key(collapse_key);
        message.set_data(data);

        message
    }

    /// Reads a message from JSON such as
    /// `{"registrationId": "..", "collapseKey": "..", "data": {"k": "v"}}`.
    ///
    /// Missing fields stay empty. Values of the wrong type fail with
    /// `InvalidArgument`.
    pub fn from_json(value: Value) -> Result<Message, C2dmError> {
        if !value.is_object() {
            return Err(C2dmError::InvalidArgument(String::from(
                "a message must be a JSON object",
            )));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// The device registration id the message is addressed to.
    pub fn registration_id(&self) -> &str {
        &self.registration_id
    }

    pub fn set_registration_id<S: Into<String>>(&mut self, registration_id: S) {
        self.registration_id = registration_id.into();
    }

    /// Messages with the same collapse key may be coalesced by the backend
    /// while the device is offline, so only the last one gets delivered.
    pub fn collapse_key(&self) -> &str {
        &self.collapse_key
    }

    pub fn set_collapse_key<S: Into<String>>(&mut self, collapse_key: S) {
        self.collapse_key = collapse_key.into();
    }

    /// The key-value payload, sent as one `data.<key>` field per entry.
    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    /// Replaces the whole payload. Nothing of the previous data is kept.
    pub fn set_data<I, K, V>(&mut self, data: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.data = data.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    }

    /// True when the registration id, the collapse key and the data are all
    /// non-empty.
    pub fn validate(&self) -> bool {
        !self.registration_id.is_empty() && !self.collapse_key.is_empty() && !self.data.is_empty()
    }
}
