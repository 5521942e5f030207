/// The `key=value` line the backend answers with when a message was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub key: String,
    pub value: String,
}

impl DeliveryReceipt {
    /// The id the backend assigned to the message, from an `id=<message id>`
    /// response.
    pub fn message_id(&self) -> Option<&str> {
        if self.key.eq_ignore_ascii_case("id") {
            Some(&self.value)
        } else {
            None
        }
    }
}
