//! # C2DM
//!
//! A client for Android Cloud to Device Messaging. It posts one message per
//! request to the C2DM backend and turns the answer into a
//! [`DeliveryReceipt`] or a typed [`C2dmError`] callers can branch on.
//!
//! The default transport uses [isahc](https://crates.io/crates/isahc) and
//! works on any executor. Enable `hyper-client` or `hyper-rustls-client`
//! (with `default-features = false`) to send through hyper instead, or inject
//! your own [`HttpTransport`].
//!
//! # Example
//!
//! ```no_run
//! use c2dm::*;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), C2dmError> {
//! let mut client = C2dmClient::new();
//! client.set_login_token("DQAAAH4AAAD...");
//!
//! let message = Message::new(
//!     "APA91bHun4MxP5egoKMwt2KZFBaFUH-1RYqx",
//!     "score-update",
//!     [("score", "4-2"), ("time", "15:10")],
//! );
//!
//! let receipt = client.send_message(&message).await?;
//! println!("accepted as {:?}", receipt.message_id());
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub use crate::client::{C2dmClient, LastAttempt, AUTH_SERVICE_NAME, C2DM_SEND_URI};
pub use crate::clients::request_builder;
pub use crate::clients::{HttpTransport, MAX_RESPONSE_SIZE};
pub use crate::error::{BackendError, C2dmError, RetryAfter};
pub use crate::message::Message;
pub use crate::options::ClientOptions;
pub use crate::response::DeliveryReceipt;

#[cfg(feature = "hyper-client")]
pub use crate::clients::hyper_client::HyperTransport;
#[cfg(feature = "hyper-rustls-client")]
pub use crate::clients::hyper_rustls_client::HyperRustlsTransport;
#[cfg(feature = "isahc-client")]
pub use crate::clients::isahc_client::IsahcTransport;

mod client;
mod clients;
mod error;
mod message;
mod options;
mod response;
