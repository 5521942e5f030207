//! Contains the HTTP transports the C2DM client sends through.
//!
//! [`request_builder`] contains the functions used to send and consume C2DM http messages.
//! This module should be consumed by each transport, by using [`http`]'s flexible api.

use std::sync::Arc;

use async_trait::async_trait;
use http::{Request, Response};

use crate::error::C2dmError;

pub mod request_builder;

#[cfg(any(feature = "hyper-client", feature = "hyper-rustls-client"))]
mod read_body;

#[cfg(feature = "hyper-client")]
pub mod hyper_client;

#[cfg(feature = "hyper-rustls-client")]
pub mod hyper_rustls_client;

#[cfg(feature = "isahc-client")]
pub mod isahc_client;

/// The maximum response body size the bundled transports read. The C2DM
/// backend answers with a single short line.
pub const MAX_RESPONSE_SIZE: usize = 64 * 1024;

/// Sends one HTTP request and hands back the whole response.
///
/// Implement this to plug a custom HTTP stack, or a mock in tests, into
/// [`C2dmClient`](crate::C2dmClient). Timeouts are the transport's concern.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs the request. Error statuses are returned as a normal
    /// response; only failing to get a response is an `Err`.
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, C2dmError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, C2dmError> {
        (**self).execute(request).await
    }
}

/// Creates the transport of the enabled client feature, preferring isahc.
#[allow(unreachable_code)]
pub(crate) fn default_transport() -> Result<Arc<dyn HttpTransport>, C2dmError> {
    #[cfg(feature = "isahc-client")]
    return Ok(Arc::new(isahc_client::IsahcTransport::new()?));

    #[cfg(feature = "hyper-client")]
    return Ok(Arc::new(hyper_client::HyperTransport::new()));

    #[cfg(feature = "hyper-rustls-client")]
    return Ok(Arc::new(hyper_rustls_client::HyperRustlsTransport::new()));

    Err(C2dmError::MissingTransport)
}
