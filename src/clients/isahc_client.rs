use async_trait::async_trait;
use futures_lite::AsyncReadExt;
use http::{Request, Response};
use isahc::config::{Configurable, RedirectPolicy};
use isahc::HttpClient;

use crate::clients::{HttpTransport, MAX_RESPONSE_SIZE};
use crate::error::C2dmError;

/// Redirects the default transport follows before giving up.
const MAX_REDIRECTS: u32 = 5;

/// An async transport for sending the C2DM request. This transport is expensive to create, and
/// should be reused.
///
/// This transport is thread-safe. Clones of this transport will share the same underlying resources,
/// so cloning is a cheap and effective method to provide access to the transport.
///
/// This transport is built on [`isahc`](https://crates.io/crates/isahc), and will therefore work on any async executor.
#[derive(Clone)]
pub struct IsahcTransport {
    client: HttpClient,
}

impl From<HttpClient> for IsahcTransport {
    /// Creates a new transport from a custom Isahc HTTP client.
    fn from(client: HttpClient) -> Self {
        Self { client }
    }
}

impl IsahcTransport {
    /// Creates a new transport that follows a bounded number of redirects.
    /// Can fail under resource depletion.
    pub fn new() -> Result<Self, C2dmError> {
        let client = HttpClient::builder()
            .redirect_policy(RedirectPolicy::Limit(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for IsahcTransport {
    /// Sends a request. Never times out.
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, C2dmError> {
        trace!("Request: {:?}", request);

        let response = self.client.send_async(request).await?;

        trace!("Response: {:?}", response);

        let (parts, body) = response.into_parts();

        let mut buffer = Vec::new();
        if body
            .take(MAX_RESPONSE_SIZE as u64 + 1)
            .read_to_end(&mut buffer)
            .await?
            > MAX_RESPONSE_SIZE
        {
            return Err(C2dmError::ResponseTooLarge);
        }
        trace!("Body: {:?}", buffer);

        Ok(Response::from_parts(parts, buffer))
    }
}
