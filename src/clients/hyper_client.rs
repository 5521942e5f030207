use async_trait::async_trait;
use http::{Request, Response};
use hyper::{client::HttpConnector, Body, Client};
use hyper_tls::HttpsConnector;

use crate::clients::{read_body::read_body, HttpTransport};
use crate::error::C2dmError;

/// An async transport for sending the C2DM request.
///
/// This transport is thread-safe. Clones of this transport will share the same underlying resources,
/// so cloning is a cheap and effective method to provide access to the transport.
///
/// This transport is [`hyper`](https://crates.io/crates/hyper) based, and will only work in Tokio contexts.
/// Hyper does not follow redirects, so a redirect reaches the classifier as an ordinary response.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>>,
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Client<HttpsConnector<HttpConnector>>> for HyperTransport {
    /// Creates a new transport from a custom hyper HTTP client.
    fn from(client: Client<HttpsConnector<HttpConnector>>) -> Self {
        Self { client }
    }
}

impl HyperTransport {
    /// Creates a new transport.
    pub fn new() -> Self {
        Self {
            client: Client::builder().build(HttpsConnector::new()),
        }
    }
}

#[async_trait]
impl HttpTransport for HyperTransport {
    /// Sends a request. Never times out.
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, C2dmError> {
        let request = request.map(Body::from);

        debug!("Request: {:?}", request);

        let response = self.client.request(request).await?;

        trace!("Response: {:?}", response);

        read_body(response).await
    }
}
