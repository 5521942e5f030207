use async_trait::async_trait;
use http::{Request, Response};
use hyper::{client::HttpConnector, Body, Client};
use hyper_rustls::HttpsConnector;

use crate::{
    clients::{read_body::read_body, HttpTransport},
    error::C2dmError,
};

/// An async transport for sending the C2DM request using rustls for TLS.
///
/// This transport is thread-safe. Clones of this transport will share the same underlying resources,
/// so cloning is a cheap and effective method to provide access to the transport.
///
/// This transport is [`hyper`](https://crates.io/crates/hyper) based with [`rustls`](https://crates.io/crates/rustls)
/// for TLS, and will only work in Tokio contexts. This variant is ideal for docker/musl builds
/// that don't require native-tls.
#[derive(Clone)]
pub struct HyperRustlsTransport {
    client: Client<HttpsConnector<HttpConnector>>,
}

impl Default for HyperRustlsTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Client<HttpsConnector<HttpConnector>>> for HyperRustlsTransport {
    /// Creates a new transport from a custom hyper HTTP client with rustls connector.
    fn from(client: Client<HttpsConnector<HttpConnector>>) -> Self {
        Self { client }
    }
}

impl HyperRustlsTransport {
    /// Creates a new transport with rustls for TLS.
    pub fn new() -> Self {
        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .https_or_http()
            .enable_http1()
            .build();

        Self {
            client: Client::builder().build(https),
        }
    }
}

#[async_trait]
impl HttpTransport for HyperRustlsTransport {
    /// Sends a request. Never times out.
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, C2dmError> {
        let request = request.map(Body::from);

        debug!("Request: {:?}", request);

        let response = self.client.request(request).await?;

        trace!("Response: {:?}", response);

        read_body(response).await
    }
}
