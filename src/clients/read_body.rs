use http::Response;
use hyper::{body::HttpBody, Body};

use crate::clients::MAX_RESPONSE_SIZE;
use crate::error::C2dmError;

/// Buffers a hyper response body, giving up past [`MAX_RESPONSE_SIZE`].
pub(crate) async fn read_body(response: Response<Body>) -> Result<Response<Vec<u8>>, C2dmError> {
    let (parts, mut chunks) = response.into_parts();

    let mut body = Vec::new();
    while let Some(chunk) = chunks.data().await {
        body.extend(&chunk?);
        if body.len() > MAX_RESPONSE_SIZE {
            return Err(C2dmError::ResponseTooLarge);
        }
    }
    trace!("Body: {:?}", body);

    Ok(Response::from_parts(parts, body))
}
