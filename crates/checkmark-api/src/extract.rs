//! Request body extraction

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Lenient JSON body.
///
/// An empty body decodes as `T::default()` and the `Content-Type` header is not
/// required, so a bare `PUT` reaches the handler's own validation. Malformed
/// JSON is rejected as a 400 with a `{message}` body.
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }
        let value = serde_json::from_slice(&bytes)?;
        Ok(JsonBody(value))
    }
}
