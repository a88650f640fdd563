use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::Error;

/// JSON body extractor whose rejections render as the crate's error object
/// (`400`, `kind: validation_error`) instead of axum's plain-text response.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                let message = format!("Invalid JSON request body: {}", rejection.body_text());
                tracing::warn!(status = %rejection.status(), "{}", message);
                Err(Error::BadRequest(message))
            }
        }
    }
}
