//! JSON extractor whose rejections use the monitor's error body

use crate::error::MonitorError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

/// Like `axum::Json`, but a body that cannot be read as `T` becomes a
/// `MonitorError::Validation`, answered as 400 `{error, status}`.
pub struct MonitorJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for MonitorJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = MonitorError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(MonitorJson(value)),
            Err(rejection) => {
                tracing::debug!("Rejected JSON body: {}", rejection.body_text());
                Err(MonitorError::Validation(rejection.body_text()))
            }
        }
    }
}
