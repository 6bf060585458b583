use super::models::Validate;
use async_trait::async_trait;
use axum::{
    body::HttpBody,
    extract::FromRequest,
    http::Request,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Like `Json<T>`, but the payload also has to pass `T::validate` before a
/// handler ever sees it.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S, B> FromRequest<S, B> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = Response;

    async fn from_request(
        req: Request<B>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                (
                    rejection.status(),
                    Json(json!({ "detail": rejection.body_text() })),
                )
                    .into_response()
            })?;
        payload.validate().map_err(IntoResponse::into_response)?;

        Ok(ValidJson(payload))
    }
}
