//! JSON body extractor that runs `validator` rules after deserializing.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed its `Validate` rules.
///
/// Both malformed JSON and failed validation are rejected with 400; the
/// latter carries the field errors in `details`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct UpdateOutput {
///     #[validate(length(min = 1))]
///     output: String,
/// }
///
/// async fn handler(ValidatedJson(payload): ValidatedJson<UpdateOutput>) { /* ... */ }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::post};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Review {
        #[validate(length(min = 1))]
        review: String,
    }

    async fn accept(ValidatedJson(body): ValidatedJson<Review>) -> String {
        body.review
    }

    async fn post_json(body: &'static str) -> (StatusCode, serde_json::Value) {
        let response = Router::new()
            .route("/", post(accept))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let (status, _) = post_json(r#"{"review":"good day"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_failed_rule_returns_field_details() {
        let (status, body) = post_json(r#"{"review":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["details"]["review"].is_array());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (status, body) = post_json(r#"{"review": "#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_bad_request() {
        let (status, _) = post_json(r#"{"review": 42}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
