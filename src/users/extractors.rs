use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use tracing::warn;

use super::dto::RegisterRequest;
use crate::error::ApiError;

const MSG_BAD_BODY: &str = "Invalid request body";

/// Registration body read as JSON or as an urlencoded form post, chosen by
/// `Content-Type`. A request without a content type carries no fields.
pub struct RegisterBody(pub RegisterRequest);

#[async_trait]
impl<S> FromRequest<S> for RegisterBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);

        match content_type.as_deref() {
            None => Ok(RegisterBody(RegisterRequest::default())),
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(payload) = Form::<RegisterRequest>::from_request(req, state)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "unreadable register form");
                        ApiError::InvalidInput(MSG_BAD_BODY)
                    })?;
                Ok(RegisterBody(payload))
            }
            Some(_) => {
                let Json(payload) = Json::<RegisterRequest>::from_request(req, state)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "unreadable register body");
                        ApiError::InvalidInput(MSG_BAD_BODY)
                    })?;
                Ok(RegisterBody(payload))
            }
        }
    }
}
