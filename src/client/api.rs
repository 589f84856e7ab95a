use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::users::dto::RegisterRequest;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The fields of a server reply the form cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: u16,
    pub body: ReplyBody,
}

impl ApiReply {
    /// 2xx and `success: true`; anything else is an application failure.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.body.success
    }
}

#[async_trait]
pub trait RegistrationApi: Send + Sync {
    async fn register(&self, req: &RegisterRequest) -> Result<ApiReply, ClientError>;
}

pub struct HttpRegistrationApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRegistrationApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RegistrationApi for HttpRegistrationApi {
    async fn register(&self, req: &RegisterRequest) -> Result<ApiReply, ClientError> {
        let url = format!("{}/api/register", self.base_url);
        let response = self.http.post(&url).json(req).send().await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body: ReplyBody = serde_json::from_str(&text)?;
        Ok(ApiReply { status, body })
    }
}
