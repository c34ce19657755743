use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::AUTHORIZATION;
use review_core::PollCursor;
use serde_json::Value;
use watch_logging::watch_debug;

use crate::{FailureKind, FetchError};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 1024 * 1024,
        }
    }
}

/// Remote source of review status changes.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, cursor: PollCursor) -> Result<Value, FetchError>;
}

#[derive(Clone)]
pub struct ReqwestStatusSource {
    settings: FetchSettings,
    authorization: String,
    client: reqwest::Client,
}

impl ReqwestStatusSource {
    pub fn new(settings: FetchSettings, api_token: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Transport, &settings.endpoint, err.to_string()))?;
        Ok(Self {
            authorization: format!("OAuth {api_token}"),
            settings,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }

    fn request_url(&self, cursor: PollCursor) -> Result<reqwest::Url, FetchError> {
        let mut url = reqwest::Url::parse(&self.settings.endpoint).map_err(|err| {
            FetchError::new(FailureKind::InvalidUrl, &self.settings.endpoint, err.to_string())
        })?;
        url.query_pairs_mut()
            .append_pair("from_date", &cursor.value().to_string());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl StatusSource for ReqwestStatusSource {
    async fn fetch(&self, cursor: PollCursor) -> Result<Value, FetchError> {
        let url = self.request_url(cursor)?;
        let endpoint = self.endpoint();
        watch_debug!("GET {} from_date={}", endpoint, cursor.value());

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, &self.authorization)
            .send()
            .await
            .map_err(|err| map_reqwest_error(endpoint, err))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                endpoint,
                format!("endpoint unavailable, API response code {}", status.as_u16()),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    endpoint,
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| map_reqwest_error(endpoint, err))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    endpoint,
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::InvalidBody, endpoint, err.to_string()))
    }
}

fn map_reqwest_error(endpoint: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, endpoint, err.to_string());
    }
    FetchError::new(FailureKind::Transport, endpoint, err.to_string())
}
