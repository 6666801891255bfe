//! HTTP client for the analyst backend API

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::types::{HourActivityRecord, HourBucket, LikesSeries, RiskUser, UserDetail, Video};

use super::DataGateway;

/// HTTP implementation of [`DataGateway`]
pub struct HttpGateway {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a new gateway from configuration
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Base address requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Issue a request and decode a successful JSON body.
    ///
    /// 404 becomes [`Error::NotFound`] carrying `what`; any other non-success
    /// status becomes [`Error::Gateway`].
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| Error::Protocol(format!("failed to parse response: {}", e)))
        } else if status == StatusCode::NOT_FOUND {
            Err(Error::NotFound(what.to_string()))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            Err(Error::Gateway(format!("API error ({}): {}", status, error_text)))
        }
    }
}

#[async_trait]
impl DataGateway for HttpGateway {
    async fn list_videos(&self) -> Result<Vec<Video>> {
        let request = self.http_client.get(self.url("videos"));
        self.fetch(request, "videos").await
    }

    async fn likes_series(&self, video_id: i64) -> Result<LikesSeries> {
        let request = self
            .http_client
            .get(self.url(&format!("likes/{}", video_id)));
        let series: LikesSeries = self.fetch(request, &format!("video {}", video_id)).await?;
        series.validate()?;
        Ok(series)
    }

    async fn risk_users(&self, limit: usize, search: Option<&str>) -> Result<Vec<RiskUser>> {
        let mut url = format!("{}?limit={}", self.url("users/risk"), limit);
        // An empty query is the unfiltered list, same as no query at all.
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            url.push_str("&search=");
            url.push_str(&urlencoding::encode(search));
        }
        let request = self.http_client.get(url);
        self.fetch(request, "risk users").await
    }

    async fn user_detail(&self, username: &str) -> Result<UserDetail> {
        let url = self.url(&format!("users/{}", urlencoding::encode(username)));
        let request = self.http_client.get(url);
        self.fetch(request, &format!("user {}", username)).await
    }

    async fn hour_activity(
        &self,
        video_id: i64,
        hour: &HourBucket,
    ) -> Result<Vec<HourActivityRecord>> {
        let url = format!(
            "{}?video_id={}&hour={}",
            self.url("activity"),
            video_id,
            urlencoding::encode(hour.as_str())
        );
        let request = self.http_client.get(url);
        self.fetch(request, &format!("activity for video {}", video_id))
            .await
    }

    async fn post_chat(&self, message: &str) -> Result<String> {
        let body = ChatRequest {
            message,
            history: &[],
        };
        let request = self.http_client.post(self.url("chat")).json(&body);
        let reply: ChatResponse = self.fetch(request, "chat").await?;
        Ok(reply.response)
    }
}

/// Request body for POST /chat
#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    history: &'a [serde_json::Value],
}

/// Response from POST /chat
#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_requires_valid_config() {
        let config = GatewayConfig {
            base_url: String::new(),
            ..Default::default()
        };
        assert!(HttpGateway::new(&config).is_err());
    }

    #[test]
    fn test_gateway_trims_trailing_slash() {
        let config = GatewayConfig {
            base_url: "http://localhost:8000/api/".to_string(),
            ..Default::default()
        };
        let gateway = HttpGateway::new(&config).unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:8000/api");
        assert_eq!(gateway.url("videos"), "http://localhost:8000/api/videos");
    }

    #[test]
    fn test_chat_request_shape() {
        let body = ChatRequest {
            message: "Who liked video 5?",
            history: &[],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Who liked video 5?");
        assert!(json["history"].as_array().unwrap().is_empty());
    }
}
