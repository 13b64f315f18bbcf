//! reqwest-backed [`UserApi`] against a JSON REST collection.
//!
//! `GET {base}`, `POST {base}`, `PUT {base}/{id}`, `DELETE {base}/{id}`,
//! where `base` is the collection URL itself.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::constants::USER_AGENT;
use crate::models::{NewUser, User, UserId};

use super::{ApiError, UserApi};

/// HTTP client for one user collection.
#[derive(Debug, Clone)]
pub struct RestUserApi {
    client: Client,
    base_url: String,
}

impl RestUserApi {
    /// Create a client for the collection at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    /// Create a client from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// The collection URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn member_url(&self, id: UserId) -> String {
        format!("{}/{id}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        tracing::debug!(method = method.as_str(), url, "sending request");
        self.client.request(method, url)
    }
}

#[async_trait]
impl UserApi for RestUserApi {
    async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.send_json(self.request(Method::GET, &self.base_url)).await
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let request = self.request(Method::POST, &self.base_url).json(user);
        self.send_json(request).await
    }

    async fn update(&self, user: &User) -> Result<User, ApiError> {
        let request = self.request(Method::PUT, &self.member_url(user.id)).json(user);
        self.send_json(request).await
    }

    async fn delete(&self, id: UserId) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &self.member_url(id)))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let api = RestUserApi::new("http://localhost:3000/users/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000/users");
        assert_eq!(api.member_url(7), "http://localhost:3000/users/7");
    }

    #[test]
    fn new_rejects_garbage_url() {
        let err = RestUserApi::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn new_rejects_non_http_scheme() {
        let err = RestUserApi::new("ftp://example.com/users", Duration::from_secs(1)).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn status_error_message() {
        assert_eq!(ApiError::Status(404).to_string(), "HTTP error! status: 404");
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is closed in practically every environment.
        let api = RestUserApi::new("http://127.0.0.1:9/users", Duration::from_secs(2)).unwrap();
        let err = api.list().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    }
}
