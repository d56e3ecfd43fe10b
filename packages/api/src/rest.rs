//! HTTP implementation of [`ResourceApi`] against the console's REST backend.
//!
//! Every request carries `Content-Type: application/json` and nothing else:
//! no auth header, no retry, no timeout. Any non-2xx answer becomes
//! [`ApiError::Status`] with the response text attached. The base address
//! must be absolute; ids are percent-encoded as a single path segment.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use store::{ConsoleConfig, RecordId, ResourceKind};

use crate::client::{unwrap_envelope, ResourceApi};
use crate::error::ApiError;

/// REST client bound to one backend base address.
#[derive(Clone, Debug)]
pub struct RestClient {
    http: Client,
    base: Url,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        let base_url = config.api.base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| ApiError::Config(format!("base url {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Config(format!("base url {base_url:?} cannot take a path")));
        }
        Ok(Self {
            http,
            base,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, kind: ResourceKind, id: Option<&RecordId>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(kind.path());
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        url
    }

    fn collection_url(&self, kind: ResourceKind) -> Url {
        self.endpoint(kind, None)
    }

    fn record_url(&self, kind: ResourceKind, id: &RecordId) -> Url {
        self.endpoint(kind, Some(id))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!("backend answered {status}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(unwrap_envelope(serde_json::from_str(&text)?))
    }
}

impl ResourceApi for RestClient {
    async fn list_raw(&self, kind: ResourceKind) -> Result<Vec<Value>, ApiError> {
        let url = self.collection_url(kind);
        tracing::debug!("GET {url}");
        match self.send(self.http.get(url)).await? {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(ApiError::Decode(format!(
                "expected a list of {kind}, got {other}"
            ))),
        }
    }

    async fn get_raw(&self, kind: ResourceKind, id: &RecordId) -> Result<Value, ApiError> {
        let url = self.record_url(kind, id);
        tracing::debug!("GET {url}");
        self.send(self.http.get(url)).await
    }

    async fn create_raw(&self, kind: ResourceKind, body: Value) -> Result<Value, ApiError> {
        let url = self.collection_url(kind);
        tracing::debug!("POST {url}");
        self.send(self.http.post(url).json(&body)).await
    }

    async fn update_raw(
        &self,
        kind: ResourceKind,
        id: &RecordId,
        body: Value,
    ) -> Result<Value, ApiError> {
        let url = self.record_url(kind, id);
        tracing::debug!("PUT {url}");
        self.send(self.http.put(url).json(&body)).await
    }

    async fn delete(&self, kind: ResourceKind, id: &RecordId) -> Result<(), ApiError> {
        let url = self.record_url(kind, id);
        tracing::debug!("DELETE {url}");
        self.send(self.http.delete(url)).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_follow_the_rest_table() {
        let client = RestClient::new(&ConsoleConfig::new("http://localhost:8080/api/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(
            client.collection_url(ResourceKind::Contracts).as_str(),
            "http://localhost:8080/api/contracts"
        );
        assert_eq!(
            client.record_url(ResourceKind::Users, &RecordId::Int(7)).as_str(),
            "http://localhost:8080/api/users/7"
        );
        assert_eq!(
            client.record_url(ResourceKind::Leads, &RecordId::from("ab-1")).as_str(),
            "http://localhost:8080/api/leads/ab-1"
        );
    }

    #[test]
    fn test_text_ids_stay_one_path_segment() {
        let client = RestClient::new(&ConsoleConfig::new("http://localhost:8080/api")).unwrap();
        assert_eq!(
            client.record_url(ResourceKind::Leads, &RecordId::from("a/b")).as_str(),
            "http://localhost:8080/api/leads/a%2Fb"
        );
        assert_eq!(
            client.record_url(ResourceKind::Leads, &RecordId::from("x?y")).as_str(),
            "http://localhost:8080/api/leads/x%3Fy"
        );
    }

    #[test]
    fn test_host_only_base() {
        let client = RestClient::new(&ConsoleConfig::new("http://localhost:8080")).unwrap();
        assert_eq!(
            client.collection_url(ResourceKind::Users).as_str(),
            "http://localhost:8080/users"
        );
    }

    #[test]
    fn test_relative_base_is_rejected() {
        let err = RestClient::new(&ConsoleConfig::new("/api")).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
