//! Typed client for the OrderEase backend.
//!
//! The backend exposes three endpoint groups: platform-admin routes
//! under `/admin`, shop-owner routes under `/shopOwner`, and public /
//! frontend-user routes at the root. All calls go through the
//! [`RetryingClient`] so rate limiting is absorbed transparently, and
//! all methods return the raw [`Response`]; interpreting status codes
//! is the caller's job (negative-path tests assert failure codes on
//! purpose).
//!
//! Response envelopes are inconsistent across the backend (`{"data":
//! {...}}` wrappers, bare objects, ids under `id`/`shop_id`/`shopId`,
//! numeric or string-encoded), so the extraction helpers here tolerate
//! every shape observed in the wild.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;

use crate::config::SuiteConfig;
use crate::retry::RetryingClient;

mod admin;
mod auth;
mod frontend;
mod shop_owner;
pub mod types;

/// Actor roles the suite authenticates as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    ShopOwner,
    FrontendUser,
}

/// A bearer credential obtained from a login call.
#[derive(Debug, Clone)]
pub struct Credential {
    pub role: Role,
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

struct ApiClientInner {
    http: RetryingClient,
    config: SuiteConfig,
}

/// Backend API client.
///
/// Cheap to clone; all clones share the underlying connection pool and
/// retry policy.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client from suite configuration.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the underlying client cannot be
    /// constructed.
    pub fn new(config: &SuiteConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http: RetryingClient::new(client, config.retry),
                config: config.clone(),
            }),
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.inner.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.config.base_url)
    }

    /// GET a backend path with optional bearer auth and query params.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn get(
        &self,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
    ) -> Result<Response, reqwest::Error> {
        let url = self.url(path);
        self.inner
            .http
            .execute(|| {
                let mut request = self.inner.http.client().get(&url).query(query);
                if let Some(token) = token {
                    request = request.bearer_auth(token);
                }
                request.send()
            })
            .await
    }

    /// POST a JSON body to a backend path.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response, reqwest::Error> {
        let url = self.url(path);
        self.inner
            .http
            .execute(|| {
                let mut request = self.inner.http.client().post(&url).json(body);
                if let Some(token) = token {
                    request = request.bearer_auth(token);
                }
                request.send()
            })
            .await
    }

    /// POST to a backend path with no body (logout, refresh).
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn post_empty(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        let url = self.url(path);
        self.inner
            .http
            .execute(|| {
                let mut request = self.inner.http.client().post(&url);
                if let Some(token) = token {
                    request = request.bearer_auth(token);
                }
                request.send()
            })
            .await
    }

    /// PUT a JSON body to a backend path.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response, reqwest::Error> {
        let url = self.url(path);
        self.inner
            .http
            .execute(|| {
                let mut request = self.inner.http.client().put(&url).json(body);
                if let Some(token) = token {
                    request = request.bearer_auth(token);
                }
                request.send()
            })
            .await
    }

    /// DELETE a backend path with query params.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn delete(
        &self,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
    ) -> Result<Response, reqwest::Error> {
        let url = self.url(path);
        self.inner
            .http
            .execute(|| {
                let mut request = self.inner.http.client().delete(&url).query(query);
                if let Some(token) = token {
                    request = request.bearer_auth(token);
                }
                request.send()
            })
            .await
    }

    /// POST multipart image data (`image` field) to an upload endpoint.
    ///
    /// The form is rebuilt on every retry attempt because multipart
    /// bodies are consumed by sending.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn post_image(
        &self,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
        image: Vec<u8>,
    ) -> Result<Response, reqwest::Error> {
        let url = self.url(path);
        self.inner
            .http
            .execute(|| {
                let image = image.clone();
                let mut request = self.inner.http.client().post(&url).query(query);
                if let Some(token) = token {
                    request = request.bearer_auth(token);
                }
                async move {
                    let part = Part::bytes(image)
                        .file_name("test.jpg")
                        .mime_str("image/jpeg")?;
                    request.multipart(Form::new().part("image", part)).send().await
                }
            })
            .await
    }
}

/// Pull a record id out of a response body, trying the wrapper and key
/// variants the backend is known to produce.
#[must_use]
pub fn extract_id(body: &Value, keys: &[&str]) -> Option<u64> {
    let candidates = [body.get("data").unwrap_or(body), body];
    for value in candidates {
        for key in keys {
            if let Some(id) = value.get(key).and_then(value_as_u64) {
                return Some(id);
            }
        }
    }
    None
}

/// Pull a bearer token out of a login response body.
#[must_use]
pub fn extract_token(body: &Value) -> Option<String> {
    let candidates = [body.get("data").unwrap_or(body), body];
    for value in candidates {
        if let Some(token) = value.get("token").and_then(Value::as_str)
            && !token.is_empty()
        {
            return Some(token.to_string());
        }
    }
    None
}

/// Pull a record list out of a list response body.
#[must_use]
pub fn extract_list(body: &Value, keys: &[&str]) -> Vec<Value> {
    if let Some(items) = body.as_array() {
        return items.clone();
    }
    for key in ["data"].iter().chain(keys) {
        match body.get(key) {
            Some(Value::Array(items)) => return items.clone(),
            // Paginated shape: {"data": {"list": [...], "total": n}}
            Some(Value::Object(map)) => {
                if let Some(Value::Array(items)) = map.get("list") {
                    return items.clone();
                }
            }
            _ => {}
        }
    }
    Vec::new()
}

fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn id_extraction_tolerates_envelope_variants() {
        let wrapped = json!({"data": {"id": 42}});
        let flat = json!({"shop_id": "17"});
        let camel = json!({"shopId": 9});
        assert_eq!(extract_id(&wrapped, &["id", "shop_id"]), Some(42));
        assert_eq!(extract_id(&flat, &["id", "shop_id"]), Some(17));
        assert_eq!(extract_id(&camel, &["id", "shop_id", "shopId"]), Some(9));
        assert_eq!(extract_id(&json!({"ok": true}), &["id"]), None);
    }

    #[test]
    fn token_extraction_rejects_empty_tokens() {
        assert_eq!(
            extract_token(&json!({"token": "abc"})).as_deref(),
            Some("abc")
        );
        assert_eq!(
            extract_token(&json!({"data": {"token": "xyz"}})).as_deref(),
            Some("xyz")
        );
        assert_eq!(extract_token(&json!({"token": ""})), None);
        assert_eq!(extract_token(&json!({})), None);
    }

    #[test]
    fn query_params_land_in_the_request_url() {
        let request = reqwest::Client::new()
            .get("http://localhost:8080/api/admin/shop/list")
            .query(&[("page", "1".to_string()), ("pageSize", "10".to_string())])
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/api/admin/shop/list?page=1&pageSize=10"
        );
    }

    #[test]
    fn list_extraction_handles_bare_wrapped_and_paginated() {
        assert_eq!(extract_list(&json!([1, 2]), &[]).len(), 2);
        assert_eq!(extract_list(&json!({"data": [1]}), &[]).len(), 1);
        assert_eq!(extract_list(&json!({"shops": [1, 2, 3]}), &["shops"]).len(), 3);
        assert_eq!(
            extract_list(&json!({"data": {"list": [1], "total": 1}}), &[]).len(),
            1
        );
        assert!(extract_list(&json!({}), &["shops"]).is_empty());
    }
}
