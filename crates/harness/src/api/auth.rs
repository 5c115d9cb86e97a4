//! Authentication endpoints.

use chrono::Utc;
use reqwest::Response;
use serde_json::json;

use super::types::ChangePasswordRequest;
use super::{ApiClient, Credential, Role, extract_token};

impl ApiClient {
    /// `POST /login` - universal login for admin and shop-owner accounts.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn login(&self, username: &str, password: &str) -> Result<Response, reqwest::Error> {
        self.post_json(
            "/login",
            None,
            &json!({"username": username, "password": password}),
        )
        .await
    }

    /// Log in and parse the bearer token into a [`Credential`].
    ///
    /// Returns `Ok(None)` when the backend refuses the login or the
    /// response carries no token; transport failures still error.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn login_credential(
        &self,
        role: Role,
        username: &str,
        password: &str,
    ) -> Result<Option<Credential>, reqwest::Error> {
        let response = self.login(username, password).await?;
        if response.status() != reqwest::StatusCode::OK {
            return Ok(None);
        }
        let body: serde_json::Value = response.json().await?;
        Ok(extract_token(&body).map(|token| Credential {
            role,
            token,
            issued_at: Utc::now(),
        }))
    }

    /// `POST /admin/refresh-token`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn admin_refresh_token(&self, token: &str) -> Result<Response, reqwest::Error> {
        self.post_empty("/admin/refresh-token", Some(token)).await
    }

    /// `POST /shop/refresh-token` - shop-owner token refresh.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn shop_refresh_token(&self, token: &str) -> Result<Response, reqwest::Error> {
        self.post_empty("/shop/refresh-token", Some(token)).await
    }

    /// `POST /admin/logout`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn admin_logout(&self, token: &str) -> Result<Response, reqwest::Error> {
        self.post_empty("/admin/logout", Some(token)).await
    }

    /// `POST /shopOwner/logout`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn shop_owner_logout(&self, token: &str) -> Result<Response, reqwest::Error> {
        self.post_empty("/shopOwner/logout", Some(token)).await
    }

    /// `POST /admin/change-password`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn admin_change_password(
        &self,
        token: &str,
        request: &ChangePasswordRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/admin/change-password", Some(token), request)
            .await
    }

    /// `POST /shopOwner/change-password`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn shop_owner_change_password(
        &self,
        token: &str,
        request: &ChangePasswordRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/shopOwner/change-password", Some(token), request)
            .await
    }

    /// `GET /admin/shop/temp-token` - issue a temporary shop token.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn shop_temp_token(
        &self,
        token: &str,
        shop_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/admin/shop/temp-token",
            Some(token),
            &[("shop_id", shop_id.to_string())],
        )
        .await
    }

    /// `GET /shop/temp-login` - log in with a temporary shop token.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn shop_temp_login(&self, temp_token: &str) -> Result<Response, reqwest::Error> {
        self.get("/shop/temp-login", None, &[("token", temp_token.to_string())])
            .await
    }
}
