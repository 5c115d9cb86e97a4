//! Public and frontend-user endpoints.
//!
//! Catalog browsing needs no token; order routes authenticate with the
//! frontend user's bearer token.

use reqwest::Response;

use super::ApiClient;
use super::types::{CreateOrderRequest, RegisterUserRequest};

impl ApiClient {
    /// `POST /user/register` - frontend shopper self-registration.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn register_user(
        &self,
        request: &RegisterUserRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/user/register", None, request).await
    }

    /// `POST /user/login`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn user_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Response, reqwest::Error> {
        self.post_json(
            "/user/login",
            None,
            &serde_json::json!({"username": username, "password": password}),
        )
        .await
    }

    /// `GET /user/check-username`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn check_username(&self, username: &str) -> Result<Response, reqwest::Error> {
        self.get(
            "/user/check-username",
            None,
            &[("username", username.to_string())],
        )
        .await
    }

    /// `GET /product/list` - public catalog listing for a shop.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn public_product_list(
        &self,
        shop_id: u64,
        page: u32,
        page_size: u32,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/product/list",
            None,
            &[
                ("shop_id", shop_id.to_string()),
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
            ],
        )
        .await
    }

    /// `GET /product/detail`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn public_product_detail(
        &self,
        product_id: u64,
        shop_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/product/detail",
            None,
            &[
                ("product_id", product_id.to_string()),
                ("shop_id", shop_id.to_string()),
            ],
        )
        .await
    }

    /// `GET /shop/detail` - public shop profile.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn public_shop_detail(&self, shop_id: u64) -> Result<Response, reqwest::Error> {
        self.get("/shop/detail", None, &[("shop_id", shop_id.to_string())])
            .await
    }

    /// `GET /shop/{shop_id}/tags` - tags visible on a shop's storefront.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn public_shop_tags(&self, shop_id: u64) -> Result<Response, reqwest::Error> {
        self.get(&format!("/shop/{shop_id}/tags"), None, &[]).await
    }

    /// `POST /order/create` - place an order as a frontend user.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn user_create_order(
        &self,
        token: &str,
        request: &CreateOrderRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/order/create", Some(token), request).await
    }

    /// `GET /order/user/list` - orders placed by a user.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn user_order_list(
        &self,
        token: &str,
        user_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/order/user/list",
            Some(token),
            &[("user_id", user_id.to_string())],
        )
        .await
    }

    /// `GET /order/detail` (frontend view).
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn user_order_detail(
        &self,
        token: &str,
        order_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/order/detail",
            Some(token),
            &[("order_id", order_id.to_string())],
        )
        .await
    }

    /// `DELETE /order/delete` - cancel one of the user's own orders.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn user_delete_order(
        &self,
        token: &str,
        order_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.delete("/order/delete", Some(token), &[("id", order_id.to_string())])
            .await
    }
}
