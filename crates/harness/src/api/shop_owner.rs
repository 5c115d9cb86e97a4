//! Shop-owner endpoints (`/shopOwner/...`).
//!
//! Owner tokens are scoped to a single shop, so these routes take no
//! explicit shop id unless the backend requires one.

use reqwest::Response;

use super::ApiClient;
use super::types::{
    CreateOrderRequest, CreateProductRequest, UpdateOrderRequest, UpdateProductRequest,
};

impl ApiClient {
    /// `GET /shopOwner/shop/detail` - the owner's own shop.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_shop_detail(&self, token: &str) -> Result<Response, reqwest::Error> {
        self.get("/shopOwner/shop/detail", Some(token), &[]).await
    }

    /// `POST /shopOwner/product/create`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_create_product(
        &self,
        token: &str,
        request: &CreateProductRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/shopOwner/product/create", Some(token), request)
            .await
    }

    /// `GET /shopOwner/product/detail`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_product_detail(
        &self,
        token: &str,
        product_id: u64,
        shop_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/shopOwner/product/detail",
            Some(token),
            &[
                ("product_id", product_id.to_string()),
                ("shop_id", shop_id.to_string()),
            ],
        )
        .await
    }

    /// `GET /shopOwner/product/list`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_product_list(
        &self,
        token: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/shopOwner/product/list",
            Some(token),
            &[("page", page.to_string()), ("pageSize", page_size.to_string())],
        )
        .await
    }

    /// `PUT /shopOwner/product/update`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_update_product(
        &self,
        token: &str,
        request: &UpdateProductRequest,
    ) -> Result<Response, reqwest::Error> {
        self.put_json("/shopOwner/product/update", Some(token), request)
            .await
    }

    /// `PUT /shopOwner/product/toggle-status`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_toggle_product_status(
        &self,
        token: &str,
        product_id: u64,
        shop_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.put_json(
            "/shopOwner/product/toggle-status",
            Some(token),
            &serde_json::json!({"id": product_id, "shop_id": shop_id}),
        )
        .await
    }

    /// `DELETE /shopOwner/product/delete`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_delete_product(
        &self,
        token: &str,
        product_id: u64,
        shop_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.delete(
            "/shopOwner/product/delete",
            Some(token),
            &[
                ("product_id", product_id.to_string()),
                ("shop_id", shop_id.to_string()),
            ],
        )
        .await
    }

    /// `POST /shopOwner/order/create`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_create_order(
        &self,
        token: &str,
        request: &CreateOrderRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/shopOwner/order/create", Some(token), request)
            .await
    }

    /// `GET /shopOwner/order/list`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_order_list(
        &self,
        token: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/shopOwner/order/list",
            Some(token),
            &[("page", page.to_string()), ("pageSize", page_size.to_string())],
        )
        .await
    }

    /// `GET /shopOwner/order/detail`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_order_detail(
        &self,
        token: &str,
        order_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/shopOwner/order/detail",
            Some(token),
            &[("order_id", order_id.to_string())],
        )
        .await
    }

    /// `PUT /shopOwner/order/update`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_update_order(
        &self,
        token: &str,
        request: &UpdateOrderRequest,
    ) -> Result<Response, reqwest::Error> {
        self.put_json("/shopOwner/order/update", Some(token), request)
            .await
    }

    /// `PUT /shopOwner/order/toggle-status`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_toggle_order_status(
        &self,
        token: &str,
        order_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.put_json(
            "/shopOwner/order/toggle-status",
            Some(token),
            &serde_json::json!({"order_id": order_id}),
        )
        .await
    }

    /// `DELETE /shopOwner/order/delete`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn owner_delete_order(
        &self,
        token: &str,
        order_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.delete(
            "/shopOwner/order/delete",
            Some(token),
            &[("order_id", order_id.to_string())],
        )
        .await
    }
}
