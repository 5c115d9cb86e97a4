//! Platform-admin endpoints (`/admin/...`).

use reqwest::Response;

use super::ApiClient;
use super::types::{
    CreateOrderRequest, CreateProductRequest, CreateShopRequest, CreateTagRequest,
    CreateUserRequest, OrderSearchRequest, UpdateOrderRequest, UpdateProductRequest,
    UpdateShopRequest, UpdateUserRequest,
};

fn page_query(page: u32, page_size: u32) -> [(&'static str, String); 2] {
    [("page", page.to_string()), ("pageSize", page_size.to_string())]
}

impl ApiClient {
    // =========================================================================
    // Shops
    // =========================================================================

    /// `POST /admin/shop/create` - also provisions the owner account.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn create_shop(
        &self,
        token: &str,
        request: &CreateShopRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/admin/shop/create", Some(token), request)
            .await
    }

    /// `GET /admin/shop/list`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn shop_list(
        &self,
        token: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Response, reqwest::Error> {
        self.get("/admin/shop/list", Some(token), &page_query(page, page_size))
            .await
    }

    /// `GET /admin/shop/detail`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn shop_detail(&self, token: &str, shop_id: u64) -> Result<Response, reqwest::Error> {
        self.get(
            "/admin/shop/detail",
            Some(token),
            &[("shop_id", shop_id.to_string())],
        )
        .await
    }

    /// `PUT /admin/shop/update`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn update_shop(
        &self,
        token: &str,
        request: &UpdateShopRequest,
    ) -> Result<Response, reqwest::Error> {
        self.put_json("/admin/shop/update", Some(token), request)
            .await
    }

    /// `DELETE /admin/shop/delete`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn delete_shop(&self, token: &str, shop_id: u64) -> Result<Response, reqwest::Error> {
        self.delete(
            "/admin/shop/delete",
            Some(token),
            &[("shop_id", shop_id.to_string())],
        )
        .await
    }

    /// `GET /admin/shop/check-name`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn check_shop_name(&self, token: &str, name: &str) -> Result<Response, reqwest::Error> {
        self.get(
            "/admin/shop/check-name",
            Some(token),
            &[("name", name.to_string())],
        )
        .await
    }

    /// `POST /admin/shop/upload-image` (multipart `image` field).
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn upload_shop_image(
        &self,
        token: &str,
        shop_id: u64,
        image: Vec<u8>,
    ) -> Result<Response, reqwest::Error> {
        self.post_image(
            "/admin/shop/upload-image",
            Some(token),
            &[("id", shop_id.to_string())],
            image,
        )
        .await
    }

    /// `PUT /admin/shop/update-order-status-flow` - replace the shop's
    /// configurable order status machine.
    ///
    /// The flow document is free-form backend configuration, so it is
    /// passed as raw JSON rather than a typed payload.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn update_order_status_flow(
        &self,
        token: &str,
        shop_id: u64,
        status_flow: &serde_json::Value,
    ) -> Result<Response, reqwest::Error> {
        self.put_json(
            "/admin/shop/update-order-status-flow",
            Some(token),
            &serde_json::json!({"shop_id": shop_id, "status_flow": status_flow}),
        )
        .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// `POST /admin/product/create`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn create_product(
        &self,
        token: &str,
        request: &CreateProductRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/admin/product/create", Some(token), request)
            .await
    }

    /// `GET /admin/product/list`, optionally filtered by shop.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn product_list(
        &self,
        token: &str,
        shop_id: Option<u64>,
        page: u32,
        page_size: u32,
    ) -> Result<Response, reqwest::Error> {
        let mut query: Vec<(&str, String)> = page_query(page, page_size).to_vec();
        if let Some(shop_id) = shop_id {
            query.push(("shop_id", shop_id.to_string()));
        }
        self.get("/admin/product/list", Some(token), &query).await
    }

    /// `GET /admin/product/detail`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn product_detail(
        &self,
        token: &str,
        product_id: u64,
        shop_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/admin/product/detail",
            Some(token),
            &[
                ("product_id", product_id.to_string()),
                ("shop_id", shop_id.to_string()),
            ],
        )
        .await
    }

    /// `PUT /admin/product/update`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn update_product(
        &self,
        token: &str,
        request: &UpdateProductRequest,
    ) -> Result<Response, reqwest::Error> {
        self.put_json("/admin/product/update", Some(token), request)
            .await
    }

    /// `PUT /admin/product/toggle-status`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn toggle_product_status(
        &self,
        token: &str,
        product_id: u64,
        shop_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.put_json(
            "/admin/product/toggle-status",
            Some(token),
            &serde_json::json!({"id": product_id, "shop_id": shop_id}),
        )
        .await
    }

    /// `DELETE /admin/product/delete`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn delete_product(
        &self,
        token: &str,
        product_id: u64,
        shop_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.delete(
            "/admin/product/delete",
            Some(token),
            &[
                ("product_id", product_id.to_string()),
                ("shop_id", shop_id.to_string()),
            ],
        )
        .await
    }

    /// `POST /admin/product/upload-image` (multipart `image` field).
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn upload_product_image(
        &self,
        token: &str,
        product_id: u64,
        image: Vec<u8>,
    ) -> Result<Response, reqwest::Error> {
        self.post_image(
            "/admin/product/upload-image",
            Some(token),
            &[("id", product_id.to_string())],
            image,
        )
        .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// `POST /admin/user/create`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn create_user(
        &self,
        token: &str,
        request: &CreateUserRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/admin/user/create", Some(token), request)
            .await
    }

    /// `GET /admin/user/list`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn user_list(
        &self,
        token: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Response, reqwest::Error> {
        self.get("/admin/user/list", Some(token), &page_query(page, page_size))
            .await
    }

    /// `GET /admin/user/simple-list`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn user_simple_list(&self, token: &str) -> Result<Response, reqwest::Error> {
        self.get("/admin/user/simple-list", Some(token), &[]).await
    }

    /// `GET /admin/user/detail`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn user_detail(&self, token: &str, user_id: u64) -> Result<Response, reqwest::Error> {
        self.get(
            "/admin/user/detail",
            Some(token),
            &[("id", user_id.to_string())],
        )
        .await
    }

    /// `PUT /admin/user/update`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn update_user(
        &self,
        token: &str,
        request: &UpdateUserRequest,
    ) -> Result<Response, reqwest::Error> {
        self.put_json("/admin/user/update", Some(token), request)
            .await
    }

    /// `DELETE /admin/user/delete`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn delete_user(&self, token: &str, user_id: u64) -> Result<Response, reqwest::Error> {
        self.delete(
            "/admin/user/delete",
            Some(token),
            &[("user_id", user_id.to_string())],
        )
        .await
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// `POST /admin/tag/create`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn create_tag(
        &self,
        token: &str,
        request: &CreateTagRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/admin/tag/create", Some(token), request)
            .await
    }

    /// `POST /admin/tag/batch-tag` - attach tags to products in bulk.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn batch_tag_products(
        &self,
        token: &str,
        product_ids: &[u64],
        tag_ids: &[u64],
    ) -> Result<Response, reqwest::Error> {
        self.post_json(
            "/admin/tag/batch-tag",
            Some(token),
            &serde_json::json!({"product_ids": product_ids, "tag_ids": tag_ids}),
        )
        .await
    }

    /// `GET /admin/tag/bound-tags` for a product.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn bound_tags(
        &self,
        token: &str,
        product_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/admin/tag/bound-tags",
            Some(token),
            &[("product_id", product_id.to_string())],
        )
        .await
    }

    /// `GET /admin/tag/unbound-tags` - tags a product does not carry yet.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn unbound_tags(
        &self,
        token: &str,
        product_id: u64,
        shop_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/admin/tag/unbound-tags",
            Some(token),
            &[
                ("product_id", product_id.to_string()),
                ("shop_id", shop_id.to_string()),
            ],
        )
        .await
    }

    /// `GET /admin/tag/online-products` - live products carrying a tag.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn tag_online_products(
        &self,
        token: &str,
        tag_id: u64,
        shop_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/admin/tag/online-products",
            Some(token),
            &[
                ("tag_id", tag_id.to_string()),
                ("shop_id", shop_id.to_string()),
            ],
        )
        .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// `POST /admin/order/create`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn create_order(
        &self,
        token: &str,
        request: &CreateOrderRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/admin/order/create", Some(token), request)
            .await
    }

    /// `GET /admin/order/list`, optionally filtered by shop.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn order_list(
        &self,
        token: &str,
        shop_id: Option<u64>,
        page: u32,
        page_size: u32,
    ) -> Result<Response, reqwest::Error> {
        let mut query: Vec<(&str, String)> = page_query(page, page_size).to_vec();
        if let Some(shop_id) = shop_id {
            query.push(("shop_id", shop_id.to_string()));
        }
        self.get("/admin/order/list", Some(token), &query).await
    }

    /// `GET /admin/order/detail`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn order_detail(
        &self,
        token: &str,
        order_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/admin/order/detail",
            Some(token),
            &[("order_id", order_id.to_string())],
        )
        .await
    }

    /// `PUT /admin/order/toggle-status` - advance an order through its
    /// configured status flow.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn toggle_order_status(
        &self,
        token: &str,
        order_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.put_json(
            "/admin/order/toggle-status",
            Some(token),
            &serde_json::json!({"order_id": order_id}),
        )
        .await
    }

    /// `PUT /admin/order/update`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn update_order(
        &self,
        token: &str,
        request: &UpdateOrderRequest,
    ) -> Result<Response, reqwest::Error> {
        self.put_json("/admin/order/update", Some(token), request)
            .await
    }

    /// `GET /admin/order/status-flow` - the status machine applying to
    /// one order. Query keys are camelCase on this route.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn order_status_flow(
        &self,
        token: &str,
        order_id: u64,
        shop_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.get(
            "/admin/order/status-flow",
            Some(token),
            &[
                ("orderId", order_id.to_string()),
                ("shopId", shop_id.to_string()),
            ],
        )
        .await
    }

    /// `POST /admin/order/advance-search`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn order_advance_search(
        &self,
        token: &str,
        request: &OrderSearchRequest,
    ) -> Result<Response, reqwest::Error> {
        self.post_json("/admin/order/advance-search", Some(token), request)
            .await
    }

    /// `DELETE /admin/order/delete`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on transport failure only.
    pub async fn delete_order(
        &self,
        token: &str,
        order_id: u64,
    ) -> Result<Response, reqwest::Error> {
        self.delete(
            "/admin/order/delete",
            Some(token),
            &[("order_id", order_id.to_string())],
        )
        .await
    }
}
