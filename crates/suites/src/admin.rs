//! Platform-admin suite: full create/read/update/delete passes over
//! shops, products, users, tags and orders.
//!
//! Lifecycle cases create their own records and delete them in-test so
//! they leave nothing behind even on a shared backend; shared records
//! (the fixture shop, product and user) are only read, never mutated.

use orderease_harness::api::types::{
    CreateOrderRequest, CreateProductRequest, CreateShopRequest, CreateTagRequest,
    CreateUserRequest, OrderSearchRequest, UpdateOrderRequest, UpdateProductRequest,
    UpdateShopRequest, UpdateUserRequest,
};
use orderease_harness::api::{extract_id, extract_list};
use orderease_harness::fixtures::providers::{
    ADMIN_TOKEN, ORDER_ID, PRODUCT_ID, SHOP_ID, USER_ID,
};
use orderease_harness::runner::CaseFuture;
use orderease_harness::{Module, TestCase, TestCtx, TestError, expect_status};

/// All admin cases.
#[must_use]
pub fn cases() -> Vec<TestCase> {
    let case = |name, run| TestCase {
        module: Module::Admin,
        file: "admin/business_flow",
        name,
        run,
    };
    vec![
        case("shop_lifecycle", shop_lifecycle),
        case("product_lifecycle", product_lifecycle),
        case("user_lifecycle", user_lifecycle),
        case("tag_binding", tag_binding),
        case("order_lifecycle", order_lifecycle),
        case("order_search_and_flow", order_search_and_flow),
        case("image_uploads", image_uploads),
        case("listings_paginate", listings_paginate),
    ]
}

/// Smallest payload the backend's image sniffing accepts: a JPEG
/// SOI/APP0 header followed by an EOI marker.
const FAKE_JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
];

async fn created_id(
    response: reqwest::Response,
    keys: &[&str],
    what: &str,
) -> Result<u64, TestError> {
    let body: serde_json::Value = expect_status(response, &[200, 201]).await?.json().await?;
    extract_id(&body, keys).ok_or_else(|| TestError::check(format!("{what} response carried no id")))
}

fn shop_lifecycle(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(ADMIN_TOKEN).await?;
        let request = CreateShopRequest::with_random_owner(&ctx.api().config().owner_password);
        let name = request.name.clone();
        let owner_username = request.owner_username.clone();

        let response = ctx.api().create_shop(&token, &request).await?;
        let shop_id = created_id(response, &["id", "shop_id", "shopId"], "create shop").await?;

        // Guarantee teardown even if a later step fails.
        {
            let api = ctx.api().clone();
            let token = token.clone();
            ctx.on_cleanup(move || async move {
                let response = api.delete_shop(&token, shop_id).await?;
                expect_status(response, &[200, 204, 404]).await?;
                Ok(())
            })
            .await;
        }

        let response = ctx.api().shop_detail(&token, shop_id).await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().check_shop_name(&token, &name).await?;
        expect_status(response, &[200]).await?;

        let response = ctx
            .api()
            .update_shop(
                &token,
                &UpdateShopRequest {
                    id: shop_id,
                    owner_username,
                    name: Some(format!("{name} (renamed)")),
                    description: None,
                },
            )
            .await?;
        expect_status(response, &[200]).await?;

        let flow = serde_json::json!(["pending", "confirmed", "shipped", "delivered"]);
        let response = ctx
            .api()
            .update_order_status_flow(&token, shop_id, &flow)
            .await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().delete_shop(&token, shop_id).await?;
        expect_status(response, &[200, 204]).await?;
        Ok(())
    })
}

fn product_lifecycle(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(ADMIN_TOKEN).await?;
        let shop_id = ctx.require_id(SHOP_ID).await?;

        let response = ctx
            .api()
            .create_product(&token, &CreateProductRequest::random(shop_id))
            .await?;
        let product_id = created_id(response, &["id", "product_id"], "create product").await?;

        let response = ctx.api().product_detail(&token, product_id, shop_id).await?;
        expect_status(response, &[200]).await?;

        let response = ctx
            .api()
            .update_product(
                &token,
                &UpdateProductRequest {
                    id: product_id,
                    shop_id,
                    name: None,
                    price: Some(42.5),
                    description: Some("updated by lifecycle pass".to_string()),
                    stock: None,
                },
            )
            .await?;
        expect_status(response, &[200]).await?;

        // Off and back on again, so the shop's visible catalog is
        // unchanged when the test leaves.
        for _ in 0..2 {
            let response = ctx
                .api()
                .toggle_product_status(&token, product_id, shop_id)
                .await?;
            expect_status(response, &[200]).await?;
        }

        let response = ctx.api().delete_product(&token, product_id, shop_id).await?;
        expect_status(response, &[200, 204]).await?;
        Ok(())
    })
}

fn user_lifecycle(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(ADMIN_TOKEN).await?;
        let password = ctx.api().config().owner_password.clone();

        let response = ctx
            .api()
            .create_user(&token, &CreateUserRequest::random(&password))
            .await?;
        let user_id = created_id(response, &["id", "user_id", "userId"], "create user").await?;

        let response = ctx.api().user_detail(&token, user_id).await?;
        expect_status(response, &[200]).await?;

        let response = ctx
            .api()
            .update_user(
                &token,
                &UpdateUserRequest {
                    id: user_id.to_string(),
                    name: Some("Renamed Delivery User".to_string()),
                    address: None,
                },
            )
            .await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().user_list(&token, 1, 10).await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().user_simple_list(&token).await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().delete_user(&token, user_id).await?;
        expect_status(response, &[200, 204]).await?;
        Ok(())
    })
}

fn tag_binding(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(ADMIN_TOKEN).await?;
        let shop_id = ctx.require_id(SHOP_ID).await?;
        let product_id = ctx.require_id(PRODUCT_ID).await?;

        let response = ctx
            .api()
            .create_tag(&token, &CreateTagRequest::random(shop_id))
            .await?;
        let tag_id = created_id(response, &["id", "tag_id"], "create tag").await?;

        let response = ctx
            .api()
            .batch_tag_products(&token, &[product_id], &[tag_id])
            .await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().bound_tags(&token, product_id).await?;
        let body: serde_json::Value = expect_status(response, &[200]).await?.json().await?;
        let bound = extract_list(&body, &["tags", "list"]);
        if bound.is_empty() {
            return Err(TestError::check("batch-tagged product reports no bound tags"));
        }

        // The freshly bound tag must no longer show up as unbound.
        let response = ctx.api().unbound_tags(&token, product_id, shop_id).await?;
        let body: serde_json::Value = expect_status(response, &[200]).await?.json().await?;
        let unbound = extract_list(&body, &["tags", "list"]);
        if unbound.iter().any(|tag| extract_id(tag, &["id", "tag_id"]) == Some(tag_id)) {
            return Err(TestError::check("bound tag still listed as unbound"));
        }

        let response = ctx.api().tag_online_products(&token, tag_id, shop_id).await?;
        expect_status(response, &[200]).await?;
        Ok(())
    })
}

fn order_lifecycle(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(ADMIN_TOKEN).await?;
        let shop_id = ctx.require_id(SHOP_ID).await?;
        let user_id = ctx.require_id(USER_ID).await?;
        let product_id = ctx.require_id(PRODUCT_ID).await?;

        let response = ctx
            .api()
            .create_order(
                &token,
                &CreateOrderRequest::single_item(shop_id, user_id, product_id),
            )
            .await?;
        let order_id = created_id(response, &["id", "order_id", "orderId"], "create order").await?;

        let response = ctx.api().order_detail(&token, order_id).await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().toggle_order_status(&token, order_id).await?;
        expect_status(response, &[200]).await?;

        let response = ctx
            .api()
            .update_order(
                &token,
                &UpdateOrderRequest::remark(order_id, shop_id, "annotated by lifecycle pass"),
            )
            .await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().order_list(&token, Some(shop_id), 1, 10).await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().delete_order(&token, order_id).await?;
        expect_status(response, &[200, 204]).await?;
        Ok(())
    })
}

fn order_search_and_flow(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(ADMIN_TOKEN).await?;
        let shop_id = ctx.require_id(SHOP_ID).await?;
        let order_id = ctx.require_id(ORDER_ID).await?;

        let response = ctx.api().order_status_flow(&token, order_id, shop_id).await?;
        expect_status(response, &[200]).await?;

        let response = ctx
            .api()
            .order_advance_search(&token, &OrderSearchRequest::for_shop(shop_id, 1, 10))
            .await?;
        let body: serde_json::Value = expect_status(response, &[200]).await?.json().await?;
        let orders = extract_list(&body, &["orders", "list"]);
        if !orders
            .iter()
            .any(|order| extract_id(order, &["id", "order_id", "orderId"]) == Some(order_id))
        {
            return Err(TestError::check(
                "shop-scoped advance search did not return the fixture order",
            ));
        }
        Ok(())
    })
}

fn image_uploads(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(ADMIN_TOKEN).await?;
        let shop_id = ctx.require_id(SHOP_ID).await?;
        let product_id = ctx.require_id(PRODUCT_ID).await?;

        let response = ctx
            .api()
            .upload_shop_image(&token, shop_id, FAKE_JPEG.to_vec())
            .await?;
        expect_status(response, &[200]).await?;

        let response = ctx
            .api()
            .upload_product_image(&token, product_id, FAKE_JPEG.to_vec())
            .await?;
        expect_status(response, &[200]).await?;
        Ok(())
    })
}

fn listings_paginate(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(ADMIN_TOKEN).await?;

        let response = ctx.api().shop_list(&token, 1, 5).await?;
        let body: serde_json::Value = expect_status(response, &[200]).await?.json().await?;
        let shops = extract_list(&body, &["shops", "list"]);
        if shops.len() > 5 {
            return Err(TestError::check(format!(
                "asked for a page of 5 shops, got {}",
                shops.len()
            )));
        }

        let response = ctx.api().product_list(&token, None, 1, 5).await?;
        expect_status(response, &[200]).await?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_cases_live_in_the_business_flow_file() {
        for case in cases() {
            assert_eq!(case.file, "admin/business_flow");
            assert_eq!(case.module, Module::Admin);
        }
    }
}
