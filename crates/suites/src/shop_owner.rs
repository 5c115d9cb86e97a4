//! Shop-owner suite: the owner-scoped product and order surface.
//!
//! The owner token comes from the session fixture, which provisions a
//! dedicated shop; everything created here lands in that shop and is
//! deleted in-test, so the fixture's shop teardown stays trivial.

use orderease_harness::api::types::{
    CreateOrderRequest, CreateProductRequest, UpdateOrderRequest, UpdateProductRequest,
};
use orderease_harness::api::{extract_id, extract_list};
use orderease_harness::fixtures::providers::{SHOP_OWNER_TOKEN, USER_ID};
use orderease_harness::runner::CaseFuture;
use orderease_harness::{Module, TestCase, TestCtx, TestError, expect_status};

/// All shop-owner cases.
#[must_use]
pub fn cases() -> Vec<TestCase> {
    let case = |name, run| TestCase {
        module: Module::ShopOwner,
        file: "shop_owner/business_flow",
        name,
        run,
    };
    vec![
        case("owner_sees_own_shop", owner_sees_own_shop),
        case("owner_product_lifecycle", owner_product_lifecycle),
        case("owner_order_lifecycle", owner_order_lifecycle),
        case("owner_order_visibility", owner_order_visibility),
    ]
}

/// The owner's own shop id, read from the shop-detail endpoint.
async fn own_shop_id(ctx: &TestCtx, token: &str) -> Result<u64, TestError> {
    let response = ctx.api().owner_shop_detail(token).await?;
    let body: serde_json::Value = expect_status(response, &[200]).await?.json().await?;
    extract_id(&body, &["id", "shop_id", "shopId"])
        .ok_or_else(|| TestError::check("owner shop detail carried no shop id"))
}

fn owner_sees_own_shop(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(SHOP_OWNER_TOKEN).await?;
        own_shop_id(&ctx, &token).await?;
        Ok(())
    })
}

fn owner_product_lifecycle(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(SHOP_OWNER_TOKEN).await?;
        let shop_id = own_shop_id(&ctx, &token).await?;

        let response = ctx
            .api()
            .owner_create_product(&token, &CreateProductRequest::random(shop_id))
            .await?;
        let body: serde_json::Value = expect_status(response, &[200, 201]).await?.json().await?;
        let product_id = extract_id(&body, &["id", "product_id"])
            .ok_or_else(|| TestError::check("owner create product carried no id"))?;

        let response = ctx
            .api()
            .owner_product_detail(&token, product_id, shop_id)
            .await?;
        expect_status(response, &[200]).await?;

        let response = ctx
            .api()
            .owner_update_product(
                &token,
                &UpdateProductRequest {
                    id: product_id,
                    shop_id,
                    name: None,
                    price: Some(19.9),
                    description: None,
                    stock: Some(10),
                },
            )
            .await?;
        expect_status(response, &[200]).await?;

        for _ in 0..2 {
            let response = ctx
                .api()
                .owner_toggle_product_status(&token, product_id, shop_id)
                .await?;
            expect_status(response, &[200]).await?;
        }

        let response = ctx.api().owner_product_list(&token, 1, 10).await?;
        let body: serde_json::Value = expect_status(response, &[200]).await?.json().await?;
        let listed = extract_list(&body, &["products", "list"]);
        let found = listed
            .iter()
            .any(|item| extract_id(item, &["id", "product_id"]) == Some(product_id));
        if !found {
            return Err(TestError::check("created product missing from owner listing"));
        }

        let response = ctx
            .api()
            .owner_delete_product(&token, product_id, shop_id)
            .await?;
        expect_status(response, &[200, 204]).await?;
        Ok(())
    })
}

fn owner_order_lifecycle(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(SHOP_OWNER_TOKEN).await?;
        let user_id = ctx.require_id(USER_ID).await?;
        let shop_id = own_shop_id(&ctx, &token).await?;

        // The order needs a product in the owner's shop to reference.
        let response = ctx
            .api()
            .owner_create_product(&token, &CreateProductRequest::random(shop_id))
            .await?;
        let body: serde_json::Value = expect_status(response, &[200, 201]).await?.json().await?;
        let product_id = extract_id(&body, &["id", "product_id"])
            .ok_or_else(|| TestError::check("owner create product carried no id"))?;

        {
            let api = ctx.api().clone();
            let token = token.clone();
            ctx.on_cleanup(move || async move {
                let response = api.owner_delete_product(&token, product_id, shop_id).await?;
                expect_status(response, &[200, 204, 404]).await?;
                Ok(())
            })
            .await;
        }

        let response = ctx
            .api()
            .owner_create_order(
                &token,
                &CreateOrderRequest::single_item(shop_id, user_id, product_id),
            )
            .await?;
        let body: serde_json::Value = expect_status(response, &[200, 201]).await?.json().await?;
        let order_id = extract_id(&body, &["id", "order_id", "orderId"])
            .ok_or_else(|| TestError::check("owner create order carried no id"))?;

        let response = ctx.api().owner_order_detail(&token, order_id).await?;
        expect_status(response, &[200]).await?;

        let response = ctx
            .api()
            .owner_update_order(
                &token,
                &UpdateOrderRequest::remark(order_id, shop_id, "annotated by owner pass"),
            )
            .await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().owner_toggle_order_status(&token, order_id).await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().owner_delete_order(&token, order_id).await?;
        expect_status(response, &[200, 204]).await?;
        Ok(())
    })
}

fn owner_order_visibility(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let token = ctx.require_token(SHOP_OWNER_TOKEN).await?;

        let response = ctx.api().owner_order_list(&token, 1, 10).await?;
        let body: serde_json::Value = expect_status(response, &[200]).await?.json().await?;

        // A freshly provisioned shop usually has no orders; when one
        // exists, its detail must be readable with the owner token.
        let orders = extract_list(&body, &["orders", "list"]);
        if let Some(order_id) = orders
            .first()
            .and_then(|item| extract_id(item, &["id", "order_id", "orderId"]))
        {
            let response = ctx.api().owner_order_detail(&token, order_id).await?;
            expect_status(response, &[200]).await?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_cases_belong_to_the_owner_module() {
        for case in cases() {
            assert_eq!(case.module, Module::ShopOwner);
            assert_eq!(case.file, "shop_owner/business_flow");
        }
    }
}
