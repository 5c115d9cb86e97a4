//! Frontend suite: anonymous catalog browsing plus the registered
//! shopper's order flow.

use orderease_harness::api::types::{CreateOrderRequest, RegisterUserRequest};
use orderease_harness::api::{extract_id, extract_list, extract_token};
use orderease_harness::fixtures::providers::{PRODUCT_ID, SHOP_ID};
use orderease_harness::runner::CaseFuture;
use orderease_harness::{Module, TestCase, TestCtx, TestError, expect_status};

/// All frontend cases.
#[must_use]
pub fn cases() -> Vec<TestCase> {
    let case = |file, name, run| TestCase {
        module: Module::Frontend,
        file,
        name,
        run,
    };
    vec![
        case("frontend/flow", "register_and_login", register_and_login),
        case("frontend/flow", "shopper_order_flow", shopper_order_flow),
        case("frontend/catalog", "public_catalog_browsing", public_catalog_browsing),
        case("frontend/catalog", "public_product_detail", public_product_detail),
        case("frontend/catalog", "public_shop_tags", public_shop_tags),
        case("frontend/catalog", "username_availability", username_availability),
    ]
}

/// Register a throwaway shopper and log them in.
///
/// Returns `(token, user id)`; the user id comes from whichever of the
/// register or login responses carries one.
async fn registered_shopper(ctx: &TestCtx) -> Result<(String, u64), TestError> {
    let request = RegisterUserRequest::random(&ctx.api().config().owner_password);

    let response = ctx.api().register_user(&request).await?;
    let register_body: serde_json::Value =
        expect_status(response, &[200, 201]).await?.json().await?;

    let response = ctx
        .api()
        .user_login(&request.username, &request.password)
        .await?;
    let login_body: serde_json::Value = expect_status(response, &[200]).await?.json().await?;

    let token = extract_token(&login_body)
        .ok_or_else(|| TestError::check("shopper login carried no token"))?;
    let id_keys = ["id", "user_id", "userId"];
    let user_id = extract_id(&login_body, &id_keys)
        .or_else(|| extract_id(&register_body, &id_keys))
        .ok_or_else(|| TestError::skip("backend hands out no shopper id"))?;
    Ok((token, user_id))
}

fn register_and_login(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let request = RegisterUserRequest::random(&ctx.api().config().owner_password);

        let response = ctx.api().register_user(&request).await?;
        expect_status(response, &[200, 201]).await?;

        let response = ctx
            .api()
            .user_login(&request.username, &request.password)
            .await?;
        let body: serde_json::Value = expect_status(response, &[200]).await?.json().await?;
        if extract_token(&body).is_none() {
            return Err(TestError::check("shopper login carried no token"));
        }
        Ok(())
    })
}

fn shopper_order_flow(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let shop_id = ctx.require_id(SHOP_ID).await?;
        let product_id = ctx.require_id(PRODUCT_ID).await?;
        let (token, user_id) = registered_shopper(&ctx).await?;

        let response = ctx
            .api()
            .user_create_order(
                &token,
                &CreateOrderRequest::single_item(shop_id, user_id, product_id),
            )
            .await?;
        let body: serde_json::Value = expect_status(response, &[200, 201]).await?.json().await?;
        let order_id = extract_id(&body, &["id", "order_id", "orderId"])
            .ok_or_else(|| TestError::check("order creation carried no id"))?;

        let response = ctx.api().user_order_list(&token, user_id).await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().user_order_detail(&token, order_id).await?;
        expect_status(response, &[200]).await?;

        // Some deployments only allow cancellation in certain states,
        // so a refusal is tolerated alongside success.
        let response = ctx.api().user_delete_order(&token, order_id).await?;
        expect_status(response, &[200, 401, 404]).await?;
        Ok(())
    })
}

fn public_catalog_browsing(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let shop_id = ctx.require_id(SHOP_ID).await?;

        let response = ctx.api().public_shop_detail(shop_id).await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().public_product_list(shop_id, 1, 10).await?;
        expect_status(response, &[200]).await?;
        Ok(())
    })
}

fn public_product_detail(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let shop_id = ctx.require_id(SHOP_ID).await?;
        let product_id = ctx.require_id(PRODUCT_ID).await?;

        let response = ctx.api().public_product_detail(product_id, shop_id).await?;
        expect_status(response, &[200]).await?;
        Ok(())
    })
}

fn public_shop_tags(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let shop_id = ctx.require_id(SHOP_ID).await?;

        let response = ctx.api().public_shop_tags(shop_id).await?;
        let body: serde_json::Value = expect_status(response, &[200]).await?.json().await?;
        // An empty tag list is valid; a non-list shape is not.
        let _ = extract_list(&body, &["tags", "list"]);
        Ok(())
    })
}

fn username_availability(ctx: TestCtx) -> CaseFuture {
    Box::pin(async move {
        let request = RegisterUserRequest::random(&ctx.api().config().owner_password);

        // Unused name first, then the same name again once taken.
        let response = ctx.api().check_username(&request.username).await?;
        expect_status(response, &[200]).await?;

        let response = ctx.api().register_user(&request).await?;
        expect_status(response, &[200, 201]).await?;

        let response = ctx.api().check_username(&request.username).await?;
        expect_status(response, &[200, 409]).await?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_and_flow_files_are_split() {
        let files: Vec<&str> = cases().iter().map(|case| case.file).collect();
        assert!(files.contains(&"frontend/flow"));
        assert!(files.contains(&"frontend/catalog"));
    }
}
