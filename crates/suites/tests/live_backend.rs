//! End-to-end scenarios against a real OrderEase deployment.
//!
//! These talk to whatever `API_BASE_URL` points at and are ignored by
//! default; run them with `cargo test -- --ignored` once a backend is
//! up. Each scenario cleans up the records it creates.

use orderease_harness::api::types::{CreateProductRequest, CreateShopRequest};
use orderease_harness::api::{ApiClient, extract_id, extract_token};
use orderease_harness::{SuiteConfig, expect_status};

fn live_client() -> ApiClient {
    let config = SuiteConfig::from_env().expect("suite configuration");
    ApiClient::new(&config).expect("client should build")
}

async fn admin_token(api: &ApiClient) -> String {
    let config = api.config().clone();
    let response = api
        .login(&config.admin_username, &config.admin_password)
        .await
        .expect("login request");
    let body: serde_json::Value = expect_status(response, &[200])
        .await
        .expect("admin login accepted")
        .json()
        .await
        .expect("json body");
    extract_token(&body).expect("login body carries a token")
}

#[tokio::test]
#[ignore = "Requires a running OrderEase backend"]
async fn admin_login_yields_a_token() {
    let api = live_client();
    let token = admin_token(&api).await;
    assert!(!token.is_empty());
}

#[tokio::test]
#[ignore = "Requires a running OrderEase backend"]
async fn provisioned_shop_owner_can_log_in() {
    let api = live_client();
    let token = admin_token(&api).await;

    let request = CreateShopRequest::with_random_owner(&api.config().owner_password);
    let response = api.create_shop(&token, &request).await.expect("create shop");
    let body: serde_json::Value = expect_status(response, &[200, 201])
        .await
        .expect("shop created")
        .json()
        .await
        .expect("json body");
    let shop_id = extract_id(&body, &["id", "shop_id", "shopId"]).expect("shop id");

    let response = api
        .login(&request.owner_username, &request.owner_password)
        .await
        .expect("owner login request");
    let login_ok = expect_status(response, &[200]).await;

    let response = api.delete_shop(&token, shop_id).await.expect("delete shop");
    expect_status(response, &[200, 204]).await.expect("shop deleted");

    login_ok.expect("owner of a fresh shop can log in");
}

#[tokio::test]
#[ignore = "Requires a running OrderEase backend"]
async fn shop_deletion_waits_for_its_products() {
    let api = live_client();
    let token = admin_token(&api).await;

    let shop = CreateShopRequest::with_random_owner(&api.config().owner_password);
    let response = api.create_shop(&token, &shop).await.expect("create shop");
    let body: serde_json::Value = expect_status(response, &[200, 201])
        .await
        .expect("shop created")
        .json()
        .await
        .expect("json body");
    let shop_id = extract_id(&body, &["id", "shop_id", "shopId"]).expect("shop id");

    let response = api
        .create_product(&token, &CreateProductRequest::random(shop_id))
        .await
        .expect("create product");
    let body: serde_json::Value = expect_status(response, &[200, 201])
        .await
        .expect("product created")
        .json()
        .await
        .expect("json body");
    let product_id = extract_id(&body, &["id", "product_id"]).expect("product id");

    // Teardown must mirror creation order reversed: product first,
    // then the shop that contains it.
    let response = api
        .delete_product(&token, product_id, shop_id)
        .await
        .expect("delete product");
    expect_status(response, &[200, 204]).await.expect("product deleted");

    let response = api.delete_shop(&token, shop_id).await.expect("delete shop");
    expect_status(response, &[200, 204]).await.expect("shop deleted");
}

#[tokio::test]
#[ignore = "Requires a running OrderEase backend"]
async fn admin_surface_rejects_anonymous_calls() {
    let api = live_client();
    let response = api
        .get(
            "/admin/shop/list",
            None,
            &[("page", "1".to_string()), ("pageSize", "10".to_string())],
        )
        .await
        .expect("request sent");
    expect_status(response, &[401, 403])
        .await
        .expect("anonymous admin call rejected");
}
