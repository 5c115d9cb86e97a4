//! Standard OrderEase fixture providers.
//!
//! Every provider follows the same defensive policy: discover an
//! existing record through the list endpoint first, create one only
//! when none exists, and degrade to the unavailable sentinel on any
//! failure so dependent tests skip instead of failing. Records the
//! providers create themselves are deleted again at session teardown;
//! because a product provider resolves (and therefore registers its
//! cleanup) after the shop provider, reverse-order teardown deletes the
//! product before its shop.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::{info, warn};

use crate::api::types::{
    CreateOrderRequest, CreateProductRequest, CreateShopRequest, CreateTagRequest,
    CreateUserRequest,
};
use crate::api::{Role, extract_id, extract_list};
use crate::fixtures::{
    BuildFuture, FixtureRegistry, FixtureValue, Provider, ProviderCtx, ScopeKind, ValueKind,
};

/// Session bearer token for the platform admin.
pub const ADMIN_TOKEN: &str = "admin_token";
/// Session bearer token for a freshly provisioned shop owner.
pub const SHOP_OWNER_TOKEN: &str = "shop_owner_token";
/// A shop id usable for admin-side resource tests.
pub const SHOP_ID: &str = "shop_id";
/// A product id under [`SHOP_ID`].
pub const PRODUCT_ID: &str = "product_id";
/// A delivery-user id.
pub const USER_ID: &str = "user_id";
/// A tag id under [`SHOP_ID`].
pub const TAG_ID: &str = "tag_id";
/// An order id under [`SHOP_ID`] referencing [`USER_ID`] and [`PRODUCT_ID`].
pub const ORDER_ID: &str = "order_id";

/// Wait between creating a shop-owner account and logging in as it;
/// the backend propagates new accounts asynchronously.
const OWNER_PROPAGATION_WAIT: Duration = Duration::from_millis(500);

/// The full provider set used by the suites.
#[must_use]
pub fn standard_registry() -> FixtureRegistry {
    let mut registry = FixtureRegistry::new();
    registry.register(Provider::new(
        ADMIN_TOKEN,
        ValueKind::Token,
        ScopeKind::Session,
        &[],
        admin_token,
    ));
    registry.register(Provider::new(
        SHOP_OWNER_TOKEN,
        ValueKind::Token,
        ScopeKind::Session,
        &[ADMIN_TOKEN],
        shop_owner_token,
    ));
    registry.register(Provider::new(
        SHOP_ID,
        ValueKind::Id,
        ScopeKind::Session,
        &[ADMIN_TOKEN],
        shop_id,
    ));
    registry.register(Provider::new(
        PRODUCT_ID,
        ValueKind::Id,
        ScopeKind::Session,
        &[ADMIN_TOKEN, SHOP_ID],
        product_id,
    ));
    registry.register(Provider::new(
        USER_ID,
        ValueKind::Id,
        ScopeKind::Session,
        &[ADMIN_TOKEN],
        user_id,
    ));
    registry.register(Provider::new(
        TAG_ID,
        ValueKind::Id,
        ScopeKind::Session,
        &[ADMIN_TOKEN, SHOP_ID],
        tag_id,
    ));
    registry.register(Provider::new(
        ORDER_ID,
        ValueKind::Id,
        ScopeKind::Session,
        &[ADMIN_TOKEN, SHOP_ID, USER_ID, PRODUCT_ID],
        order_id,
    ));
    registry
}

/// Decode a `200` response body as JSON; anything else is `None`.
async fn ok_body(response: Response) -> Option<Value> {
    if response.status() != StatusCode::OK {
        warn!(status = %response.status(), url = %response.url(), "fixture request refused");
        return None;
    }
    match response.json().await {
        Ok(body) => Some(body),
        Err(error) => {
            warn!(%error, "fixture response was not valid JSON");
            None
        }
    }
}

/// First id found in a list response, trying the given list and id keys.
fn first_listed_id(body: &Value, list_keys: &[&str], id_keys: &[&str]) -> Option<u64> {
    extract_list(body, list_keys)
        .iter()
        .find_map(|item| extract_id(item, id_keys))
}

fn admin_token(ctx: ProviderCtx) -> BuildFuture {
    Box::pin(async move {
        let config = ctx.api().config().clone();
        let login = ctx
            .api()
            .login_credential(Role::Admin, &config.admin_username, &config.admin_password)
            .await;
        match login {
            Ok(Some(credential)) => FixtureValue::Token(credential.token),
            Ok(None) => {
                warn!("admin login refused by backend");
                ValueKind::Token.unavailable()
            }
            Err(error) => {
                warn!(%error, "admin login failed");
                ValueKind::Token.unavailable()
            }
        }
    })
}

fn shop_owner_token(ctx: ProviderCtx) -> BuildFuture {
    Box::pin(async move {
        let Some(admin) = ctx.token(ADMIN_TOKEN) else {
            return ValueKind::Token.unavailable();
        };
        let api = ctx.api().clone();
        let request = CreateShopRequest::with_random_owner(&api.config().owner_password);

        let created = match api.create_shop(&admin, &request).await {
            Ok(response) => ok_body(response).await,
            Err(error) => {
                warn!(%error, "shop creation for owner token failed");
                None
            }
        };
        let Some(body) = created else {
            return ValueKind::Token.unavailable();
        };

        if let Some(shop_id) = extract_id(&body, &["id", "shop_id", "shopId"]) {
            let api = api.clone();
            let admin = admin.clone();
            ctx.on_cleanup(move || async move {
                api.delete_shop(&admin, shop_id).await?;
                Ok(())
            });
        }

        // New owner accounts are not immediately loginable.
        tokio::time::sleep(OWNER_PROPAGATION_WAIT).await;

        let login = api
            .login_credential(
                Role::ShopOwner,
                &request.owner_username,
                &request.owner_password,
            )
            .await;
        match login {
            Ok(Some(credential)) => {
                info!(owner = %request.owner_username, "shop owner provisioned");
                FixtureValue::Token(credential.token)
            }
            Ok(None) => {
                warn!(owner = %request.owner_username, "owner login refused");
                ValueKind::Token.unavailable()
            }
            Err(error) => {
                warn!(%error, "owner login failed");
                ValueKind::Token.unavailable()
            }
        }
    })
}

fn shop_id(ctx: ProviderCtx) -> BuildFuture {
    Box::pin(async move {
        let Some(admin) = ctx.token(ADMIN_TOKEN) else {
            return ValueKind::Id.unavailable();
        };
        let api = ctx.api().clone();

        if let Ok(response) = api.shop_list(&admin, 1, 10).await
            && let Some(body) = ok_body(response).await
            && let Some(id) = first_listed_id(&body, &["shops"], &["id", "shop_id", "shopId"])
        {
            return FixtureValue::Id(Some(id));
        }

        let request = CreateShopRequest::with_random_owner(&api.config().owner_password);
        let created = match api.create_shop(&admin, &request).await {
            Ok(response) => ok_body(response).await,
            Err(error) => {
                warn!(%error, "shop creation failed");
                None
            }
        };
        let id = created.and_then(|body| extract_id(&body, &["id", "shop_id", "shopId"]));
        if let Some(id) = id {
            let api = api.clone();
            ctx.on_cleanup(move || async move {
                api.delete_shop(&admin, id).await?;
                Ok(())
            });
        }
        FixtureValue::Id(id)
    })
}

fn product_id(ctx: ProviderCtx) -> BuildFuture {
    Box::pin(async move {
        let (Some(admin), Some(shop)) = (ctx.token(ADMIN_TOKEN), ctx.id(SHOP_ID)) else {
            return ValueKind::Id.unavailable();
        };
        let api = ctx.api().clone();

        if let Ok(response) = api.product_list(&admin, Some(shop), 1, 10).await
            && let Some(body) = ok_body(response).await
            && let Some(id) =
                first_listed_id(&body, &["products"], &["id", "product_id", "productId"])
        {
            return FixtureValue::Id(Some(id));
        }

        let request = CreateProductRequest::random(shop);
        let created = match api.create_product(&admin, &request).await {
            Ok(response) => ok_body(response).await,
            Err(error) => {
                warn!(%error, "product creation failed");
                None
            }
        };
        let id = created.and_then(|body| extract_id(&body, &["id", "product_id", "productId"]));
        if let Some(id) = id {
            let api = api.clone();
            ctx.on_cleanup(move || async move {
                api.delete_product(&admin, id, shop).await?;
                Ok(())
            });
        }
        FixtureValue::Id(id)
    })
}

fn user_id(ctx: ProviderCtx) -> BuildFuture {
    Box::pin(async move {
        let Some(admin) = ctx.token(ADMIN_TOKEN) else {
            return ValueKind::Id.unavailable();
        };
        let api = ctx.api().clone();

        if let Ok(response) = api.user_list(&admin, 1, 10).await
            && let Some(body) = ok_body(response).await
            && let Some(id) = first_listed_id(&body, &["users"], &["id", "user_id", "userId"])
        {
            return FixtureValue::Id(Some(id));
        }

        let request = CreateUserRequest::random(&api.config().owner_password);
        let created = match api.create_user(&admin, &request).await {
            Ok(response) => ok_body(response).await,
            Err(error) => {
                warn!(%error, "user creation failed");
                None
            }
        };
        let id = created.and_then(|body| extract_id(&body, &["id", "user_id", "userId"]));
        if let Some(id) = id {
            let api = api.clone();
            ctx.on_cleanup(move || async move {
                api.delete_user(&admin, id).await?;
                Ok(())
            });
        }
        FixtureValue::Id(id)
    })
}

fn tag_id(ctx: ProviderCtx) -> BuildFuture {
    Box::pin(async move {
        let (Some(admin), Some(shop)) = (ctx.token(ADMIN_TOKEN), ctx.id(SHOP_ID)) else {
            return ValueKind::Id.unavailable();
        };
        let api = ctx.api().clone();

        if let Ok(response) = api.public_shop_tags(shop).await
            && let Some(body) = ok_body(response).await
            && let Some(id) = first_listed_id(&body, &["tags"], &["id", "tag_id", "tagId"])
        {
            return FixtureValue::Id(Some(id));
        }

        // The backend has no tag delete endpoint; created tags stay.
        let request = CreateTagRequest::random(shop);
        let created = match api.create_tag(&admin, &request).await {
            Ok(response) => ok_body(response).await,
            Err(error) => {
                warn!(%error, "tag creation failed");
                None
            }
        };
        FixtureValue::Id(created.and_then(|body| extract_id(&body, &["id", "tag_id", "tagId"])))
    })
}

fn order_id(ctx: ProviderCtx) -> BuildFuture {
    Box::pin(async move {
        let (Some(admin), Some(shop), Some(user), Some(product)) = (
            ctx.token(ADMIN_TOKEN),
            ctx.id(SHOP_ID),
            ctx.id(USER_ID),
            ctx.id(PRODUCT_ID),
        ) else {
            return ValueKind::Id.unavailable();
        };
        let api = ctx.api().clone();

        if let Ok(response) = api.order_list(&admin, Some(shop), 1, 10).await
            && let Some(body) = ok_body(response).await
            && let Some(id) = first_listed_id(&body, &["orders"], &["id", "order_id", "orderId"])
        {
            return FixtureValue::Id(Some(id));
        }

        let request = CreateOrderRequest::single_item(shop, user, product);
        let created = match api.create_order(&admin, &request).await {
            Ok(response) => ok_body(response).await,
            Err(error) => {
                warn!(%error, "order creation failed");
                None
            }
        };
        let id = created.and_then(|body| extract_id(&body, &["id", "order_id", "orderId"]));
        if let Some(id) = id {
            let api = api.clone();
            ctx.on_cleanup(move || async move {
                api.delete_order(&admin, id).await?;
                Ok(())
            });
        }
        FixtureValue::Id(id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_is_acyclic_and_complete() {
        let registry = standard_registry();
        registry.validate().expect("standard graph must validate");
    }

    #[test]
    fn listed_id_discovery_prefers_first_record() {
        let body = serde_json::json!({"data": [{"id": 3}, {"id": 4}]});
        assert_eq!(first_listed_id(&body, &["shops"], &["id"]), Some(3));
    }
}
