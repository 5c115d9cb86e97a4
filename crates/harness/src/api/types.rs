//! Request payloads for the OrderEase backend.
//!
//! The original suite built payloads from loosely-typed keyword maps;
//! here every optional field is an explicit `Option` with a documented
//! default, and the `random` constructors generate collision-free names
//! the way the suite seeds throwaway records.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Serialize;

/// Random lowercase suffix used to de-collide generated names.
#[must_use]
pub fn random_suffix() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Payload for `POST /admin/shop/create`.
///
/// Creating a shop also provisions the shop-owner account named by
/// `owner_username`/`owner_password`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateShopRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub owner_username: String,
    pub owner_password: String,
    pub contact_phone: String,
    pub contact_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
}

impl CreateShopRequest {
    /// A shop with a freshly generated unique owner username.
    #[must_use]
    pub fn with_random_owner(owner_password: &str) -> Self {
        let suffix = random_suffix();
        Self {
            name: format!("Test Shop {suffix}"),
            description: Some("Shop created by the API suite".to_string()),
            address: None,
            owner_username: format!("shop_owner_{suffix}"),
            owner_password: owner_password.to_string(),
            contact_phone: "13800138000".to_string(),
            contact_email: format!("shop_{suffix}@test.com"),
            valid_until: None,
        }
    }
}

/// Payload for `PUT /admin/shop/update`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateShopRequest {
    pub id: u64,
    pub owner_username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for product creation (admin and shop-owner routes).
#[derive(Debug, Clone, Serialize)]
pub struct CreateProductRequest {
    pub shop_id: u64,
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl CreateProductRequest {
    /// A product with a random name and default price under `shop_id`.
    #[must_use]
    pub fn random(shop_id: u64) -> Self {
        Self {
            shop_id,
            name: format!("Test Product {}", random_suffix()),
            price: 100.0,
            description: Some("Product created by the API suite".to_string()),
            stock: Some(50),
        }
    }
}

/// Payload for product updates.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProductRequest {
    pub id: u64,
    pub shop_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// Payload for `POST /admin/user/create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub password: String,
    #[serde(rename = "type")]
    pub user_type: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl CreateUserRequest {
    /// A delivery user with a random name.
    #[must_use]
    pub fn random(password: &str) -> Self {
        Self {
            name: format!("Test User {}", random_suffix()),
            password: password.to_string(),
            user_type: "delivery".to_string(),
            phone: "13800138000".to_string(),
            address: None,
        }
    }
}

/// Payload for `PUT /admin/user/update`.
///
/// The backend addresses users by string id on the update route.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateUserRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Payload for `POST /admin/tag/create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub shop_id: u64,
}

impl CreateTagRequest {
    /// A tag with a random name under `shop_id`.
    #[must_use]
    pub fn random(shop_id: u64) -> Self {
        Self {
            name: format!("Test Tag {}", random_suffix()),
            shop_id,
        }
    }
}

/// A single order line.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub product_id: u64,
    pub quantity: u32,
    pub price: f64,
}

/// Payload for order creation (admin and frontend routes).
///
/// The backend addresses users by string id in order payloads even
/// though it hands them out numerically.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub shop_id: u64,
    pub user_id: String,
    pub items: Vec<OrderItem>,
}

impl CreateOrderRequest {
    /// A one-line order for `product_id` placed by `user_id`.
    #[must_use]
    pub fn single_item(shop_id: u64, user_id: u64, product_id: u64) -> Self {
        Self {
            shop_id,
            user_id: user_id.to_string(),
            items: vec![OrderItem {
                product_id,
                quantity: 1,
                price: 100.0,
            }],
        }
    }
}

/// Payload for order updates (admin and shop-owner routes).
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOrderRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
}

impl UpdateOrderRequest {
    /// An update that only changes the order's remark.
    #[must_use]
    pub fn remark(order_id: u64, shop_id: u64, remark: &str) -> Self {
        Self {
            id: order_id.to_string(),
            user_id: None,
            shop_id: Some(shop_id),
            total_price: None,
            status: None,
            remark: Some(remark.to_string()),
            items: None,
        }
    }
}

/// Payload for `POST /admin/order/advance-search`.
///
/// Filter ids travel as strings, matching the backend's search schema.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSearchRequest {
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

impl OrderSearchRequest {
    /// A search over one shop's orders, unfiltered by user or status.
    #[must_use]
    pub fn for_shop(shop_id: u64, page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            shop_id: Some(shop_id.to_string()),
            user_id: None,
            status: None,
        }
    }
}

/// Payload for `POST /user/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
}

impl RegisterUserRequest {
    /// A frontend user with a random username.
    #[must_use]
    pub fn random(password: &str) -> Self {
        Self {
            username: format!("frontend_{}", random_suffix()),
            password: password.to_string(),
        }
    }
}

/// Payload for the password-change endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_owner_usernames_do_not_collide() {
        let a = CreateShopRequest::with_random_owner("pw");
        let b = CreateShopRequest::with_random_owner("pw");
        assert_ne!(a.owner_username, b.owner_username);
        assert!(a.owner_username.starts_with("shop_owner_"));
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let request = CreateProductRequest {
            shop_id: 1,
            name: "p".to_string(),
            price: 10.0,
            description: None,
            stock: None,
        };
        let json = serde_json::to_value(&request).expect("serializable");
        assert!(json.get("description").is_none());
        assert!(json.get("stock").is_none());
        assert_eq!(json.get("shop_id").and_then(serde_json::Value::as_u64), Some(1));
    }

    #[test]
    fn order_search_uses_camel_case_page_size() {
        let request = OrderSearchRequest::for_shop(7, 1, 20);
        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(
            json.get("pageSize").and_then(serde_json::Value::as_u64),
            Some(20)
        );
        assert_eq!(
            json.get("shop_id").and_then(serde_json::Value::as_str),
            Some("7")
        );
        assert!(json.get("status").is_none());
    }

    #[test]
    fn user_type_serializes_under_backend_key() {
        let request = CreateUserRequest::random("pw");
        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(
            json.get("type").and_then(serde_json::Value::as_str),
            Some("delivery")
        );
        assert!(json.get("user_type").is_none());
    }
}
