use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::models::{Interaction, ListedProduct, Product, Signal, User};

/// Canonicalizes a store-native identifier to a plain string.
///
/// Accepts extended-JSON object-id wrappers, plain strings and integer
/// keys; everything downstream compares identifiers as strings only.
pub fn canonical_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => match map.get("$oid") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        },
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Canonicalizes a date field. Unparseable representations become `None`
/// (the missing marker) rather than an error.
pub fn canonical_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Value::Object(map) => map.get("$date").and_then(canonical_date),
        _ => None,
    }
}

fn text_field(doc: &Value, key: &str) -> Option<String> {
    match doc.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn numeric_field(doc: &Value, key: &str) -> Option<f64> {
    match doc.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Normalizes the loosely-typed `tags` field: absent, a scalar or a list
/// all become a plain list of strings.
fn tags_field(doc: &Value) -> Vec<String> {
    match doc.get("tags") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn listed_products(doc: &Value, key: &str) -> Vec<ListedProduct> {
    let Some(Value::Array(entries)) = doc.get(key) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            if !entry.is_object() {
                return None;
            }
            let product_id = canonical_id(entry.get("_id")?)?;
            Some(ListedProduct {
                product_id,
                quantity: entry.get("quantity").and_then(Value::as_i64),
                size: text_field(entry, "size"),
            })
        })
        .collect()
}

/// Lifts a user document into the typed record. Only the fields the
/// pipeline consumes are read; contact and credential fields never leave
/// the raw document. Returns `None` when the identifier is unusable.
pub fn normalize_user(doc: &Value) -> Option<User> {
    let id = canonical_id(doc.get("_id")?)?;
    Some(User {
        id,
        username: text_field(doc, "username").unwrap_or_default(),
        cart: listed_products(doc, "cartProducts"),
        wishlist: listed_products(doc, "wishListProducts"),
    })
}

pub fn normalize_interaction(doc: &Value) -> Option<Interaction> {
    let user_id = canonical_id(doc.get("userId")?)?;
    let product_id = canonical_id(doc.get("productId")?)?;
    Some(Interaction {
        user_id,
        product_id,
        date: doc.get("interactionDate").and_then(canonical_date),
        kind: text_field(doc, "type").map(Signal::from),
    })
}

pub fn normalize_product(doc: &Value) -> Option<Product> {
    let id = canonical_id(doc.get("_id")?)?;
    Some(Product {
        id,
        title: text_field(doc, "title"),
        description: text_field(doc, "description"),
        category: text_field(doc, "category"),
        subcategory: text_field(doc, "subcategory"),
        tags: tags_field(doc),
        brand: text_field(doc, "brand"),
        sku: text_field(doc, "sku"),
        price: numeric_field(doc, "price"),
        discount_percentage: numeric_field(doc, "discountPercentage"),
        rating: numeric_field(doc, "rating"),
        stock: numeric_field(doc, "stock"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_forms_canonicalize_to_the_same_string() {
        let hex = "64a51f0c2f8fb814c8f1a001";
        assert_eq!(canonical_id(&json!({"$oid": hex})).as_deref(), Some(hex));
        assert_eq!(canonical_id(&json!(hex)).as_deref(), Some(hex));
        assert_eq!(canonical_id(&json!(42)).as_deref(), Some("42"));
        assert_eq!(canonical_id(&json!(null)), None);
    }

    #[test]
    fn bad_dates_become_missing() {
        assert!(canonical_date(&json!("not-a-date")).is_none());
        assert!(canonical_date(&json!("2024-03-01T12:00:00Z")).is_some());
        assert!(canonical_date(&json!(1_709_294_400_000i64)).is_some());
        assert!(canonical_date(&json!({"$date": "2024-03-01T12:00:00Z"})).is_some());
    }

    #[test]
    fn tags_union_normalizes_to_list() {
        assert_eq!(tags_field(&json!({"tags": "solo"})), vec!["solo"]);
        assert_eq!(
            tags_field(&json!({"tags": ["a", "b"]})),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(tags_field(&json!({})).is_empty());
    }

    #[test]
    fn malformed_cart_entries_are_skipped() {
        let doc = json!({
            "_id": {"$oid": "64a51f0c2f8fb814c8f1a001"},
            "username": "ada",
            "cartProducts": [
                {"_id": "p1", "quantity": 2, "size": "L"},
                "not-an-object",
                {"quantity": 5},
            ],
        });
        let user = normalize_user(&doc).unwrap();
        assert_eq!(user.cart.len(), 1);
        assert_eq!(user.cart[0].product_id, "p1");
        assert_eq!(user.cart[0].quantity, Some(2));
    }

    #[test]
    fn interaction_requires_both_identifiers() {
        assert!(normalize_interaction(&json!({"userId": "u1"})).is_none());
        let full = normalize_interaction(&json!({
            "userId": "u1",
            "productId": {"$oid": "64a51f0c2f8fb814c8f1a002"},
            "interactionDate": "2024-03-01T12:00:00Z",
            "type": "purchase",
        }))
        .unwrap();
        assert_eq!(full.kind, Some(Signal::Purchase));
        assert!(full.date.is_some());
    }

    #[test]
    fn product_numeric_coercion() {
        let p = normalize_product(&json!({
            "_id": "p1",
            "title": "Widget",
            "price": "19.99",
            "rating": 4.5,
            "stock": null,
        }))
        .unwrap();
        assert_eq!(p.price, Some(19.99));
        assert_eq!(p.rating, Some(4.5));
        assert_eq!(p.stock, None);
    }
}
