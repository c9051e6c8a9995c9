use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Behavioral signal attached to a (user, product) pairing.
///
/// The set is open: the store may record kinds this crate does not know
/// about, which survive round-trips as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Signal {
    Cart,
    Wishlist,
    View,
    Purchase,
    NoInteraction,
    Other(String),
}

impl Signal {
    pub fn as_str(&self) -> &str {
        match self {
            Signal::Cart => "cart",
            Signal::Wishlist => "wishlist",
            Signal::View => "view",
            Signal::Purchase => "purchase",
            Signal::NoInteraction => "no_interaction",
            Signal::Other(s) => s,
        }
    }
}

impl From<String> for Signal {
    fn from(s: String) -> Self {
        match s.as_str() {
            "cart" => Signal::Cart,
            "wishlist" => Signal::Wishlist,
            "view" => Signal::View,
            "purchase" => Signal::Purchase,
            "no_interaction" => Signal::NoInteraction,
            _ => Signal::Other(s),
        }
    }
}

impl From<Signal> for String {
    fn from(s: Signal) -> Self {
        s.as_str().to_string()
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cart or wishlist entry on a user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListedProduct {
    pub product_id: String,
    pub quantity: Option<i64>,
    pub size: Option<String>,
}

/// A user after normalization. Privacy-sensitive raw fields (image, role,
/// password, email, phone) are dropped at the store boundary and never
/// reach this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub cart: Vec<ListedProduct>,
    pub wishlist: Vec<ListedProduct>,
}

/// A logged interaction row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: String,
    pub product_id: String,
    pub date: Option<DateTime<Utc>>,
    pub kind: Option<Signal>,
}

/// A catalog row. Text fields stay optional until the text feature
/// builder replaces absent values with the empty string; numeric fields
/// stay optional until the scaler coerces absent values to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub rating: Option<f64>,
    pub stock: Option<f64>,
}

impl Product {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            description: None,
            category: None,
            subcategory: None,
            tags: Vec::new(),
            brand: None,
            sku: None,
            price: None,
            discount_percentage: None,
            rating: None,
            stock: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_pricing(mut self, price: f64, discount_percentage: f64) -> Self {
        self.price = Some(price);
        self.discount_percentage = Some(discount_percentage);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_stock(mut self, stock: f64) -> Self {
        self.stock = Some(stock);
        self
    }
}

/// One reconciled row of the canonical dataset: a (user, product) pairing
/// observed in any source, or a signal-free catalog product. Every record
/// embeds its resolved catalog row, so `product_id` always refers to a
/// live product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub user_id: String,
    pub username: String,
    pub quantity: i64,
    pub size: String,
    pub interaction_date: DateTime<Utc>,
    pub signal: Signal,
    pub product: Product,
    pub combined_text: String,
}

impl CanonicalRecord {
    pub fn product_id(&self) -> &str {
        &self.product.id
    }
}

/// Response item on the content-based endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub title: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "discountPercentage")]
    pub discount_percentage: Option<f64>,
    pub rating: Option<f64>,
    pub stock: Option<f64>,
    pub subcategory: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub title_similarity: f32,
}

impl ProductInfo {
    pub fn from_product(product: &Product, title_similarity: f32) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            discount_percentage: product.discount_percentage,
            rating: product.rating,
            stock: product.stock,
            subcategory: product.subcategory.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            sku: product.sku.clone(),
            title_similarity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_round_trips_unknown_kinds() {
        let s = Signal::from("click".to_string());
        assert_eq!(s, Signal::Other("click".to_string()));
        assert_eq!(String::from(s), "click");
    }

    #[test]
    fn signal_known_kinds() {
        assert_eq!(Signal::from("cart".to_string()), Signal::Cart);
        assert_eq!(Signal::NoInteraction.as_str(), "no_interaction");
    }
}
