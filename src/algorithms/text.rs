use crate::models::Product;

/// Strips every character that is not alphanumeric, an underscore or
/// whitespace. Mirrors a `[^\w\s]` removal, so word characters survive
/// and token boundaries are preserved for the vectorizer.
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect()
}

/// Builds the combined text blob for one catalog row.
///
/// Field order is subcategory, tags, brand, title, description, sku,
/// category, joined by a single space. The order and separator are
/// load-bearing: the vectorizer emits n-grams across field boundaries,
/// so reordering fields changes the term space.
pub fn combined_text(product: &Product) -> String {
    let tags = product.tags.join(", ");
    let fields = [
        product.subcategory.as_deref().unwrap_or(""),
        tags.as_str(),
        product.brand.as_deref().unwrap_or(""),
        product.title.as_deref().unwrap_or(""),
        product.description.as_deref().unwrap_or(""),
        product.sku.as_deref().unwrap_or(""),
        product.category.as_deref().unwrap_or(""),
    ];
    fields
        .iter()
        .map(|field| clean_text(field))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_is_stripped() {
        assert_eq!(clean_text("U.S.B.-C (fast!)"), "USBC fast");
        assert_eq!(clean_text("snake_case stays"), "snake_case stays");
    }

    #[test]
    fn field_order_is_fixed() {
        let product = Product::new("p1", "Wireless Mouse")
            .with_category("electronics", "peripherals")
            .with_tags(vec!["mouse".to_string(), "usb".to_string()])
            .with_brand("Acme");
        let text = combined_text(&product);
        assert_eq!(text, "peripherals mouse usb Acme Wireless Mouse   electronics");
    }

    #[test]
    fn absent_fields_become_empty() {
        let product = Product {
            id: "p1".to_string(),
            title: None,
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
        };
        assert_eq!(combined_text(&product), "      ");
    }
}
