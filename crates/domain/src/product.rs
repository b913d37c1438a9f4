//! Catalog products and the admin product form.

use std::collections::BTreeMap;

use common::ProductId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Money;

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// Aggregated customer rating of a product.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average score, `0.0..=5.0`.
    pub rate: f64,

    /// Number of ratings the average is based on.
    pub count: u32,
}

/// A catalog record.
///
/// Carts keep their own copy of the product taken when it was added, so later
/// catalog edits never change what is already in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price.
    pub price: Money,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
}

impl Product {
    /// Creates a product with the required fields; the rest start empty.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        price: Money,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            category: category.into(),
            description: String::new(),
            image: String::new(),
            rating: Rating::default(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rate: f64, count: u32) -> Self {
        self.rating = Rating { rate, count };
        self
    }
}

/// Validation failures of a [`ProductDraft`], keyed by field name.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid product: {}", summary(.fields))]
pub struct ProductValidationError {
    pub fields: BTreeMap<&'static str, String>,
}

fn summary(fields: &BTreeMap<&'static str, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Product fields as entered in the admin product manager.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    pub price: Money,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub rating: f64,
}

impl ProductDraft {
    /// Checks the draft, collecting every failing field.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        let mut fields = BTreeMap::new();

        if self.title.trim().is_empty() {
            fields.insert("title", "Title is required".to_string());
        }
        if self.category.trim().is_empty() {
            fields.insert("category", "Category is required".to_string());
        }
        if self.image.trim().is_empty() {
            fields.insert("image", "Image URL is required".to_string());
        }
        if !self.price.is_positive() {
            fields.insert("price", "Price must be greater than 0".to_string());
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            fields.insert("rating", "Rating must be between 0 and 5".to_string());
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ProductValidationError { fields })
        }
    }

    /// Builds the catalog record for a validated draft.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            title: self.title.trim().to_string(),
            price: self.price,
            category: self.category.trim().to_string(),
            description: self.description,
            image: self.image.trim().to_string(),
            rating: Rating {
                rate: self.rating,
                count: 0,
            },
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price,
            category: product.category.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            rating: product.rating.rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            title: "Backpack".to_string(),
            price: Money::from_cents(10995),
            category: "bags".to_string(),
            description: "Fits a 15 inch laptop".to_string(),
            image: "https://img.example/backpack.png".to_string(),
            rating: 4.0,
        }
    }

    #[test]
    fn test_valid_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let bad = ProductDraft {
            title: "  ".to_string(),
            price: Money::zero(),
            category: String::new(),
            description: String::new(),
            image: String::new(),
            rating: 6.0,
        };

        let err = bad.validate().unwrap_err();
        let fields: Vec<_> = err.fields.keys().copied().collect();
        assert_eq!(fields, vec!["category", "image", "price", "rating", "title"]);
        assert_eq!(err.fields["price"], "Price must be greater than 0");
    }

    #[test]
    fn test_negative_rating_rejected() {
        let mut d = draft();
        d.rating = -1.0;
        assert!(d.validate().unwrap_err().fields.contains_key("rating"));
    }

    #[test]
    fn test_into_product_trims() {
        let mut d = draft();
        d.title = " Backpack ".to_string();
        let product = d.into_product(ProductId::new("p-1"));
        assert_eq!(product.title, "Backpack");
        assert_eq!(product.rating.rate, 4.0);
        assert_eq!(product.rating.count, 0);
    }

    #[test]
    fn test_product_accepts_numeric_id_and_sparse_fields() {
        let json = r#"{"id": 3, "title": "Jacket", "price": {"cents": 5599}, "category": "clothing"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new("3"));
        assert_eq!(product.rating, Rating::default());
        assert!(product.image.is_empty());
    }
}
