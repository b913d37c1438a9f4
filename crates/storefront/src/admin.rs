//! Admin product manager.

use common::ProductId;
use domain::{Product, ProductDraft};

use crate::error::CatalogError;
use crate::services::CatalogService;

/// Validates product drafts before handing them to the catalog.
pub struct ProductManager<C: CatalogService> {
    catalog: C,
}

impl<C: CatalogService> ProductManager<C> {
    /// Creates a product manager over a catalog backend.
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Returns a reference to the catalog backend.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Validates and creates a product.
    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn add_product(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        draft.validate()?;
        let product = self.catalog.add_product(draft).await?;
        tracing::info!(product_id = %product.id, "product added");
        Ok(product)
    }

    /// Validates and applies an edit.
    #[tracing::instrument(skip(self, draft))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError> {
        draft.validate()?;
        self.catalog.update_product(id, draft).await
    }

    /// Deletes a product.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        self.catalog.delete_product(id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryCatalogService;
    use domain::Money;

    fn draft() -> ProductDraft {
        ProductDraft {
            title: "Desk Lamp".to_string(),
            price: Money::from_cents(2999),
            category: "home".to_string(),
            description: "Warm light".to_string(),
            image: "https://img.example/lamp.png".to_string(),
            rating: 0.0,
        }
    }

    #[tokio::test]
    async fn test_valid_draft_reaches_catalog() {
        let catalog = InMemoryCatalogService::new();
        let manager = ProductManager::new(catalog.clone());

        let product = manager.add_product(draft()).await.unwrap();

        assert_eq!(product.title, "Desk Lamp");
        assert_eq!(catalog.product_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_catalog() {
        let catalog = InMemoryCatalogService::new();
        let manager = ProductManager::new(catalog.clone());

        let mut bad = draft();
        bad.price = Money::zero();
        bad.title = String::new();

        match manager.add_product(bad).await {
            Err(CatalogError::InvalidProduct(e)) => {
                assert_eq!(e.fields["price"], "Price must be greater than 0");
                assert_eq!(e.fields["title"], "Title is required");
            }
            other => panic!("expected InvalidProduct, got {other:?}"),
        }
        assert_eq!(catalog.product_count(), 0);
    }

    #[tokio::test]
    async fn test_update_validates_too() {
        let catalog = InMemoryCatalogService::with_sample_products();
        let manager = ProductManager::new(catalog);

        let mut bad = draft();
        bad.rating = 7.5;

        assert!(matches!(
            manager.update_product(&ProductId::new("1"), bad).await,
            Err(CatalogError::InvalidProduct(_))
        ));
    }
}
