//! Catalog service trait and in-memory implementation.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ProductId;
use domain::{Money, Product, ProductDraft};

use crate::error::CatalogError;

/// Trait for reading and maintaining the product catalog.
///
/// Drafts handed to `add_product` and `update_product` have already been
/// validated by the caller.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Lists products, optionally restricted to one category.
    async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, CatalogError>;

    /// Lists the distinct categories, sorted.
    async fn list_categories(&self) -> Result<Vec<String>, CatalogError>;

    /// Fetches one product.
    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError>;

    /// Creates a product and returns it with its assigned ID.
    async fn add_product(&self, draft: ProductDraft) -> Result<Product, CatalogError>;

    /// Replaces the editable fields of a product.
    async fn update_product(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError>;

    /// Deletes a product. Carts holding a snapshot of it are unaffected.
    async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError>;
}

#[async_trait]
impl<T: CatalogService + ?Sized> CatalogService for Arc<T> {
    async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, CatalogError> {
        (**self).list_products(category).await
    }

    async fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        (**self).list_categories().await
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        (**self).get_product(id).await
    }

    async fn add_product(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        (**self).add_product(draft).await
    }

    async fn update_product(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError> {
        (**self).update_product(id, draft).await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        (**self).delete_product(id).await
    }
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: Vec<Product>,
    next_id: u64,
    fail_on_read: bool,
}

/// In-memory catalog for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogService {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalogService {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding `products`, in the given order.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products: Vec<Product> = products.into_iter().collect();
        let next_id = products
            .iter()
            .filter_map(|p| p.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            state: Arc::new(RwLock::new(InMemoryCatalogState {
                products,
                next_id,
                fail_on_read: false,
            })),
        }
    }

    /// Creates a catalog with a handful of sample products.
    pub fn with_sample_products() -> Self {
        Self::with_products(vec![
            Product::new("1", "Everyday Backpack", Money::from_cents(10995), "men's clothing")
                .with_description("Fits a 15 inch laptop in the padded sleeve.")
                .with_image("https://img.example/products/1.jpg")
                .with_rating(3.9, 120),
            Product::new("2", "Slim Fit T-Shirt", Money::from_cents(2230), "men's clothing")
                .with_description("Lightweight cotton with a slim fit.")
                .with_image("https://img.example/products/2.jpg")
                .with_rating(4.1, 259),
            Product::new("3", "Silver Dragon Bracelet", Money::from_cents(69500), "jewelery")
                .with_description("Sterling silver chain bracelet.")
                .with_image("https://img.example/products/3.jpg")
                .with_rating(4.6, 400),
            Product::new("4", "Portable SSD 1TB", Money::from_cents(10900), "electronics")
                .with_description("USB-C external drive.")
                .with_image("https://img.example/products/4.jpg")
                .with_rating(4.8, 319),
            Product::new("5", "Rain Jacket", Money::from_cents(3999), "women's clothing")
                .with_description("Hooded, windproof and water resistant.")
                .with_image("https://img.example/products/5.jpg")
                .with_rating(3.8, 679),
        ])
    }

    /// Configures the service to fail every read.
    pub fn set_fail_on_read(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_on_read = fail;
        }
    }

    /// Returns the number of products.
    pub fn product_count(&self) -> usize {
        self.state.read().map(|s| s.products.len()).unwrap_or(0)
    }

    fn read_state(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, InMemoryCatalogState>, CatalogError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        if state.fail_on_read {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }
        Ok(state)
    }
}

fn poisoned() -> CatalogError {
    CatalogError::Unavailable("catalog lock poisoned".to_string())
}

#[async_trait]
impl CatalogService for InMemoryCatalogService {
    async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, CatalogError> {
        let state = self.read_state()?;
        Ok(state
            .products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        let state = self.read_state()?;
        let categories: BTreeSet<&str> = state.products.iter().map(|p| p.category.as_str()).collect();
        Ok(categories.into_iter().map(String::from).collect())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let state = self.read_state()?;
        state
            .products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    async fn add_product(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        state.next_id += 1;
        let product = draft.into_product(ProductId::from(state.next_id));
        state.products.push(product.clone());

        Ok(product)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        let existing = state
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        let count = existing.rating.count;
        *existing = draft.into_product(id.clone());
        existing.rating.count = count;

        Ok(existing.clone())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        let before = state.products.len();
        state.products.retain(|p| &p.id != id);
        if state.products.len() == before {
            return Err(CatalogError::NotFound(id.clone()));
        }

        Ok(())
    }
}
