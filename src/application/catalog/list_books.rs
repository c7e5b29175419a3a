use std::sync::Arc;

use crate::domain::catalog::{Book, CatalogError, CatalogService};

/// Use case for listing every book in the catalog
pub struct ListBooksUseCase {
  catalog_service: Arc<CatalogService>,
}

impl ListBooksUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self) -> Result<Vec<Book>, CatalogError> {
    self.catalog_service.list_books().await
  }
}
