use async_trait::async_trait;

use super::entities::{Book, NewBook};
use super::errors::CatalogError;

#[async_trait]
pub trait BookRepository: Send + Sync {
  /// Every book in insertion order
  async fn list_all(&self) -> Result<Vec<Book>, CatalogError>;

  /// Inserts a book; a taken title surfaces as
  /// `RepositoryError::DuplicateKey`
  async fn create(&self, book: NewBook) -> Result<Book, CatalogError>;
}
