use std::sync::Arc;

use super::entities::{Book, NewBook};
use super::errors::CatalogError;
use super::ports::BookRepository;
use crate::domain::errors::RepositoryError;

/// Catalog service: list and add books
pub struct CatalogService {
  book_repo: Arc<dyn BookRepository>,
}

impl CatalogService {
  pub fn new(book_repo: Arc<dyn BookRepository>) -> Self {
    Self { book_repo }
  }

  /// All books in persistence order
  pub async fn list_books(&self) -> Result<Vec<Book>, CatalogError> {
    self.book_repo.list_all().await
  }

  /// Persists a new book
  ///
  /// # Errors
  /// `CatalogError::TitleAlreadyExists` when the storage layer rejects the
  /// title as a duplicate. The existing row is left as it was.
  pub async fn add_book(&self, book: NewBook) -> Result<Book, CatalogError> {
    let title = book.title.as_str().to_string();

    match self.book_repo.create(book).await {
      Ok(book) => Ok(book),
      Err(CatalogError::Repository(RepositoryError::DuplicateKey(_))) => {
        Err(CatalogError::TitleAlreadyExists(title))
      }
      Err(e) => Err(e),
    }
  }
}
