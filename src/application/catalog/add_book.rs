use std::sync::Arc;

use crate::domain::catalog::{
  AuthorName, Book, BookTitle, CatalogError, CatalogService, NewBook, Rating,
};

/// Command for adding a book, straight from the form
#[derive(Debug, Clone)]
pub struct AddBookCommand {
  pub title: String,
  pub author: String,
  /// Parsed as a floating point number
  pub rating: String,
}

/// Use case for adding a book to the catalog
pub struct AddBookUseCase {
  catalog_service: Arc<CatalogService>,
}

impl AddBookUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  /// Validates the form values and stores the book
  ///
  /// # Errors
  /// `CatalogError::Validation` for malformed fields,
  /// `CatalogError::TitleAlreadyExists` for a duplicate title
  pub async fn execute(&self, command: AddBookCommand) -> Result<Book, CatalogError> {
    let title = BookTitle::new(command.title)?;
    let author = AuthorName::new(command.author)?;
    let rating: Rating = command.rating.parse()?;

    self
      .catalog_service
      .add_book(NewBook::new(title, author, rating))
      .await
  }
}
