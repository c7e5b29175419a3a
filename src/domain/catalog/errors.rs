use thiserror::Error;

use super::value_objects::ValueObjectError;
use crate::domain::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("A book titled '{0}' is already in the collection")]
  TitleAlreadyExists(String),

  #[error("{0}")]
  Validation(#[from] ValueObjectError),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CatalogError {
  fn from(error: sqlx::Error) -> Self {
    CatalogError::Repository(RepositoryError::from(error))
  }
}
