use serde::{Deserialize, Serialize};
use std::fmt;

use super::value_objects::{AuthorName, BookTitle, Rating};

/// A book as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
  pub id: i64,
  pub title: String,
  pub author: String,
  pub rating: f64,
}

impl fmt::Display for Book {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "<Book {}>", self.title)
  }
}

/// A validated book waiting to be inserted
#[derive(Debug, Clone)]
pub struct NewBook {
  pub title: BookTitle,
  pub author: AuthorName,
  pub rating: Rating,
}

impl NewBook {
  pub fn new(title: BookTitle, author: AuthorName, rating: Rating) -> Self {
    Self {
      title,
      author,
      rating,
    }
  }
}
