use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValueObjectError {
  #[error("Title is required")]
  TitleEmpty,

  #[error("Title is too long (maximum {max} characters)")]
  TitleTooLong { max: usize },

  #[error("Author is required")]
  AuthorEmpty,

  #[error("Author is too long (maximum {max} characters)")]
  AuthorTooLong { max: usize },

  #[error("Rating must be a number, got '{0}'")]
  InvalidRating(String),
}

/// Title of a book, unique across the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookTitle(String);

impl BookTitle {
  pub const MAX_LENGTH: usize = 250;

  pub fn new(title: impl Into<String>) -> Result<Self, ValueObjectError> {
    let title = title.into().trim().to_string();

    if title.is_empty() {
      return Err(ValueObjectError::TitleEmpty);
    }
    if title.chars().count() > Self::MAX_LENGTH {
      return Err(ValueObjectError::TitleTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(title))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for BookTitle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorName(String);

impl AuthorName {
  pub const MAX_LENGTH: usize = 100;

  pub fn new(author: impl Into<String>) -> Result<Self, ValueObjectError> {
    let author = author.into().trim().to_string();

    if author.is_empty() {
      return Err(ValueObjectError::AuthorEmpty);
    }
    if author.chars().count() > Self::MAX_LENGTH {
      return Err(ValueObjectError::AuthorTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(author))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Reader rating; any finite number is accepted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating(f64);

impl Rating {
  pub fn new(value: f64) -> Result<Self, ValueObjectError> {
    if !value.is_finite() {
      return Err(ValueObjectError::InvalidRating(value.to_string()));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> f64 {
    self.0
  }
}

impl FromStr for Rating {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    let value = trimmed
      .parse::<f64>()
      .map_err(|_| ValueObjectError::InvalidRating(trimmed.to_string()))?;
    Self::new(value)
  }
}

impl fmt::Display for Rating {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
