use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::auth::{LoginUserCommand, RegisterUserCommand};
use crate::application::catalog::AddBookCommand;

/// Add-book form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookForm {
  #[serde(default)]
  #[validate(length(min = 1, message = "Book name is required"))]
  pub title: String,

  #[serde(default)]
  #[validate(length(min = 1, message = "Book author is required"))]
  pub author: String,

  #[serde(default)]
  #[validate(length(min = 1, message = "Rating is required"))]
  pub rating: String,
}

impl From<BookForm> for AddBookCommand {
  fn from(form: BookForm) -> Self {
    AddBookCommand {
      title: form.title,
      author: form.author,
      rating: form.rating,
    }
  }
}

/// Registration form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterForm {
  #[serde(default)]
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[serde(default)]
  #[validate(length(
    min = 1,
    max = 128,
    message = "Password must be between 1 and 128 characters"
  ))]
  pub password: String,

  #[serde(default)]
  #[validate(length(min = 1, max = 1000, message = "Name is required"))]
  pub name: String,
}

impl From<RegisterForm> for RegisterUserCommand {
  fn from(form: RegisterForm) -> Self {
    RegisterUserCommand {
      email: form.email,
      password: form.password,
      name: form.name,
    }
  }
}

/// Login form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
  #[serde(default)]
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[serde(default)]
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

impl From<LoginForm> for LoginUserCommand {
  fn from(form: LoginForm) -> Self {
    LoginUserCommand {
      email: form.email,
      password: form.password,
    }
  }
}
