use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header, web};
use std::sync::Arc;
use validator::Validate;

use super::render_html;
use crate::adapters::http::{dtos::BookForm, errors::WebError, templates::TemplateEngine};
use crate::application::catalog::{AddBookUseCase, ListBooksUseCase};

/// Book list
pub async fn home(
  use_case: web::Data<Arc<ListBooksUseCase>>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, WebError> {
  let books = use_case.execute().await?;

  let mut context = tera::Context::new();
  context.insert("books", &books);

  render_html(&templates, "catalog/index.html.tera", &context, StatusCode::OK)
}

pub async fn add_book_page(templates: web::Data<TemplateEngine>) -> Result<HttpResponse, WebError> {
  render_add_form(&templates, &BookForm::default(), None, StatusCode::OK)
}

/// Handle add-book form submission
pub async fn add_book_submit(
  form: web::Form<BookForm>,
  use_case: web::Data<Arc<AddBookUseCase>>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, WebError> {
  let form = form.into_inner();

  if let Err(errors) = form.validate() {
    let error = WebError::from(errors);
    return render_add_form(&templates, &form, error.form_message(), error.status_code());
  }

  match use_case.execute(form.clone().into()).await {
    Ok(book) => {
      tracing::info!("Added {} (id={})", book, book.id);
      Ok(
        HttpResponse::Found()
          .insert_header((header::LOCATION, "/"))
          .finish(),
      )
    }
    Err(e) => {
      let error = WebError::from(e);
      match error.form_message() {
        Some(message) => {
          tracing::warn!("Rejected book submission: {}", message);
          render_add_form(&templates, &form, Some(message), error.status_code())
        }
        None => Err(error),
      }
    }
  }
}

fn render_add_form(
  templates: &TemplateEngine,
  form: &BookForm,
  error: Option<String>,
  status: StatusCode,
) -> Result<HttpResponse, WebError> {
  let mut context = tera::Context::new();
  context.insert("form", form);
  if let Some(error) = error {
    context.insert("error", &error);
  }

  render_html(templates, "catalog/add.html.tera", &context, status)
}
