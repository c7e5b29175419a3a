pub mod catalog;
pub mod pages;
pub mod web_auth;

use actix_web::{HttpResponse, http::StatusCode};

use crate::adapters::http::{errors::WebError, templates::TemplateEngine};

/// Renders `template` into an HTML response with the given status
pub fn render_html(
  templates: &TemplateEngine,
  template: &str,
  context: &tera::Context,
  status: StatusCode,
) -> Result<HttpResponse, WebError> {
  let html = templates.render(template, context)?;

  Ok(
    HttpResponse::build(status)
      .content_type("text/html; charset=utf-8")
      .body(html),
  )
}

/// Plain liveness probe
pub async fn health() -> HttpResponse {
  HttpResponse::Ok().content_type("text/plain").body("OK")
}
