use actix_files::NamedFile;
use actix_web::{
  HttpRequest, HttpResponse,
  http::{
    StatusCode,
    header::{ContentDisposition, DispositionParam, DispositionType},
  },
  web,
};

use super::render_html;
use crate::adapters::http::{errors::WebError, middleware::CurrentUser, templates::TemplateEngine};
use crate::infrastructure::config::DownloadConfig;

/// Landing page of the account app
pub async fn landing_page(templates: web::Data<TemplateEngine>) -> Result<HttpResponse, WebError> {
  render_html(
    &templates,
    "auth/index.html.tera",
    &tera::Context::new(),
    StatusCode::OK,
  )
}

pub async fn register_page(
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, WebError> {
  render_html(
    &templates,
    "auth/register.html.tera",
    &tera::Context::new(),
    StatusCode::OK,
  )
}

pub async fn login_page(templates: web::Data<TemplateEngine>) -> Result<HttpResponse, WebError> {
  render_html(
    &templates,
    "auth/login.html.tera",
    &tera::Context::new(),
    StatusCode::OK,
  )
}

/// Protected page, scoped to the user behind the session
pub async fn secrets_page(
  current: CurrentUser,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, WebError> {
  let mut context = tera::Context::new();
  context.insert("name", &current.user.name);

  render_html(&templates, "auth/secrets.html.tera", &context, StatusCode::OK)
}

/// Streams the configured file as an attachment
pub async fn download(
  current: CurrentUser,
  download: web::Data<DownloadConfig>,
  req: HttpRequest,
) -> Result<HttpResponse, WebError> {
  let path = download.path();

  let file = NamedFile::open_async(&path).await.map_err(|e| {
    if e.kind() == std::io::ErrorKind::NotFound {
      tracing::warn!("Download file missing: {}", path.display());
      WebError::NotFound("The requested file is not available".to_string())
    } else {
      WebError::Internal(format!("Cannot open {}: {}", path.display(), e))
    }
  })?;

  tracing::info!(user_id = %current.user.id, "Serving {}", download.file_name);

  Ok(
    file
      .set_content_disposition(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(download.file_name.clone())],
      })
      .into_response(&req),
  )
}
