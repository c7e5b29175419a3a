use actix_web::{App, HttpServer, middleware::Logger};
use std::sync::Arc;

use libris::{
  adapters::http::{
    CatalogRouteDependencies, RequestIdMiddleware, TemplateEngine, configure_catalog_routes,
  },
  application::catalog::{AddBookUseCase, ListBooksUseCase},
  domain::catalog::CatalogService,
  infrastructure::{
    config::{AppKind, Config},
    database::{self, StartupError},
    persistence::postgres::{PostgresBookRepository, book_repository},
    telemetry,
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();
  telemetry::init();

  tracing::info!("Starting book catalog");

  let config = Config::load(AppKind::Catalog).map_err(StartupError::from)?;
  config
    .require_database_password()
    .map_err(StartupError::from)?;
  tracing::info!("Configuration loaded: {:?}", config.database);

  let db_pool = database::connect(&config.database).await?;
  database::ensure_schema(&db_pool, book_repository::SCHEMA).await?;
  tracing::info!("Schema ready");

  let templates =
    TemplateEngine::new(&config.server.templates_dir).map_err(StartupError::from)?;

  let book_repo = Arc::new(PostgresBookRepository::new(db_pool));
  let catalog_service = Arc::new(CatalogService::new(book_repo));

  let deps = CatalogRouteDependencies {
    templates,
    list_books_use_case: Arc::new(ListBooksUseCase::new(catalog_service.clone())),
    add_book_use_case: Arc::new(AddBookUseCase::new(catalog_service)),
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;
  tracing::info!("Listening on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let deps = deps.clone();
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .configure(|cfg| configure_catalog_routes(cfg, deps))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}
