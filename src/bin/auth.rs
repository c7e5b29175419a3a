use actix_web::{App, HttpServer, middleware::Logger};
use std::sync::Arc;

use libris::{
  adapters::http::{
    AuthRouteDependencies, RequestIdMiddleware, SessionCookies, TemplateEngine,
    configure_auth_routes,
  },
  application::auth::{
    GetCurrentUserUseCase, LoginUserUseCase, LogoutUserUseCase, RegisterUserUseCase,
  },
  domain::auth::services::{AuthService, AuthServiceConfig},
  infrastructure::{
    config::{AppKind, Config},
    database::{self, StartupError},
    persistence::postgres::{
      PostgresSessionRepository, PostgresUserRepository, session_repository, user_repository,
    },
    security::{Argon2PasswordHasher, SessionSigner},
    telemetry,
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();
  telemetry::init();

  tracing::info!("Starting authentication service");

  let config = Config::load(AppKind::Auth).map_err(StartupError::from)?;
  tracing::info!("Configuration loaded: {:?}", config.database);

  let db_pool = database::connect(&config.database).await?;
  database::ensure_schema(&db_pool, user_repository::SCHEMA).await?;
  database::ensure_schema(&db_pool, session_repository::SCHEMA).await?;
  tracing::info!("Schema ready");

  let templates =
    TemplateEngine::new(&config.server.templates_dir).map_err(StartupError::from)?;

  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let session_repo = Arc::new(PostgresSessionRepository::new(db_pool));
  let password_hasher = Arc::new(
    Argon2PasswordHasher::from_config(&config.security)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?,
  );

  let session_ttl_seconds = config.security.session_ttl().map_err(StartupError::from)?;
  let auth_service = Arc::new(AuthService::new(
    user_repo,
    session_repo,
    password_hasher,
    AuthServiceConfig {
      session_ttl_seconds,
    },
  ));

  match auth_service.purge_expired_sessions().await {
    Ok(purged) => tracing::info!("Purged {} expired sessions", purged),
    Err(e) => tracing::warn!("Could not purge expired sessions: {}", e),
  }

  let cookies = SessionCookies::new(
    SessionSigner::from_config(config.security.session_secret.as_deref()),
    session_ttl_seconds,
    config.security.secure_cookies,
  );

  let deps = AuthRouteDependencies {
    templates,
    cookies,
    download: config.download.clone(),
    register_use_case: Arc::new(RegisterUserUseCase::new(auth_service.clone())),
    login_use_case: Arc::new(LoginUserUseCase::new(auth_service.clone())),
    logout_use_case: Arc::new(LogoutUserUseCase::new(auth_service.clone())),
    get_current_user_use_case: Arc::new(GetCurrentUserUseCase::new(auth_service)),
  };

  if !config.download.path().is_file() {
    tracing::warn!(
      "Download file {} does not exist; /download will answer 404",
      config.download.path().display()
    );
  }

  let server_host = config.server.host.clone();
  let server_port = config.server.port;
  tracing::info!("Listening on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let deps = deps.clone();
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .configure(|cfg| configure_auth_routes(cfg, deps))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}
