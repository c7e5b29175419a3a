use actix_web::web;
use std::sync::Arc;

use crate::application::auth::{
  GetCurrentUserUseCase, LoginUserUseCase, LogoutUserUseCase, RegisterUserUseCase,
};
use crate::application::catalog::{AddBookUseCase, ListBooksUseCase};
use crate::infrastructure::config::DownloadConfig;

use super::handlers::{self, catalog, pages, web_auth};
use super::middleware::WebAuthMiddleware;
use super::session::SessionCookies;
use super::templates::TemplateEngine;

/// Everything the catalog routes need
#[derive(Clone)]
pub struct CatalogRouteDependencies {
  pub templates: TemplateEngine,
  pub list_books_use_case: Arc<ListBooksUseCase>,
  pub add_book_use_case: Arc<AddBookUseCase>,
}

/// Configure the catalog app
///
/// # Routes
///
/// - GET / - book list
/// - GET /add - add-book form
/// - POST /add - store a book, then redirect to /
/// - GET /health - liveness
pub fn configure_catalog_routes(cfg: &mut web::ServiceConfig, deps: CatalogRouteDependencies) {
  cfg
    .app_data(web::Data::new(deps.templates))
    .app_data(web::Data::new(deps.list_books_use_case))
    .app_data(web::Data::new(deps.add_book_use_case))
    .route("/", web::get().to(catalog::home))
    .service(
      web::resource("/add")
        .route(web::get().to(catalog::add_book_page))
        .route(web::post().to(catalog::add_book_submit)),
    )
    .route("/health", web::get().to(handlers::health));
}

/// Everything the account routes need
#[derive(Clone)]
pub struct AuthRouteDependencies {
  pub templates: TemplateEngine,
  pub cookies: SessionCookies,
  pub download: DownloadConfig,
  pub register_use_case: Arc<RegisterUserUseCase>,
  pub login_use_case: Arc<LoginUserUseCase>,
  pub logout_use_case: Arc<LogoutUserUseCase>,
  pub get_current_user_use_case: Arc<GetCurrentUserUseCase>,
}

/// Configure the account app
///
/// # Routes
///
/// - GET / - landing page
/// - GET, POST /register
/// - GET, POST /login
/// - GET /secrets - protected
/// - GET /logout - protected
/// - GET /download - protected
/// - GET /health - liveness
///
/// Protected resources are wrapped one by one in [`WebAuthMiddleware`];
/// an anonymous caller is redirected to /login.
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig, deps: AuthRouteDependencies) {
  let guard = || {
    WebAuthMiddleware::new(
      deps.get_current_user_use_case.clone(),
      deps.cookies.clone(),
    )
  };

  cfg
    .app_data(web::Data::new(deps.templates.clone()))
    .app_data(web::Data::new(deps.cookies.clone()))
    .app_data(web::Data::new(deps.download.clone()))
    .app_data(web::Data::new(deps.register_use_case.clone()))
    .app_data(web::Data::new(deps.login_use_case.clone()))
    .app_data(web::Data::new(deps.logout_use_case.clone()))
    .route("/", web::get().to(pages::landing_page))
    .service(
      web::resource("/register")
        .route(web::get().to(pages::register_page))
        .route(web::post().to(web_auth::register_submit)),
    )
    .service(
      web::resource("/login")
        .route(web::get().to(pages::login_page))
        .route(web::post().to(web_auth::login_submit)),
    )
    .service(
      web::resource("/secrets")
        .wrap(guard())
        .route(web::get().to(pages::secrets_page)),
    )
    .service(
      web::resource("/logout")
        .wrap(guard())
        .route(web::get().to(web_auth::logout)),
    )
    .service(
      web::resource("/download")
        .wrap(guard())
        .route(web::get().to(pages::download)),
    )
    .route("/health", web::get().to(handlers::health));
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    App,
    cookie::Cookie,
    dev::ServiceResponse,
    http::{StatusCode, header},
    test::{self, TestRequest},
  };
  use std::path::Path;

  use crate::adapters::http::session::SESSION_COOKIE;
  use crate::adapters::http::templates::test_engine;
  use crate::domain::auth::AuthService;
  use crate::domain::auth::ports::UserRepository;
  use crate::domain::auth::value_objects::Email;
  use crate::domain::catalog::CatalogService;
  use crate::infrastructure::security::SessionSigner;
  use crate::test_support::{self, InMemoryBookRepository, InMemoryUserRepository};

  fn catalog_deps() -> CatalogRouteDependencies {
    let service = Arc::new(CatalogService::new(Arc::new(
      InMemoryBookRepository::default(),
    )));

    CatalogRouteDependencies {
      templates: test_engine(),
      list_books_use_case: Arc::new(ListBooksUseCase::new(service.clone())),
      add_book_use_case: Arc::new(AddBookUseCase::new(service)),
    }
  }

  fn auth_deps(download_dir: &Path) -> (AuthRouteDependencies, Arc<InMemoryUserRepository>) {
    let (auth_service, users, _) = test_support::auth_service();
    (auth_deps_with(auth_service, download_dir), users)
  }

  fn auth_deps_with(auth_service: Arc<AuthService>, download_dir: &Path) -> AuthRouteDependencies {
    AuthRouteDependencies {
      templates: test_engine(),
      cookies: SessionCookies::new(SessionSigner::new(b"test-secret"), 3600, false),
      download: DownloadConfig {
        directory: download_dir.display().to_string(),
        file_name: "cheat_sheet.pdf".to_string(),
      },
      register_use_case: Arc::new(RegisterUserUseCase::new(auth_service.clone())),
      login_use_case: Arc::new(LoginUserUseCase::new(auth_service.clone())),
      logout_use_case: Arc::new(LogoutUserUseCase::new(auth_service.clone())),
      get_current_user_use_case: Arc::new(GetCurrentUserUseCase::new(auth_service)),
    }
  }

  fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp
      .headers()
      .get(header::LOCATION)
      .and_then(|v| v.to_str().ok())
      .unwrap_or_default()
  }

  fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp
      .response()
      .cookies()
      .find(|c| c.name() == SESSION_COOKIE)
      .map(|c| c.into_owned())
  }

  async fn body_text<B: actix_web::body::MessageBody>(resp: ServiceResponse<B>) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
  }

  fn form_post(uri: &str, fields: &[(&str, &str)]) -> TestRequest {
    TestRequest::post().uri(uri).set_form(fields)
  }

  // ---------------------------------------------------------------------------
  // Catalog
  // ---------------------------------------------------------------------------

  #[actix_web::test]
  async fn test_empty_catalog_lists_nothing() {
    let deps = catalog_deps();
    let app =
      test::init_service(App::new().configure(|cfg| configure_catalog_routes(cfg, deps))).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Library is empty"));
  }

  #[actix_web::test]
  async fn test_add_book_then_list() {
    let deps = catalog_deps();
    let app =
      test::init_service(App::new().configure(|cfg| configure_catalog_routes(cfg, deps))).await;

    let form = test::call_service(&app, TestRequest::get().uri("/add").to_request()).await;
    assert_eq!(form.status(), StatusCode::OK);

    let req = form_post(
      "/add",
      &[("title", "Harry Potter"), ("author", "J. K. Rowling"), ("rating", "9.3")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    let body = body_text(resp).await;
    assert!(body.contains("Harry Potter"));
    assert!(body.contains("J. K. Rowling"));
  }

  #[actix_web::test]
  async fn test_duplicate_title_keeps_original_row() {
    let deps = catalog_deps();
    let app =
      test::init_service(App::new().configure(|cfg| configure_catalog_routes(cfg, deps))).await;

    let req = form_post(
      "/add",
      &[("title", "Dune"), ("author", "Frank Herbert"), ("rating", "9")],
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);

    let req = form_post(
      "/add",
      &[("title", "Dune"), ("author", "Impostor"), ("rating", "1")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(body_text(resp).await.contains("already in the collection"));

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    let body = body_text(resp).await;
    assert!(body.contains("Frank Herbert"));
    assert!(!body.contains("Impostor"));
  }

  #[actix_web::test]
  async fn test_add_book_rejects_bad_input() {
    let deps = catalog_deps();
    let app =
      test::init_service(App::new().configure(|cfg| configure_catalog_routes(cfg, deps))).await;

    let req = form_post(
      "/add",
      &[("title", "Dune"), ("author", "Frank Herbert"), ("rating", "great")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("value=\"Dune\""));

    let req = form_post("/add", &[("title", "Dune")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert!(body_text(resp).await.contains("Library is empty"));
  }

  #[actix_web::test]
  async fn test_catalog_health() {
    let deps = catalog_deps();
    let app =
      test::init_service(App::new().configure(|cfg| configure_catalog_routes(cfg, deps))).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "OK");
  }

  // ---------------------------------------------------------------------------
  // Accounts
  // ---------------------------------------------------------------------------

  #[actix_web::test]
  async fn test_register_then_view_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let (deps, users) = auth_deps(dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    let req = form_post(
      "/register",
      &[("email", "a@x.com"), ("password", "p1"), ("name", "A")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/secrets");
    let cookie = session_cookie(&resp).expect("session cookie");
    assert_eq!(cookie.http_only(), Some(true));

    let stored = users
      .find_by_email(&Email::new("a@x.com").unwrap())
      .await
      .unwrap()
      .unwrap();
    assert_ne!(stored.password_hash, "p1");

    let req = TestRequest::get().uri("/secrets").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Welcome, A"));
  }

  #[actix_web::test]
  async fn test_duplicate_registration_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (deps, users) = auth_deps(dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    let fields = [("email", "a@x.com"), ("password", "p1"), ("name", "A")];
    let resp = test::call_service(&app, form_post("/register", &fields).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let fields = [("email", "a@x.com"), ("password", "p2"), ("name", "B")];
    let resp = test::call_service(&app, form_post("/register", &fields).to_request()).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(session_cookie(&resp).is_none());
    assert!(body_text(resp).await.contains("already signed up with that email"));
    assert_eq!(users.len(), 1);
  }

  #[actix_web::test]
  async fn test_registration_losing_unique_race_is_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let (auth_service, users, sessions) = test_support::racing_auth_service();
    users.inner.insert_raw("a@x.com", "$argon2id$v=19$m=256,t=1,p=1$c2FsdHNhbHQ$aGFzaA", "A");
    let deps = auth_deps_with(auth_service, dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    let fields = [("email", "a@x.com"), ("password", "p2"), ("name", "B")];
    let resp = test::call_service(&app, form_post("/register", &fields).to_request()).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(session_cookie(&resp).is_none());
    assert!(body_text(resp).await.contains("already signed up with that email"));
    assert_eq!(users.inner.len(), 1);
    assert_eq!(sessions.len(), 0);
  }

  #[actix_web::test]
  async fn test_register_validation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let (deps, users) = auth_deps(dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    let fields = [("email", "not-an-email"), ("password", "p1"), ("name", "A")];
    let resp = test::call_service(&app, form_post("/register", &fields).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("Invalid email format"));

    let fields = [("email", "a@x.com"), ("password", "p1"), ("name", "   ")];
    let resp = test::call_service(&app, form_post("/register", &fields).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, form_post("/register", &[]).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(users.len(), 0);
  }

  #[actix_web::test]
  async fn test_login_success_and_failures() {
    let dir = tempfile::tempdir().unwrap();
    let (deps, _) = auth_deps(dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    let fields = [("email", "a@x.com"), ("password", "p1"), ("name", "A")];
    test::call_service(&app, form_post("/register", &fields).to_request()).await;

    let fields = [("email", "a@x.com"), ("password", "wrong")];
    let resp = test::call_service(&app, form_post("/login", &fields).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&resp).is_none());
    let body = body_text(resp).await;
    assert!(body.contains("Password incorrect"));
    assert!(body.contains("value=\"a@x.com\""));

    let fields = [("email", "b@x.com"), ("password", "p1")];
    let resp = test::call_service(&app, form_post("/login", &fields).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(resp).await.contains("email does not exist"));

    let fields = [("email", "a@x.com"), ("password", "p1")];
    let resp = test::call_service(&app, form_post("/login", &fields).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/secrets");
    let cookie = session_cookie(&resp).expect("session cookie");

    let req = TestRequest::get().uri("/secrets").cookie(cookie).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
  }

  #[actix_web::test]
  async fn test_protected_pages_redirect_anonymous_callers() {
    let dir = tempfile::tempdir().unwrap();
    let (deps, _) = auth_deps(dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    for uri in ["/secrets", "/download", "/logout"] {
      let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
      assert_eq!(resp.status(), StatusCode::FOUND, "{}", uri);
      assert_eq!(location(&resp), "/login", "{}", uri);
    }
  }

  #[actix_web::test]
  async fn test_forged_cookie_is_anonymous() {
    let dir = tempfile::tempdir().unwrap();
    let (deps, _) = auth_deps(dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    let fields = [("email", "a@x.com"), ("password", "p1"), ("name", "A")];
    let resp = test::call_service(&app, form_post("/register", &fields).to_request()).await;
    let cookie = session_cookie(&resp).unwrap();
    let (token, _) = cookie.value().split_once('.').unwrap();

    let forged = Cookie::new(SESSION_COOKIE, format!("{}.{}", token, "00".repeat(32)));
    let req = TestRequest::get().uri("/secrets").cookie(forged).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login");
    assert_eq!(session_cookie(&resp).map(|c| c.value().to_string()), Some(String::new()));
  }

  #[actix_web::test]
  async fn test_logout_invalidates_session() {
    let dir = tempfile::tempdir().unwrap();
    let (deps, _) = auth_deps(dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    let fields = [("email", "a@x.com"), ("password", "p1"), ("name", "A")];
    let resp = test::call_service(&app, form_post("/register", &fields).to_request()).await;
    let cookie = session_cookie(&resp).unwrap();

    let req = TestRequest::get()
      .uri("/logout")
      .cookie(cookie.clone())
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login");
    assert_eq!(session_cookie(&resp).unwrap().value(), "");

    let req = TestRequest::get().uri("/secrets").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login");
  }

  #[actix_web::test]
  async fn test_secrets_ignores_query_name() {
    let dir = tempfile::tempdir().unwrap();
    let (deps, _) = auth_deps(dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    let fields = [("email", "a@x.com"), ("password", "p1"), ("name", "Alice")];
    let resp = test::call_service(&app, form_post("/register", &fields).to_request()).await;
    let cookie = session_cookie(&resp).unwrap();

    let req = TestRequest::get()
      .uri("/secrets?name=Mallory")
      .cookie(cookie)
      .to_request();
    let body = body_text(test::call_service(&app, req).await).await;

    assert!(body.contains("Alice"));
    assert!(!body.contains("Mallory"));
  }

  #[actix_web::test]
  async fn test_download_streams_attachment() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cheat_sheet.pdf"), b"%PDF-1.4 test").unwrap();
    let (deps, _) = auth_deps(dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    let fields = [("email", "a@x.com"), ("password", "p1"), ("name", "A")];
    let resp = test::call_service(&app, form_post("/register", &fields).to_request()).await;
    let cookie = session_cookie(&resp).unwrap();

    let req = TestRequest::get().uri("/download").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
      .headers()
      .get(header::CONTENT_DISPOSITION)
      .unwrap()
      .to_str()
      .unwrap()
      .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("cheat_sheet.pdf"));
    assert_eq!(test::read_body(resp).await.as_ref(), b"%PDF-1.4 test");
  }

  #[actix_web::test]
  async fn test_download_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (deps, _) = auth_deps(dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    let fields = [("email", "a@x.com"), ("password", "p1"), ("name", "A")];
    let resp = test::call_service(&app, form_post("/register", &fields).to_request()).await;
    let cookie = session_cookie(&resp).unwrap();

    let req = TestRequest::get().uri("/download").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[actix_web::test]
  async fn test_public_auth_pages() {
    let dir = tempfile::tempdir().unwrap();
    let (deps, _) = auth_deps(dir.path());
    let app = test::init_service(App::new().configure(|cfg| configure_auth_routes(cfg, deps))).await;

    for uri in ["/", "/register", "/login"] {
      let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
      assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
    }

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(body_text(resp).await, "OK");
  }
}
