pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod templates;

// Re-export commonly used types
pub use dtos::{BookForm, LoginForm, RegisterForm};
pub use errors::WebError;
pub use middleware::{CurrentUser, RequestId, RequestIdExt, RequestIdMiddleware, WebAuthMiddleware};
pub use routes::{
  AuthRouteDependencies, CatalogRouteDependencies, configure_auth_routes, configure_catalog_routes,
};
pub use session::{SESSION_COOKIE, SessionCookies};
pub use templates::TemplateEngine;
