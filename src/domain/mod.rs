pub mod auth;
pub mod catalog;
pub mod errors;

pub use errors::RepositoryError;
