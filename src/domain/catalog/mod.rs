pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Book, NewBook};
pub use errors::CatalogError;
pub use ports::BookRepository;
pub use services::CatalogService;
pub use value_objects::{AuthorName, BookTitle, Rating, ValueObjectError};
