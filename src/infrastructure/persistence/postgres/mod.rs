pub mod book_repository;
pub mod session_repository;
pub mod user_repository;

pub use book_repository::PostgresBookRepository;
pub use session_repository::PostgresSessionRepository;
pub use user_repository::PostgresUserRepository;
