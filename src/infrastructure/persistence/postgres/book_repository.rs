use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::{
  entities::{Book, NewBook},
  errors::CatalogError,
  ports::BookRepository,
};

/// Statements creating the catalog table; safe to run on every start
pub const SCHEMA: &[&str] = &[r#"
  CREATE TABLE IF NOT EXISTS books (
      id BIGSERIAL PRIMARY KEY,
      title VARCHAR(250) NOT NULL UNIQUE,
      author VARCHAR(100) NOT NULL,
      rating DOUBLE PRECISION NOT NULL
  )
  "#];

/// PostgreSQL implementation of the BookRepository trait
pub struct PostgresBookRepository {
  pool: PgPool,
}

impl PostgresBookRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct BookRow {
  id: i64,
  title: String,
  author: String,
  rating: f64,
}

impl From<BookRow> for Book {
  fn from(row: BookRow) -> Self {
    Book {
      id: row.id,
      title: row.title,
      author: row.author,
      rating: row.rating,
    }
  }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
  async fn list_all(&self) -> Result<Vec<Book>, CatalogError> {
    let rows = sqlx::query_as::<_, BookRow>(
      r#"
            SELECT id, title, author, rating
            FROM books
            ORDER BY id
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Book::from).collect())
  }

  async fn create(&self, book: NewBook) -> Result<Book, CatalogError> {
    let row = sqlx::query_as::<_, BookRow>(
      r#"
            INSERT INTO books (title, author, rating)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, rating
            "#,
    )
    .bind(book.title.as_str())
    .bind(book.author.as_str())
    .bind(book.rating.value())
    .fetch_one(&self.pool)
    .await?;

    tracing::debug!("Inserted book {} with id {}", row.title, row.id);
    Ok(row.into())
  }
}
