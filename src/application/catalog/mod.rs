//! Catalog use cases

mod add_book;
mod list_books;

pub use add_book::{AddBookCommand, AddBookUseCase};
pub use list_books::ListBooksUseCase;
