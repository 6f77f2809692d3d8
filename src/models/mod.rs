pub mod book_search;
pub mod saved_book;
pub mod user;

pub use saved_book::SavedBook;
