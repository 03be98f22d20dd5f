//! Book repository for flat-file storage
//!
//! Manages loading and saving the catalog to books.txt

use super::table::{Record, RecordTable};
use crate::error::LibrisError;
use crate::models::{Book, BookId, SearchField};

impl Record for Book {
    const ENTITY: &'static str = "Book";

    fn raw_id(&self) -> u32 {
        self.id.get()
    }

    fn validate(&self) -> Result<(), LibrisError> {
        Book::validate(self)
    }
}

/// Repository for book persistence
pub type BookRepository = RecordTable<Book>;

impl RecordTable<Book> {
    /// Get a book by ID
    pub fn get(&self, id: BookId) -> Result<Option<Book>, LibrisError> {
        self.find(|b| b.id == id)
    }

    /// Books whose chosen field contains `query`, case-insensitively
    pub fn search(&self, field: SearchField, query: &str) -> Result<Vec<Book>, LibrisError> {
        self.filter(|b| b.matches(field, query))
    }
}
