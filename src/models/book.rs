//! Book model
//!
//! A catalog entry with a total quantity and the number of copies currently
//! on the shelf.

use serde::{Deserialize, Serialize};

use super::ids::BookId;
use super::validation::{check_text, clean_text, AUTHOR_MAX, CATEGORY_MAX, TITLE_MAX};
use crate::error::LibrisError;

/// Which field a catalog search matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Category,
}

impl SearchField {
    /// Map a menu choice (1-3) to a search field
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(Self::Title),
            2 => Some(Self::Author),
            3 => Some(Self::Category),
            _ => None,
        }
    }
}

/// A book in the catalog
///
/// Field order is the on-disk record order:
/// `id,title,author,category,quantity,available`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    /// Total copies owned
    pub quantity: u32,
    /// Copies on the shelf; never exceeds `quantity`
    pub available: u32,
}

impl Book {
    /// Create a new book with every copy available
    pub fn new(
        id: BookId,
        title: &str,
        author: &str,
        category: &str,
        quantity: u32,
    ) -> Result<Self, LibrisError> {
        Ok(Self {
            id,
            title: clean_text("Title", title, TITLE_MAX)?,
            author: clean_text("Author", author, AUTHOR_MAX)?,
            category: clean_text("Category", category, CATEGORY_MAX)?,
            quantity,
            available: quantity,
        })
    }

    /// Take one copy off the shelf
    pub fn check_out(&mut self) -> Result<(), LibrisError> {
        if self.available == 0 {
            return Err(LibrisError::Unavailable {
                title: self.title.clone(),
            });
        }
        self.available -= 1;
        Ok(())
    }

    /// Put one copy back on the shelf
    ///
    /// Saturates at `quantity` so a stray return can never break the
    /// availability invariant.
    pub fn check_in(&mut self) {
        if self.available < self.quantity {
            self.available += 1;
        }
    }

    /// Case-insensitive substring match on the chosen field
    pub fn matches(&self, field: SearchField, query: &str) -> bool {
        let haystack = match field {
            SearchField::Title => &self.title,
            SearchField::Author => &self.author,
            SearchField::Category => &self.category,
        };
        haystack.to_lowercase().contains(&query.trim().to_lowercase())
    }

    /// Validate the book's invariants
    pub fn validate(&self) -> Result<(), LibrisError> {
        check_text("Title", &self.title, TITLE_MAX)?;
        check_text("Author", &self.author, AUTHOR_MAX)?;
        check_text("Category", &self.category, CATEGORY_MAX)?;

        if self.available > self.quantity {
            return Err(LibrisError::Validation(format!(
                "Book {} has {} available but only {} copies",
                self.id, self.available, self.quantity
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Book {
        Book::new(BookId::new(1), "Dune", "Frank Herbert", "Sci-Fi", 2).unwrap()
    }

    #[test]
    fn test_new_book_fully_available() {
        let book = sample();
        assert_eq!(book.available, 2);
        assert!(book.validate().is_ok());
    }

    #[test]
    fn test_check_out_until_unavailable() {
        let mut book = sample();
        book.check_out().unwrap();
        book.check_out().unwrap();
        assert_eq!(book.available, 0);

        let err = book.check_out().unwrap_err();
        assert!(matches!(err, LibrisError::Unavailable { .. }));
        assert_eq!(book.available, 0);
    }

    #[test]
    fn test_more_available_than_owned_is_invalid() {
        let mut book = sample();
        book.available = book.quantity + 1;
        assert!(book.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_check_in_never_exceeds_quantity() {
        let mut book = sample();
        book.check_in();
        assert_eq!(book.available, book.quantity);
    }

    #[test]
    fn test_matches_case_insensitive() {
        let book = sample();
        assert!(book.matches(SearchField::Title, "dU"));
        assert!(book.matches(SearchField::Author, "HERBERT"));
        assert!(book.matches(SearchField::Category, "sci"));
        assert!(!book.matches(SearchField::Title, "herbert"));
    }

    #[test]
    fn test_invalid_title_rejected() {
        assert!(Book::new(BookId::new(1), "", "A", "B", 1).is_err());
        assert!(Book::new(BookId::new(1), "A, B", "A", "B", 1).is_err());
    }

    #[test]
    fn test_search_field_choice() {
        assert_eq!(SearchField::from_choice(2), Some(SearchField::Author));
        assert_eq!(SearchField::from_choice(4), None);
    }
}
