//! Book display formatting

use super::truncate;
use crate::models::Book;

/// Format books as a table, one row per book in the given order
pub fn format_book_list(books: &[Book]) -> String {
    if books.is_empty() {
        return "No books found.\n".to_string();
    }

    let mut output = format!(
        "{:<5} | {:<30} | {:<20} | {:<15} | {:<8} | {:<8}\n",
        "ID", "Title", "Author", "Category", "Total", "Available"
    );
    output.push_str(&"-".repeat(98));
    output.push('\n');

    for book in books {
        output.push_str(&format!(
            "{:<5} | {:<30} | {:<20} | {:<15} | {:<8} | {:<8}\n",
            book.id,
            truncate(&book.title, 30),
            truncate(&book.author, 20),
            truncate(&book.category, 15),
            book.quantity,
            book.available
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookId;

    #[test]
    fn test_format_book_list() {
        let mut book = Book::new(BookId::new(7), "Dune", "Frank Herbert", "Sci-Fi", 3).unwrap();
        book.available = 1;

        let output = format_book_list(&[book]);
        let rows: Vec<_> = output.lines().collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("ID    | Title"));
        assert!(rows[2].starts_with("7     | Dune "));
        assert!(rows[2].contains("| 3        | 1"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_book_list(&[]), "No books found.\n");
    }
}
