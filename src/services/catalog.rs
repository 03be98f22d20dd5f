//! Catalog service
//!
//! Provides business logic for the book catalog: adding and deleting titles,
//! listing and searching.

use crate::audit::{AuditEntry, EntityType, Operation};
use crate::error::{LibrisError, LibrisResult};
use crate::models::{Book, BookId, SearchField};
use crate::storage::Storage;

/// Service for catalog management
pub struct CatalogService<'a> {
    storage: &'a Storage,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a title with `quantity` copies, all on the shelf
    pub fn add_book(
        &self,
        actor: &str,
        title: &str,
        author: &str,
        category: &str,
        quantity: i64,
    ) -> LibrisResult<Book> {
        let quantity = u32::try_from(quantity).map_err(|_| {
            LibrisError::Validation(format!(
                "Quantity must be between 0 and {}, got {}",
                u32::MAX,
                quantity
            ))
        })?;

        let mut staged = self.storage.books.stage()?;
        let id = BookId::new(staged.allocate_id());
        let book = Book::new(id, title, author, category, quantity)?;
        staged.push(book.clone());
        self.storage.books.commit(staged)?;

        tracing::info!(book_id = %book.id, title = %book.title, quantity, "added book");
        self.storage.audit(
            AuditEntry::new(Operation::Create, EntityType::Book, book.id, actor)
                .named(book.title.clone())
                .with_details(format!("quantity {}", book.quantity)),
        );

        Ok(book)
    }

    /// Remove a title from the catalog
    ///
    /// Outstanding loans of the book are left in place; their returns are
    /// still accepted.
    pub fn delete_book(&self, actor: &str, id: BookId) -> LibrisResult<Book> {
        let mut staged = self.storage.books.stage()?;
        let book = staged
            .remove_first(|b| b.id == id)
            .ok_or_else(|| LibrisError::book_not_found(id.to_string()))?;
        self.storage.books.commit(staged)?;

        let orphaned = self
            .storage
            .transactions
            .filter(|t| t.book_id == id && t.is_outstanding())?
            .len();
        if orphaned > 0 {
            tracing::warn!(book_id = %id, orphaned, "deleted book still has copies on loan");
        }

        tracing::info!(book_id = %id, title = %book.title, "deleted book");
        self.storage.audit(
            AuditEntry::new(Operation::Delete, EntityType::Book, id, actor).named(book.title.clone()),
        );

        Ok(book)
    }

    /// Get a book by ID
    pub fn get(&self, id: BookId) -> LibrisResult<Option<Book>> {
        self.storage.books.get(id)
    }

    /// All books in store order
    pub fn list(&self) -> LibrisResult<Vec<Book>> {
        self.storage.books.get_all()
    }

    /// Case-insensitive substring search on one field
    pub fn search(&self, field: SearchField, query: &str) -> LibrisResult<Vec<Book>> {
        self.storage.books.search(field, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibrisPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibrisPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_add_book() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let book = service
            .add_book("admin", "  Dune ", "Frank Herbert", "Sci-Fi", 3)
            .unwrap();

        assert_eq!(book.title, "Dune");
        assert_eq!(book.available, 3);
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_add_book_rejects_bad_input() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        assert!(service
            .add_book("admin", "Dune", "Frank Herbert", "Sci-Fi", -1)
            .unwrap_err()
            .is_validation());
        assert!(service
            .add_book("admin", "Dune, Messiah", "Frank Herbert", "Sci-Fi", 1)
            .unwrap_err()
            .is_validation());
        assert!(service
            .add_book("admin", "", "Frank Herbert", "Sci-Fi", 1)
            .unwrap_err()
            .is_validation());
        assert_eq!(storage.books.count().unwrap(), 0);
    }

    #[test]
    fn test_zero_quantity_allowed() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let book = service.add_book("admin", "Rare", "Anon", "Misc", 0).unwrap();
        assert_eq!(book.available, 0);
    }

    #[test]
    fn test_deleted_id_never_reused() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        service.add_book("admin", "One", "A", "X", 1).unwrap();
        let highest = service.add_book("admin", "Two", "B", "X", 1).unwrap();
        service.delete_book("admin", highest.id).unwrap();

        let fresh = service.add_book("admin", "Three", "C", "X", 1).unwrap();
        assert!(fresh.id > highest.id);
    }

    #[test]
    fn test_delete_missing_book() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let err = service.delete_book("admin", BookId::new(42)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_mutations_are_audited() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let book = service.add_book("admin", "Dune", "Frank Herbert", "Sci-Fi", 1).unwrap();
        service.delete_book("admin", book.id).unwrap();

        let entries = storage.audit_log().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[1].operation, Operation::Delete);
        assert_eq!(entries[1].entity_name.as_deref(), Some("Dune"));
    }

    #[test]
    fn test_search_by_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        service.add_book("admin", "Dune", "Frank Herbert", "Sci-Fi", 1).unwrap();
        service.add_book("admin", "Emma", "Jane Austen", "Classic", 1).unwrap();
        service.add_book("admin", "Neuromancer", "William Gibson", "sci-fi", 1).unwrap();

        let found = service.search(SearchField::Category, "SCI").unwrap();
        let titles: Vec<_> = found.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Neuromancer"]);
    }
}
