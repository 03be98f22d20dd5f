//! Storage layer for Libris
//!
//! Flat-file storage with one comma-delimited file per collection, whole-file
//! exclusive locking around writes, and persist-before-commit updates.
//!
//! Reads are not locked: a load racing a concurrent external write may see a
//! partial file. Writers from separate processes serialize on the lock.

pub mod file_io;
pub mod init;
pub mod table;

mod books;
mod members;
mod transactions;

pub use books::BookRepository;
pub use file_io::{read_records, write_records_locked, FileLockGuard};
pub use init::{ensure_default_admin, DEFAULT_ADMIN_PASSWORD};
pub use members::MemberRepository;
pub use table::{commit_pair, Record, RecordTable, Staged};
pub use transactions::TransactionRepository;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::LibrisPaths;
use crate::error::LibrisError;

/// Owns every collection for the lifetime of the process
pub struct Storage {
    paths: LibrisPaths,
    pub books: BookRepository,
    pub members: MemberRepository,
    pub transactions: TransactionRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LibrisPaths) -> Result<Self, LibrisError> {
        paths.ensure_directories()?;

        Ok(Self {
            books: BookRepository::new(paths.books_file()),
            members: MemberRepository::new(paths.members_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &LibrisPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), LibrisError> {
        let books = self.books.load()?;
        let members = self.members.load()?;
        let transactions = self.transactions.load()?;

        tracing::info!(books, members, transactions, "loaded record store");
        Ok(())
    }

    /// Best-effort audit of a completed mutation
    pub fn audit(&self, entry: AuditEntry) {
        self.audit.record(entry);
    }

    pub fn audit_log(&self) -> &AuditLogger {
        &self.audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibrisPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        storage.load_all().unwrap();
        assert_eq!(storage.books.count().unwrap(), 0);
    }

    #[test]
    fn test_load_all_reads_existing_files() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(data_dir.join("books.txt"), "2,Emma,Jane Austen,Classic,2,1\n").unwrap();
        std::fs::write(
            data_dir.join("transactions.txt"),
            "1,2,5,1700000000,1700604800,0,0.00\n",
        )
        .unwrap();

        let paths = LibrisPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        assert_eq!(storage.books.count().unwrap(), 1);
        assert_eq!(storage.members.count().unwrap(), 0);
        assert_eq!(storage.transactions.next_id().unwrap(), 2);
        assert!(!data_dir.join("members.txt").exists());
    }
}
