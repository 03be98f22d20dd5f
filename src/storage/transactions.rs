//! Transaction repository for flat-file storage
//!
//! Manages loading and saving lending transactions to transactions.txt

use super::table::{Record, RecordTable};
use crate::error::LibrisError;
use crate::models::{MemberId, Transaction, TransactionId};

impl Record for Transaction {
    const ENTITY: &'static str = "Transaction";

    fn raw_id(&self) -> u32 {
        self.id.get()
    }
}

/// Repository for transaction persistence
pub type TransactionRepository = RecordTable<Transaction>;

impl RecordTable<Transaction> {
    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, LibrisError> {
        self.find(|t| t.id == id)
    }

    /// Every transaction of a member, returned or not, in store order
    pub fn get_by_member(&self, member_id: MemberId) -> Result<Vec<Transaction>, LibrisError> {
        self.filter(|t| t.member_id == member_id)
    }

    /// Unreturned transactions of a member, in store order
    pub fn get_outstanding(&self, member_id: MemberId) -> Result<Vec<Transaction>, LibrisError> {
        self.filter(|t| t.member_id == member_id && t.is_outstanding())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookId, Money, SECONDS_PER_DAY};
    use tempfile::TempDir;

    const LEGACY: &str = "1,1,2,1700000000,1700604800,0,0.00\n\
                          2,3,2,1700000000,1700604800,1700900000,40.00\n\
                          3,1,4,1700000100,1700604900,0,0.00\n";

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.txt");
        std::fs::write(&path, LEGACY).unwrap();
        let repo = TransactionRepository::new(path);
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_loads_sentinel_and_fine() {
        let (_temp_dir, repo) = create_test_repo();

        let open = repo.get(TransactionId::new(1)).unwrap().unwrap();
        assert!(open.is_outstanding());

        let closed = repo.get(TransactionId::new(2)).unwrap().unwrap();
        assert_eq!(closed.returned_at, Some(1_700_900_000));
        assert_eq!(closed.fine, Money::from_cents(4000));
    }

    #[test]
    fn test_save_is_byte_identical() {
        let (temp_dir, repo) = create_test_repo();
        repo.save().unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("transactions.txt")).unwrap();
        assert_eq!(content, LEGACY);
    }

    #[test]
    fn test_outstanding_for_member_in_store_order() {
        let (_temp_dir, repo) = create_test_repo();

        let mut staged = repo.stage().unwrap();
        let id = TransactionId::new(staged.allocate_id());
        staged.push(Transaction::open(
            id,
            BookId::new(9),
            MemberId::new(2),
            1_700_000_500,
            7 * SECONDS_PER_DAY,
        ));
        repo.commit(staged).unwrap();

        let outstanding = repo.get_outstanding(MemberId::new(2)).unwrap();
        let ids: Vec<_> = outstanding.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![1, 4]);

        assert_eq!(repo.get_by_member(MemberId::new(2)).unwrap().len(), 3);
        assert!(repo.get_outstanding(MemberId::new(99)).unwrap().is_empty());
    }
}
