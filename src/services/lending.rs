//! Lending service
//!
//! Borrowing and returning copies, fine computation, and the loan views built
//! on top of the transaction history.
//!
//! A borrow or return touches both the catalog and the transaction file. Both
//! new snapshots are written before either is installed in memory, so a
//! failed write never leaves the availability count and the loan record
//! disagreeing in this process.

use crate::audit::{AuditEntry, EntityType, Operation};
use crate::config::Settings;
use crate::error::{LibrisError, LibrisResult};
use crate::models::{Book, BookId, Member, MemberId, Money, Transaction, TransactionId};
use crate::storage::{commit_pair, Storage};

use super::clock::Clock;

/// A transaction with the title of its book, if the book still exists
#[derive(Debug, Clone)]
pub struct Loan {
    pub transaction: Transaction,
    pub title: Option<String>,
}

/// Outcome of a return
#[derive(Debug, Clone)]
pub struct ReturnReceipt {
    pub transaction: Transaction,
    /// `None` when the book was deleted while on loan
    pub book: Option<Book>,
    pub days_late: i64,
    pub fine: Money,
}

impl ReturnReceipt {
    pub fn was_late(&self) -> bool {
        self.days_late > 0
    }
}

/// Service for the lending workflow
pub struct LendingService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
    clock: &'a dyn Clock,
}

impl<'a> LendingService<'a> {
    /// Create a new lending service
    pub fn new(storage: &'a Storage, settings: &'a Settings, clock: &'a dyn Clock) -> Self {
        Self {
            storage,
            settings,
            clock,
        }
    }

    /// Lend one copy of a book to a member
    ///
    /// Returns the new transaction; its `due_at` is the due date.
    pub fn borrow(&self, member: &Member, book_id: BookId) -> LibrisResult<Transaction> {
        let mut books = self.storage.books.stage()?;
        let book = books
            .find_mut(|b| b.id == book_id)
            .ok_or_else(|| LibrisError::book_not_found(book_id.to_string()))?;
        book.check_out()?;
        let title = book.title.clone();

        let mut transactions = self.storage.transactions.stage()?;
        let id = TransactionId::new(transactions.allocate_id());
        let transaction = Transaction::open(
            id,
            book_id,
            member.id,
            self.clock.now(),
            self.settings.loan_period_secs(),
        );
        transactions.push(transaction.clone());

        commit_pair(
            &self.storage.books,
            books,
            &self.storage.transactions,
            transactions,
        )?;

        tracing::info!(
            transaction_id = %id,
            book_id = %book_id,
            member_id = %member.id,
            due_at = transaction.due_at,
            "book borrowed"
        );
        self.storage.audit(
            AuditEntry::new(Operation::Borrow, EntityType::Transaction, id, member.name.clone())
                .named(title)
                .with_details(format!("book {} due {}", book_id, transaction.due_at)),
        );

        Ok(transaction)
    }

    /// Close one of the member's outstanding loans
    ///
    /// A return past the due date is fined per started day. If the book has
    /// since been deleted the return is still recorded; there is just no
    /// shelf count to restore.
    pub fn return_book(
        &self,
        member: &Member,
        transaction_id: TransactionId,
    ) -> LibrisResult<ReturnReceipt> {
        let now = self.clock.now();

        let mut transactions = self.storage.transactions.stage()?;
        let transaction = transactions
            .find_mut(|t| t.id == transaction_id && t.member_id == member.id && t.is_outstanding())
            .ok_or_else(|| LibrisError::transaction_not_found(transaction_id.to_string()))?;
        let fine = transaction.close(now, self.settings.fine_per_day);
        let days_late = crate::models::days_late(transaction.due_at, now);
        let transaction = transaction.clone();

        let mut books = self.storage.books.stage()?;
        let book = match books.find_mut(|b| b.id == transaction.book_id) {
            Some(book) => {
                book.check_in();
                Some(book.clone())
            }
            None => {
                tracing::warn!(
                    transaction_id = %transaction_id,
                    book_id = %transaction.book_id,
                    "returned a book that is no longer in the catalog"
                );
                None
            }
        };

        commit_pair(
            &self.storage.books,
            books,
            &self.storage.transactions,
            transactions,
        )?;

        tracing::info!(
            transaction_id = %transaction_id,
            member_id = %member.id,
            days_late,
            fine = %fine,
            "book returned"
        );
        let mut entry = AuditEntry::new(
            Operation::Return,
            EntityType::Transaction,
            transaction_id,
            member.name.clone(),
        )
        .with_details(format!("fine {}", fine.to_plain_string()));
        if let Some(book) = &book {
            entry = entry.named(book.title.clone());
        }
        self.storage.audit(entry);

        Ok(ReturnReceipt {
            transaction,
            book,
            days_late,
            fine,
        })
    }

    /// Unreturned loans of a member, in store order
    pub fn outstanding_for(&self, member_id: MemberId) -> LibrisResult<Vec<Transaction>> {
        self.storage.transactions.get_outstanding(member_id)
    }

    /// Unreturned loans of a member with their book titles
    pub fn outstanding_loans(&self, member_id: MemberId) -> LibrisResult<Vec<Loan>> {
        self.with_titles(self.outstanding_for(member_id)?)
    }

    /// Complete history of a member whose books are still catalogued
    pub fn records_for(&self, member_id: MemberId) -> LibrisResult<Vec<Loan>> {
        let history = self.storage.transactions.get_by_member(member_id)?;
        Ok(self
            .with_titles(history)?
            .into_iter()
            .filter(|loan| loan.title.is_some())
            .collect())
    }

    /// Every transaction in store order
    pub fn all_transactions(&self) -> LibrisResult<Vec<Transaction>> {
        self.storage.transactions.get_all()
    }

    fn with_titles(&self, transactions: Vec<Transaction>) -> LibrisResult<Vec<Loan>> {
        transactions
            .into_iter()
            .map(|transaction| {
                let title = self.storage.books.get(transaction.book_id)?.map(|b| b.title);
                Ok(Loan { transaction, title })
            })
            .collect()
    }
}
