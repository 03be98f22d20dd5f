//! Core data models for Libris
//!
//! This module contains the record types the store persists: books, members
//! and lending transactions, plus the id and money types they share.

pub mod book;
pub mod ids;
pub mod member;
pub mod money;
pub mod transaction;
pub mod validation;

pub use book::{Book, SearchField};
pub use ids::{BookId, MemberId, TransactionId};
pub use member::{Member, Role, ADMIN_USERNAME};
pub use money::Money;
pub use transaction::{days_late, fine_for, Transaction, SECONDS_PER_DAY};
