//! Display formatting for terminal output
//!
//! Plain-text tables for books, members and lending transactions.

pub mod book;
pub mod member;
pub mod transaction;

pub use book::format_book_list;
pub use member::format_member_list;
pub use transaction::{
    format_member_records, format_return_targets, format_timestamp, format_transaction_list,
};

/// Cut a string to at most `max_len` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
