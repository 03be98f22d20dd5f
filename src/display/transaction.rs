//! Transaction display formatting
//!
//! Loan history tables for the librarian and for members, plus the list of
//! return candidates. Timestamps are shown in local time.

use std::fmt::Write;

use chrono::{DateTime, Local};

use super::truncate;
use crate::models::Transaction;
use crate::services::Loan;

/// Format used when a configured date format cannot be rendered
const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Render Unix seconds in local time with a strftime-style format
pub fn format_timestamp(epoch: i64, format: &str) -> String {
    let Some(utc) = DateTime::from_timestamp(epoch, 0) else {
        return epoch.to_string();
    };
    let local = utc.with_timezone(&Local);

    let mut output = String::new();
    if write!(output, "{}", local.format(format)).is_err() {
        output.clear();
        let _ = write!(output, "{}", local.format(FALLBACK_DATE_FORMAT));
    }
    output
}

/// Every transaction, for the librarian
pub fn format_transaction_list(transactions: &[Transaction], currency_symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = format!(
        "{:<5} | {:<10} | {:<10} | {:<20} | {:<20} | {:<10}\n",
        "ID", "Book ID", "Member ID", "Borrow Date", "Return Date", "Fine"
    );
    output.push_str(&"-".repeat(98));
    output.push('\n');

    for txn in transactions {
        let returned = match txn.returned_at {
            Some(at) => format_timestamp(at, "%Y-%m-%d %H:%M"),
            None => "Not yet returned".to_string(),
        };
        output.push_str(&format!(
            "{:<5} | {:<10} | {:<10} | {:<20} | {:<20} | {:<10}\n",
            txn.id,
            txn.book_id,
            txn.member_id,
            format_timestamp(txn.borrowed_at, "%Y-%m-%d %H:%M"),
            returned,
            txn.fine.format_with_symbol(currency_symbol)
        ));
    }

    output
}

/// Outstanding loans a member can pick from when returning
pub fn format_return_targets(loans: &[Loan]) -> String {
    let mut output = format!("{:<15} | {:<30}\n", "Transaction ID", "Book Title");
    output.push_str(&"-".repeat(46));
    output.push('\n');

    for loan in loans {
        let title = loan.title.as_deref().unwrap_or("(removed from catalog)");
        output.push_str(&format!(
            "{:<15} | {:<30}\n",
            loan.transaction.id,
            truncate(title, 30)
        ));
    }

    output
}

/// A member's own loan history
pub fn format_member_records(loans: &[Loan], date_format: &str, currency_symbol: &str) -> String {
    if loans.is_empty() {
        return "No records found.\n".to_string();
    }

    let mut output = format!(
        "{:<5} | {:<20} | {:<12} | {:<12} | {:<10}\n",
        "ID", "Book Title", "Borrow Date", "Return Date", "Fine"
    );
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for loan in loans {
        let txn = &loan.transaction;
        let returned = match txn.returned_at {
            Some(at) => format_timestamp(at, date_format),
            None => "Not returned".to_string(),
        };
        output.push_str(&format!(
            "{:<5} | {:<20} | {:<12} | {:<12} | {:<10}\n",
            txn.id,
            truncate(loan.title.as_deref().unwrap_or_default(), 20),
            format_timestamp(txn.borrowed_at, date_format),
            returned,
            txn.fine.format_with_symbol(currency_symbol)
        ));
    }

    output
}
