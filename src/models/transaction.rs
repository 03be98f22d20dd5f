//! Lending transaction model
//!
//! One borrow of one copy. Outstanding until a return timestamp is recorded;
//! closed exactly once, never deleted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ids::{BookId, MemberId, TransactionId};
use super::money::Money;

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Whole days late, rounded up: one second past due is one full day
pub fn days_late(due_at: i64, returned_at: i64) -> i64 {
    let late = returned_at - due_at;
    if late <= 0 {
        0
    } else {
        (late + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    }
}

/// Fine owed for a return at `returned_at`
pub fn fine_for(due_at: i64, returned_at: i64, fine_per_day: Money) -> Money {
    fine_per_day * days_late(due_at, returned_at)
}

/// A borrow record
///
/// Field order is the on-disk record order:
/// `id,book_id,member_id,borrow_epoch,due_epoch,return_epoch,fine`.
/// A `return_epoch` of `0` marks an outstanding loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub book_id: BookId,
    pub member_id: MemberId,
    /// Unix seconds
    pub borrowed_at: i64,
    /// Unix seconds
    pub due_at: i64,
    #[serde(with = "epoch_or_zero")]
    pub returned_at: Option<i64>,
    #[serde(with = "two_decimals")]
    pub fine: Money,
}

impl Transaction {
    /// Open a new loan at `now`, due `loan_period_secs` later
    pub fn open(
        id: TransactionId,
        book_id: BookId,
        member_id: MemberId,
        now: i64,
        loan_period_secs: i64,
    ) -> Self {
        Self {
            id,
            book_id,
            member_id,
            borrowed_at: now,
            due_at: now + loan_period_secs,
            returned_at: None,
            fine: Money::zero(),
        }
    }

    pub fn is_outstanding(&self) -> bool {
        self.returned_at.is_none()
    }

    /// Record the return and the fine it incurs; returns the fine
    pub fn close(&mut self, returned_at: i64, fine_per_day: Money) -> Money {
        self.fine = fine_for(self.due_at, returned_at, fine_per_day);
        self.returned_at = Some(returned_at);
        self.fine
    }
}

/// `None` is written as `0`, and `0` reads back as `None`
mod epoch_or_zero {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Ok(if raw == 0 { None } else { Some(raw) })
    }
}

/// Fines are written with exactly two decimals, e.g. `30.00`
mod two_decimals {
    use super::*;
    use serde::de::Error;

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_plain_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Money::parse(&raw).map_err(D::Error::custom)
    }
}
