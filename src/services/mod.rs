//! Service layer for Libris
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, cross-collection updates and auditing.

pub mod catalog;
pub mod clock;
pub mod lending;
pub mod members;

pub use catalog::CatalogService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use lending::{LendingService, Loan, ReturnReceipt};
pub use members::MemberService;
