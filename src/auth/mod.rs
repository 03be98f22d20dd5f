//! Authentication and session handling
//!
//! Login with a bounded number of password attempts, role password policy,
//! and the session state machine that gates the role menus.

pub mod authenticator;
pub mod policy;
pub mod session;

pub use authenticator::Authenticator;
pub use policy::PasswordPolicy;
pub use session::{Session, SessionState};
