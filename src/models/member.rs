//! Member model
//!
//! Members double as login identities: the display name is the username and
//! the librarian is simply the member named `admin`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::ids::MemberId;
use super::validation::{check_text, clean_text, EMAIL_MAX, NAME_MAX, OBFUSCATED_PASSWORD_MAX};
use crate::error::LibrisError;

/// Login name reserved for the librarian account
pub const ADMIN_USERNAME: &str = "admin";

/// Role a session is opened under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Librarian: catalog and membership administration
    Admin,
    /// Borrower: search, borrow, return
    Member,
}

impl Role {
    /// Map a login menu choice to a role
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(Self::Admin),
            2 => Some(Self::Member),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "Librarian"),
            Self::Member => write!(f, "Member"),
        }
    }
}

/// A library member
///
/// Field order is the on-disk record order:
/// `id,name,email,obfuscated_password,is_first_login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Display name, also the login username
    pub name: String,
    pub email: String,
    /// Password after the credential codec; never plaintext
    pub obfuscated_password: String,
    /// Must change password before reaching a role menu
    #[serde(with = "flag_as_int")]
    pub first_login: bool,
}

impl Member {
    /// Create a new member that must rotate its password on first login
    pub fn new(
        id: MemberId,
        name: &str,
        email: &str,
        obfuscated_password: String,
    ) -> Result<Self, LibrisError> {
        check_obfuscated(&obfuscated_password)?;

        Ok(Self {
            id,
            name: clean_text("Name", name, NAME_MAX)?,
            email: clean_text("Email", email, EMAIL_MAX)?,
            obfuscated_password,
            first_login: true,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.name == ADMIN_USERNAME
    }

    /// Validate the member's fields
    pub fn validate(&self) -> Result<(), LibrisError> {
        check_text("Name", &self.name, NAME_MAX)?;
        check_text("Email", &self.email, EMAIL_MAX)?;
        check_obfuscated(&self.obfuscated_password)
    }
}

/// Codec output may contain the delimiter (the record writer quotes it),
/// so only the length and line breaks are checked.
fn check_obfuscated(value: &str) -> Result<(), LibrisError> {
    if value.len() > OBFUSCATED_PASSWORD_MAX || value.contains(['\n', '\r']) {
        return Err(LibrisError::Validation(format!(
            "Stored password must be a single line of at most {} bytes",
            OBFUSCATED_PASSWORD_MAX
        )));
    }
    Ok(())
}

/// The first-login flag is stored as `0`/`1`; any non-zero value reads as set
mod flag_as_int {
    use super::*;

    pub fn serialize<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*flag))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(i64::deserialize(deserializer)? != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_member_requires_rotation() {
        let member = Member::new(MemberId::new(2), "alice", "a@x.org", "dolfh".into()).unwrap();
        assert!(member.first_login);
        assert!(!member.is_admin());
    }

    #[test]
    fn test_admin_detection() {
        let admin = Member::new(MemberId::new(1), "admin", "admin@library.com", "x".into()).unwrap();
        assert!(admin.is_admin());
    }

    #[test]
    fn test_role_choice() {
        assert_eq!(Role::from_choice(1), Some(Role::Admin));
        assert_eq!(Role::from_choice(2), Some(Role::Member));
        assert_eq!(Role::from_choice(3), None);
    }

    #[test]
    fn test_email_too_long() {
        let email = format!("{}@x.org", "a".repeat(100));
        assert!(Member::new(MemberId::new(2), "bob", &email, "x".into()).is_err());
    }
}
