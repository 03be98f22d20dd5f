//! Password strength rules per role

use crate::error::{LibrisError, LibrisResult};
use crate::models::Role;

/// Strength requirements a new password must meet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_len: usize,
    pub require_upper: bool,
    pub require_lower: bool,
    pub require_digit: bool,
    pub require_punct: bool,
}

impl PasswordPolicy {
    /// Librarian: 12+ characters with upper, lower, digit and punctuation
    pub const ADMIN: Self = Self {
        min_len: 12,
        require_upper: true,
        require_lower: true,
        require_digit: true,
        require_punct: true,
    };

    /// Member: 8+ characters with at least one digit
    pub const MEMBER: Self = Self {
        min_len: 8,
        require_upper: false,
        require_lower: false,
        require_digit: true,
        require_punct: false,
    };

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self::ADMIN,
            Role::Member => Self::MEMBER,
        }
    }

    /// Short requirement text for prompts
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("min {} chars", self.min_len)];
        if self.require_upper && self.require_lower {
            parts.push("upper/lower case".into());
        }
        if self.require_digit {
            parts.push(if self.require_punct {
                "numbers".into()
            } else {
                "at least 1 number".into()
            });
        }
        if self.require_punct {
            parts.push("symbols".into());
        }
        parts.join(", ")
    }

    /// Check a candidate password, listing every unmet requirement
    ///
    /// Only printable ASCII is accepted since stored passwords go through the
    /// credential codec.
    pub fn check(&self, password: &str) -> LibrisResult<()> {
        if let Some(c) = password.chars().find(|c| !(' '..='~').contains(c)) {
            return Err(LibrisError::WeakPassword(format!(
                "unsupported character {:?}; use printable ASCII only",
                c
            )));
        }

        let mut missing = Vec::new();
        if password.len() < self.min_len {
            missing.push(format!("at least {} characters", self.min_len));
        }
        if self.require_upper && !password.chars().any(|c| c.is_ascii_uppercase()) {
            missing.push("an uppercase letter".to_string());
        }
        if self.require_lower && !password.chars().any(|c| c.is_ascii_lowercase()) {
            missing.push("a lowercase letter".to_string());
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            missing.push("a digit".to_string());
        }
        if self.require_punct && !password.chars().any(|c| c.is_ascii_punctuation()) {
            missing.push("a punctuation character".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LibrisError::WeakPassword(format!(
                "password needs {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_policy() {
        let policy = PasswordPolicy::for_role(Role::Admin);

        assert!(policy.check("Correct-Horse9").is_ok());
        assert!(policy.check("Short-1a").is_err());
        assert!(policy.check("alllowercase-123").is_err());
        assert!(policy.check("ALLUPPERCASE-123").is_err());
        assert!(policy.check("NoDigitsHere-!!").is_err());
        assert!(policy.check("NoPunctuation123").is_err());
    }

    #[test]
    fn test_member_policy() {
        let policy = PasswordPolicy::for_role(Role::Member);

        assert!(policy.check("reading1").is_ok());
        assert!(policy.check("read1").is_err());
        assert!(policy.check("readingbooks").is_err());
    }

    #[test]
    fn test_error_lists_every_gap() {
        let err = PasswordPolicy::ADMIN.check("abc").unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("at least 12 characters"));
        assert!(msg.contains("uppercase"));
        assert!(msg.contains("digit"));
        assert!(msg.contains("punctuation"));
        assert!(!msg.contains("lowercase"));
    }

    #[test]
    fn test_non_ascii_rejected() {
        let err = PasswordPolicy::MEMBER.check("pässwort12").unwrap_err();
        assert!(matches!(err, LibrisError::WeakPassword(_)));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            PasswordPolicy::ADMIN.describe(),
            "min 12 chars, upper/lower case, numbers, symbols"
        );
        assert_eq!(PasswordPolicy::MEMBER.describe(), "min 8 chars, at least 1 number");
    }
}
