//! Audit entry data structures
//!
//! Defines the structure of audit log entries including operation types,
//! entity types, and the entry format itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Entity was created
    Create,
    /// Entity was deleted
    Delete,
    /// A copy of a book was lent out
    Borrow,
    /// A borrowed copy came back
    Return,
    /// A member changed their own password
    PasswordChange,
    /// The librarian set a new password for a member
    PasswordReset,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Borrow => write!(f, "BORROW"),
            Operation::Return => write!(f, "RETURN"),
            Operation::PasswordChange => write!(f, "PASSWORD_CHANGE"),
            Operation::PasswordReset => write!(f, "PASSWORD_RESET"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Book,
    Member,
    Transaction,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Book => write!(f, "Book"),
            EntityType::Member => write!(f, "Member"),
            EntityType::Transaction => write!(f, "Transaction"),
        }
    }
}

/// A single audit log entry
///
/// Never carries password material, plain or obfuscated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// ID of the affected entity
    pub entity_id: String,

    /// Human-readable description of the entity (e.g., book title)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Name of the logged-in user who performed the operation
    pub actor: String,

    /// Free-form detail, such as a due date or a fine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AuditEntry {
    pub fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl ToString,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.to_string(),
            entity_name: None,
            actor: actor.into(),
            details: None,
        }
    }

    /// Attach a human-readable entity name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    /// Attach free-form detail
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} by {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id,
            self.actor
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(details) = &self.details {
            output.push_str(&format!("\n  {}", details));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Return.to_string(), "RETURN");
        assert_eq!(Operation::PasswordReset.to_string(), "PASSWORD_RESET");
    }

    #[test]
    fn test_builder() {
        let entry = AuditEntry::new(Operation::Borrow, EntityType::Transaction, 12, "alice")
            .named("Dune")
            .with_details("due 2024-01-08");

        assert_eq!(entry.entity_id, "12");
        assert_eq!(entry.actor, "alice");
        assert_eq!(entry.entity_name.as_deref(), Some("Dune"));
        assert_eq!(entry.details.as_deref(), Some("due 2024-01-08"));
    }

    #[test]
    fn test_serialized_field_names() {
        let entry = AuditEntry::new(Operation::PasswordChange, EntityType::Member, 1, "admin");
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["operation"], "password_change");
        assert_eq!(value["entity_type"], "member");
        assert_eq!(value["actor"], "admin");
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::new(Operation::Delete, EntityType::Book, 3, "admin").named("Emma");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("DELETE Book 3 by admin"));
        assert!(formatted.contains("(Emma)"));
    }
}
