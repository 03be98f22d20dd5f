//! Member service
//!
//! Provides business logic for membership: registration, removal and the two
//! password flows (self-service change and librarian reset).

use crate::audit::{AuditEntry, EntityType, Operation};
use crate::auth::PasswordPolicy;
use crate::crypto::CredentialCodec;
use crate::error::{LibrisError, LibrisResult};
use crate::models::{Member, MemberId, Role};
use crate::storage::Storage;

/// Service for member management
pub struct MemberService<'a> {
    storage: &'a Storage,
    codec: &'a dyn CredentialCodec,
}

impl<'a> MemberService<'a> {
    /// Create a new member service
    pub fn new(storage: &'a Storage, codec: &'a dyn CredentialCodec) -> Self {
        Self { storage, codec }
    }

    /// Register a member with an initial password
    ///
    /// The member must change the password on first login.
    pub fn add_member(
        &self,
        actor: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> LibrisResult<Member> {
        PasswordPolicy::MEMBER.check(password)?;

        let name = name.trim();
        if self.storage.members.name_exists(name)? {
            return Err(LibrisError::Duplicate {
                entity_type: "Member",
                identifier: name.to_string(),
            });
        }

        let obfuscated = self.codec.encode(password)?;

        let mut staged = self.storage.members.stage()?;
        let id = MemberId::new(staged.allocate_id());
        let member = Member::new(id, name, email, obfuscated)?;
        staged.push(member.clone());
        self.storage.members.commit(staged)?;

        tracing::info!(member_id = %member.id, name = %member.name, "added member");
        self.storage.audit(
            AuditEntry::new(Operation::Create, EntityType::Member, member.id, actor)
                .named(member.name.clone()),
        );

        Ok(member)
    }

    /// Remove a member
    ///
    /// The librarian account cannot be removed. Loans of the removed member
    /// stay in the transaction history.
    pub fn delete_member(&self, actor: &str, id: MemberId) -> LibrisResult<Member> {
        let mut staged = self.storage.members.stage()?;
        if staged
            .rows()
            .iter()
            .find(|m| m.id == id)
            .is_some_and(Member::is_admin)
        {
            return Err(LibrisError::Validation(
                "The librarian account cannot be deleted".into(),
            ));
        }

        let member = staged
            .remove_first(|m| m.id == id)
            .ok_or_else(|| LibrisError::member_not_found(id.to_string()))?;
        self.storage.members.commit(staged)?;

        tracing::info!(member_id = %id, name = %member.name, "deleted member");
        self.storage.audit(
            AuditEntry::new(Operation::Delete, EntityType::Member, id, actor)
                .named(member.name.clone()),
        );

        Ok(member)
    }

    /// Set a new password on the librarian's authority
    ///
    /// Re-arms the first-login flag so the member picks their own password
    /// next time.
    pub fn reset_password(
        &self,
        actor: &str,
        id: MemberId,
        new_password: &str,
    ) -> LibrisResult<Member> {
        let mut staged = self.storage.members.stage()?;
        let member = staged
            .find_mut(|m| m.id == id)
            .ok_or_else(|| LibrisError::member_not_found(id.to_string()))?;

        let role = if member.is_admin() {
            Role::Admin
        } else {
            Role::Member
        };
        PasswordPolicy::for_role(role).check(new_password)?;

        member.obfuscated_password = self.codec.encode(new_password)?;
        member.first_login = true;
        let updated = member.clone();
        self.storage.members.commit(staged)?;

        tracing::info!(member_id = %id, "password reset");
        self.storage.audit(
            AuditEntry::new(Operation::PasswordReset, EntityType::Member, id, actor)
                .named(updated.name.clone()),
        );

        Ok(updated)
    }

    /// Replace a member's password with a confirmed, policy-compliant one
    ///
    /// Clears the first-login flag on success.
    pub fn change_password(
        &self,
        id: MemberId,
        role: Role,
        new_password: &str,
        confirmation: &str,
    ) -> LibrisResult<Member> {
        PasswordPolicy::for_role(role).check(new_password)?;
        if new_password != confirmation {
            return Err(LibrisError::PasswordMismatch);
        }

        let mut staged = self.storage.members.stage()?;
        let member = staged
            .find_mut(|m| m.id == id)
            .ok_or_else(|| LibrisError::member_not_found(id.to_string()))?;

        member.obfuscated_password = self.codec.encode(new_password)?;
        member.first_login = false;
        let updated = member.clone();
        self.storage.members.commit(staged)?;

        tracing::info!(member_id = %id, "password changed");
        self.storage.audit(
            AuditEntry::new(
                Operation::PasswordChange,
                EntityType::Member,
                id,
                updated.name.clone(),
            )
            .named(updated.name.clone()),
        );

        Ok(updated)
    }

    /// Get a member by ID
    pub fn get(&self, id: MemberId) -> LibrisResult<Option<Member>> {
        self.storage.members.get(id)
    }

    /// All members in store order
    pub fn list(&self) -> LibrisResult<Vec<Member>> {
        self.storage.members.get_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibrisPaths;
    use crate::crypto::CaesarCodec;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibrisPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_add_member_starts_with_first_login() {
        let (_temp_dir, storage) = create_test_storage();
        let codec = CaesarCodec::default();
        let service = MemberService::new(&storage, &codec);

        let member = service
            .add_member("admin", "alice", "alice@example.org", "welcome1")
            .unwrap();

        assert!(member.first_login);
        assert_ne!(member.obfuscated_password, "welcome1");
        assert!(codec.verify(&member.obfuscated_password, "welcome1"));
    }

    #[test]
    fn test_add_member_enforces_member_policy() {
        let (_temp_dir, storage) = create_test_storage();
        let codec = CaesarCodec::default();
        let service = MemberService::new(&storage, &codec);

        let err = service
            .add_member("admin", "alice", "alice@example.org", "short")
            .unwrap_err();
        assert!(matches!(err, LibrisError::WeakPassword(_)));
        assert_eq!(storage.members.count().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let codec = CaesarCodec::default();
        let service = MemberService::new(&storage, &codec);

        service
            .add_member("admin", "alice", "a@example.org", "welcome1")
            .unwrap();
        let err = service
            .add_member("admin", " alice ", "b@example.org", "welcome2")
            .unwrap_err();

        assert!(matches!(err, LibrisError::Duplicate { .. }));
    }

    #[test]
    fn test_reset_password_rearms_first_login() {
        let (_temp_dir, storage) = create_test_storage();
        let codec = CaesarCodec::default();
        let service = MemberService::new(&storage, &codec);

        let member = service
            .add_member("admin", "alice", "a@example.org", "welcome1")
            .unwrap();
        service
            .change_password(member.id, Role::Member, "mine12345", "mine12345")
            .unwrap();

        let reset = service.reset_password("admin", member.id, "fresh123").unwrap();
        assert!(reset.first_login);
        assert!(codec.verify(&reset.obfuscated_password, "fresh123"));
        assert!(storage.members.get(member.id).unwrap().unwrap().first_login);
    }

    #[test]
    fn test_change_password_requires_confirmation() {
        let (_temp_dir, storage) = create_test_storage();
        let codec = CaesarCodec::default();
        let service = MemberService::new(&storage, &codec);

        let member = service
            .add_member("admin", "alice", "a@example.org", "welcome1")
            .unwrap();

        let err = service
            .change_password(member.id, Role::Member, "mine12345", "mine12346")
            .unwrap_err();
        assert!(matches!(err, LibrisError::PasswordMismatch));
        assert!(storage.members.get(member.id).unwrap().unwrap().first_login);

        let changed = service
            .change_password(member.id, Role::Member, "mine12345", "mine12345")
            .unwrap();
        assert!(!changed.first_login);
    }

    #[test]
    fn test_change_password_persists() {
        let (temp_dir, storage) = create_test_storage();
        let codec = CaesarCodec::default();
        let service = MemberService::new(&storage, &codec);

        let member = service
            .add_member("admin", "alice", "a@example.org", "welcome1")
            .unwrap();
        service
            .change_password(member.id, Role::Member, "abc12345", "abc12345")
            .unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("data").join("members.txt")).unwrap();
        assert_eq!(content, "1,alice,a@example.org,def45678,0\n");
    }

    #[test]
    fn test_admin_cannot_be_deleted() {
        let (_temp_dir, storage) = create_test_storage();
        let codec = CaesarCodec::default();
        crate::storage::ensure_default_admin(&storage.members, &codec).unwrap();
        let service = MemberService::new(&storage, &codec);

        let err = service.delete_member("admin", MemberId::new(1)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.members.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_member() {
        let (_temp_dir, storage) = create_test_storage();
        let codec = CaesarCodec::default();
        let service = MemberService::new(&storage, &codec);

        let member = service
            .add_member("admin", "alice", "a@example.org", "welcome1")
            .unwrap();
        service.delete_member("admin", member.id).unwrap();

        assert!(service.get(member.id).unwrap().is_none());
        assert!(service
            .delete_member("admin", member.id)
            .unwrap_err()
            .is_not_found());
    }
}
