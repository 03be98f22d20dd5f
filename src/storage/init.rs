//! Storage initialization
//!
//! Handles first-run setup: an empty member store gets a librarian account
//! with a publicly known password that must be rotated on first login.

use crate::crypto::CredentialCodec;
use crate::error::LibrisError;
use crate::models::{Member, MemberId, ADMIN_USERNAME};

use super::members::MemberRepository;

/// Email recorded for the bootstrap librarian
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@library.com";

/// Initial librarian password; known to anyone who reads the docs
pub const DEFAULT_ADMIN_PASSWORD: &str = "AdminPassword123!";

/// Create the default librarian if there are no members at all
///
/// Returns the created member, or `None` when the store already has members.
/// Callers must tell the operator that the well-known credential is live.
pub fn ensure_default_admin(
    members: &MemberRepository,
    codec: &dyn CredentialCodec,
) -> Result<Option<Member>, LibrisError> {
    if !needs_initialization(members)? {
        return Ok(None);
    }

    let mut staged = members.stage()?;
    let id = MemberId::new(staged.allocate_id());
    let admin = Member::new(
        id,
        ADMIN_USERNAME,
        DEFAULT_ADMIN_EMAIL,
        codec.encode(DEFAULT_ADMIN_PASSWORD)?,
    )?;
    staged.push(admin.clone());
    members.commit(staged)?;

    tracing::warn!(
        username = ADMIN_USERNAME,
        member_id = %admin.id,
        "created default librarian account with the well-known initial password"
    );
    Ok(Some(admin))
}

/// Check if the member store is empty
pub fn needs_initialization(members: &MemberRepository) -> Result<bool, LibrisError> {
    Ok(members.count()? == 0)
}
