//! Member repository for flat-file storage
//!
//! Manages loading and saving members (and their stored credentials) to
//! members.txt

use super::table::{Record, RecordTable};
use crate::error::LibrisError;
use crate::models::{Member, MemberId};

impl Record for Member {
    const ENTITY: &'static str = "Member";

    fn raw_id(&self) -> u32 {
        self.id.get()
    }

    fn validate(&self) -> Result<(), LibrisError> {
        Member::validate(self)
    }
}

/// Repository for member persistence
pub type MemberRepository = RecordTable<Member>;

impl RecordTable<Member> {
    /// Get a member by ID
    pub fn get(&self, id: MemberId) -> Result<Option<Member>, LibrisError> {
        self.find(|m| m.id == id)
    }

    /// Get the first member with exactly this name
    ///
    /// Names are the login key. Older files may hold duplicates; the earliest
    /// record wins.
    pub fn get_by_name(&self, name: &str) -> Result<Option<Member>, LibrisError> {
        self.find(|m| m.name == name)
    }

    /// Check if a name is already taken
    pub fn name_exists(&self, name: &str) -> Result<bool, LibrisError> {
        Ok(self.get_by_name(name)?.is_some())
    }
}
