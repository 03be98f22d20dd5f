//! Credential checks with a per-login attempt limit
//!
//! The attempt counter lives only for one call to
//! [`Authenticator::authenticate`]; nothing is remembered between logins.

use crate::crypto::{CredentialCodec, SecureString};
use crate::error::{LibrisError, LibrisResult};
use crate::models::{Member, Role, ADMIN_USERNAME};
use crate::storage::MemberRepository;

pub struct Authenticator<'a> {
    members: &'a MemberRepository,
    codec: &'a dyn CredentialCodec,
    max_attempts: u32,
}

impl<'a> Authenticator<'a> {
    pub fn new(
        members: &'a MemberRepository,
        codec: &'a dyn CredentialCodec,
        max_attempts: u32,
    ) -> Self {
        Self {
            members,
            codec,
            max_attempts,
        }
    }

    /// Check one username/password pair
    ///
    /// For the admin role only the librarian account is eligible. Unknown
    /// users and wrong passwords produce the same error.
    pub fn check(&self, role: Role, username: &str, password: &str) -> LibrisResult<Member> {
        let candidate = match role {
            Role::Admin if username != ADMIN_USERNAME => None,
            _ => self.members.get_by_name(username)?,
        };

        match candidate {
            Some(member) if self.codec.verify(&member.obfuscated_password, password) => {
                Ok(member)
            }
            _ => Err(LibrisError::Unauthorized(
                "Incorrect username or password".into(),
            )),
        }
    }

    /// Prompt for passwords until one matches or the attempts run out
    ///
    /// `read_password` is called at most `max_attempts` times. After each
    /// wrong password `on_failure` receives the number of attempts left.
    pub fn authenticate<P, F>(
        &self,
        role: Role,
        username: &str,
        mut read_password: P,
        mut on_failure: F,
    ) -> LibrisResult<Member>
    where
        P: FnMut() -> LibrisResult<SecureString>,
        F: FnMut(u32),
    {
        for attempt in 1..=self.max_attempts {
            let password = read_password()?;
            match self.check(role, username, &password) {
                Ok(member) => {
                    tracing::info!(username, %role, attempt, "login succeeded");
                    return Ok(member);
                }
                Err(e) if e.is_unauthorized() => {
                    tracing::warn!(username, %role, attempt, "login failed");
                    on_failure(self.max_attempts - attempt);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::warn!(username, attempts = self.max_attempts, "login attempts exhausted");
        Err(LibrisError::TooManyAttempts {
            attempts: self.max_attempts,
        })
    }
}
