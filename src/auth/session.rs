//! Login session state machine
//!
//! ```text
//! LoggedOut -> Authenticating -> [MandatoryPasswordChange] -> AdminSession | MemberSession -> LoggedOut
//! ```
//!
//! An identity with the first-login flag set is held in
//! `MandatoryPasswordChange` until a changed record (flag cleared) is handed
//! back. Idle time is measured against the last recorded activity and a
//! session that sat idle past the timeout drops straight to `LoggedOut`.

use crate::error::{LibrisError, LibrisResult};
use crate::models::{Member, Role};
use crate::services::Clock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    Authenticating { role: Role },
    MandatoryPasswordChange { member: Member, role: Role },
    AdminSession { member: Member },
    MemberSession { member: Member },
}

pub struct Session<'a> {
    state: SessionState,
    clock: &'a dyn Clock,
    timeout_secs: i64,
    last_activity: i64,
}

impl<'a> Session<'a> {
    pub fn new(clock: &'a dyn Clock, timeout_secs: i64) -> Self {
        Self {
            state: SessionState::LoggedOut,
            last_activity: clock.now(),
            clock,
            timeout_secs,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The identity behind the session, once authenticated
    pub fn member(&self) -> Option<&Member> {
        match &self.state {
            SessionState::MandatoryPasswordChange { member, .. }
            | SessionState::AdminSession { member }
            | SessionState::MemberSession { member } => Some(member),
            SessionState::LoggedOut | SessionState::Authenticating { .. } => None,
        }
    }

    /// Whether a role menu may be shown
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            SessionState::AdminSession { .. } | SessionState::MemberSession { .. }
        )
    }

    pub fn begin_login(&mut self, role: Role) {
        self.state = SessionState::Authenticating { role };
    }

    pub fn login_failed(&mut self) {
        self.state = SessionState::LoggedOut;
    }

    /// Move an authenticated identity into its session
    pub fn login_succeeded(&mut self, member: Member) -> LibrisResult<()> {
        let role = match &self.state {
            SessionState::Authenticating { role } => *role,
            other => {
                return Err(LibrisError::Unauthorized(format!(
                    "no login in progress (state {})",
                    state_name(other)
                )))
            }
        };

        self.state = if member.first_login {
            tracing::info!(member_id = %member.id, "password change required before login completes");
            SessionState::MandatoryPasswordChange { member, role }
        } else {
            role_session(member, role)
        };
        self.touch();
        Ok(())
    }

    /// Leave the mandatory change state with the updated identity
    ///
    /// Fails, keeping the current state, unless `updated` is the same member
    /// with the first-login flag cleared.
    pub fn password_changed(&mut self, updated: Member) -> LibrisResult<()> {
        let role = match &self.state {
            SessionState::MandatoryPasswordChange { member, role }
                if member.id == updated.id && !updated.first_login =>
            {
                *role
            }
            other => {
                return Err(LibrisError::Unauthorized(format!(
                    "password change not accepted in state {}",
                    state_name(other)
                )))
            }
        };

        self.state = role_session(updated, role);
        self.touch();
        Ok(())
    }

    /// Record activity now
    pub fn touch(&mut self) {
        self.last_activity = self.clock.now();
    }

    /// Expire the session if it sat idle too long, else refresh activity
    pub fn check_timeout(&mut self) -> LibrisResult<()> {
        if matches!(self.state, SessionState::LoggedOut) {
            return Ok(());
        }

        let idle_secs = self.clock.now() - self.last_activity;
        if idle_secs > self.timeout_secs {
            tracing::warn!(idle_secs, timeout_secs = self.timeout_secs, "session timed out");
            self.state = SessionState::LoggedOut;
            return Err(LibrisError::SessionExpired { idle_secs });
        }

        self.touch();
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(member) = self.member() {
            tracing::info!(member_id = %member.id, "logged out");
        }
        self.state = SessionState::LoggedOut;
    }
}

fn role_session(member: Member, role: Role) -> SessionState {
    match role {
        Role::Admin => SessionState::AdminSession { member },
        Role::Member => SessionState::MemberSession { member },
    }
}

fn state_name(state: &SessionState) -> &'static str {
    match state {
        SessionState::LoggedOut => "LoggedOut",
        SessionState::Authenticating { .. } => "Authenticating",
        SessionState::MandatoryPasswordChange { .. } => "MandatoryPasswordChange",
        SessionState::AdminSession { .. } => "AdminSession",
        SessionState::MemberSession { .. } => "MemberSession",
    }
}
