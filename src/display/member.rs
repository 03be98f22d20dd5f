//! Member display formatting

use super::truncate;
use crate::models::Member;

/// Format members as a table; passwords are never shown
pub fn format_member_list(members: &[Member]) -> String {
    if members.is_empty() {
        return "No members found.\n".to_string();
    }

    let mut output = format!(
        "{:<5} | {:<20} | {:<30} | {}\n",
        "ID", "Name", "Email", "Status"
    );
    output.push_str(&"-".repeat(75));
    output.push('\n');

    for member in members {
        let status = if member.first_login {
            "Password change pending"
        } else {
            ""
        };
        output.push_str(&format!(
            "{:<5} | {:<20} | {:<30} | {}\n",
            member.id,
            truncate(&member.name, 20),
            truncate(&member.email, 30),
            status
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberId;

    #[test]
    fn test_password_not_shown() {
        let member = Member::new(MemberId::new(2), "bob", "bob@x.org", "uhdglqj4".into()).unwrap();

        let output = format_member_list(&[member]);
        assert!(output.contains("bob@x.org"));
        assert!(output.contains("Password change pending"));
        assert!(!output.contains("uhdglqj4"));
    }
}
