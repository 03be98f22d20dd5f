//! Interactive console menus
//!
//! The top menu offers login and exit. A successful login runs the role menu
//! until logout or session timeout, then control returns to the top menu.
//! Every failure inside an action is printed and the menu carries on; only a
//! closed input stream unwinds all the way out.

use crate::auth::{Authenticator, PasswordPolicy, Session, SessionState};
use crate::config::Settings;
use crate::crypto::{CredentialCodec, SecureString};
use crate::display::{
    format_book_list, format_member_list, format_member_records, format_return_targets,
    format_timestamp, format_transaction_list,
};
use crate::error::{LibrisError, LibrisResult};
use crate::models::{BookId, Member, MemberId, Role, SearchField, TransactionId};
use crate::services::{CatalogService, Clock, LendingService, MemberService};
use crate::storage::Storage;

use super::prompt::Prompter;

/// Everything the menus need, borrowed for the lifetime of the console
pub struct Console<'a, P: Prompter> {
    storage: &'a Storage,
    settings: &'a Settings,
    codec: &'a dyn CredentialCodec,
    clock: &'a dyn Clock,
    prompter: P,
}

impl<'a, P: Prompter> Console<'a, P> {
    pub fn new(
        storage: &'a Storage,
        settings: &'a Settings,
        codec: &'a dyn CredentialCodec,
        clock: &'a dyn Clock,
        prompter: P,
    ) -> Self {
        Self {
            storage,
            settings,
            codec,
            clock,
            prompter,
        }
    }

    /// Run the top menu until the operator exits or input ends
    pub fn run(&mut self) -> LibrisResult<()> {
        loop {
            println!("\n==============================");
            println!("   Library Management System");
            println!("==============================");
            println!("1. Login");
            println!("2. Exit");

            let choice = match self.prompter.int("Choose an option: ") {
                Ok(choice) => choice,
                Err(e) if e.is_end_of_input() => break,
                Err(e) => {
                    report(Err(e))?;
                    continue;
                }
            };

            match choice {
                1 => match self.login() {
                    Err(e) if e.is_end_of_input() => break,
                    other => report(other)?,
                },
                2 => break,
                _ => println!("Invalid choice. Please try again."),
            }
        }

        println!("Saving data... Goodbye!");
        Ok(())
    }

    fn login(&mut self) -> LibrisResult<()> {
        println!("\n--- Login ---");
        println!("1. Login as Librarian (Admin)");
        println!("2. Login as Member");

        let Some(role) = Role::from_choice(self.prompter.int("Select user type: ")?) else {
            println!("Invalid choice.");
            return Ok(());
        };
        let username = self.prompter.line("Username: ")?.trim().to_string();

        let mut session = Session::new(self.clock, self.settings.session_timeout_secs);
        session.begin_login(role);

        let authenticator = Authenticator::new(
            &self.storage.members,
            self.codec,
            self.settings.max_login_attempts,
        );
        let prompter = &mut self.prompter;
        let result = authenticator.authenticate(
            role,
            &username,
            || prompter.password("Password: "),
            |left| println!("Incorrect username or password. Attempts remaining: {}", left),
        );

        match result {
            Ok(member) => {
                println!("Login successful.");
                session.login_succeeded(member)?;
            }
            Err(LibrisError::TooManyAttempts { .. }) => {
                session.login_failed();
                println!("Maximum login attempts exceeded. The account is temporarily locked.");
                return Ok(());
            }
            Err(e) => {
                session.login_failed();
                return Err(e);
            }
        }

        if matches!(
            session.state(),
            SessionState::MandatoryPasswordChange { .. }
        ) {
            if let Err(e) = self.mandatory_password_change(&mut session) {
                session.logout();
                return Err(e);
            }
        }

        match session.state().clone() {
            SessionState::AdminSession { member } => self.admin_menu(&mut session, &member),
            SessionState::MemberSession { member } => self.member_menu(&mut session, &member),
            _ => Ok(()),
        }
    }

    fn mandatory_password_change(&mut self, session: &mut Session<'_>) -> LibrisResult<()> {
        let (member_id, role) = match session.state() {
            SessionState::MandatoryPasswordChange { member, role } => (member.id, *role),
            _ => return Ok(()),
        };
        let policy = PasswordPolicy::for_role(role);
        let service = MemberService::new(self.storage, self.codec);

        println!("\n--- Mandatory Password Change ---");
        loop {
            let new_password = self
                .prompter
                .password(&format!("Enter new password ({}): ", policy.describe()))?;
            if let Err(e) = policy.check(&new_password) {
                println!("Password does not meet the security requirements. Please try again.");
                println!("  {}", e);
                continue;
            }

            let confirmation = self.prompter.password("Confirm new password: ")?;
            match service.change_password(member_id, role, &new_password, &confirmation) {
                Ok(updated) => {
                    println!("Password changed successfully.");
                    return session.password_changed(updated);
                }
                Err(LibrisError::PasswordMismatch) => {
                    println!("Passwords do not match. Please try again.");
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn admin_menu(&mut self, session: &mut Session<'_>, admin: &Member) -> LibrisResult<()> {
        loop {
            if timed_out(session) {
                return Ok(());
            }

            println!("\n--- Librarian Menu ---");
            println!("1. Add Book");
            println!("2. Delete Book");
            println!("3. View All Books");
            println!("4. Add Member");
            println!("5. Delete Member");
            println!("6. View All Transactions");
            println!("7. Reset Member Password");
            println!("8. Logout");
            let choice = self.prompter.int("Select an option: ")?;

            if timed_out(session) {
                return Ok(());
            }

            let result = match choice {
                1 => self.add_book(admin),
                2 => self.delete_book(admin),
                3 => self.list_books(),
                4 => self.add_member(admin),
                5 => self.delete_member(admin),
                6 => self.list_transactions(),
                7 => self.reset_password(admin),
                8 => {
                    session.logout();
                    println!("Logged out.");
                    return Ok(());
                }
                _ => {
                    println!("Invalid option.");
                    Ok(())
                }
            };
            report(result)?;
            session.touch();
        }
    }

    fn member_menu(&mut self, session: &mut Session<'_>, member: &Member) -> LibrisResult<()> {
        loop {
            if timed_out(session) {
                return Ok(());
            }

            println!("\n--- Member Menu ---");
            println!("1. Search for a Book");
            println!("2. Borrow a Book");
            println!("3. Return a Book");
            println!("4. View My Records");
            println!("5. Logout");
            let choice = self.prompter.int("Select an option: ")?;

            if timed_out(session) {
                return Ok(());
            }

            let result = match choice {
                1 => self.search_books(),
                2 => self.borrow_book(member),
                3 => self.return_book(member),
                4 => self.view_my_records(member),
                5 => {
                    session.logout();
                    println!("Logged out.");
                    return Ok(());
                }
                _ => {
                    println!("Invalid option.");
                    Ok(())
                }
            };
            report(result)?;
            session.touch();
        }
    }

    // --- Librarian actions ---

    fn add_book(&mut self, admin: &Member) -> LibrisResult<()> {
        println!("\n--- Add a New Book ---");
        let title = self.prompter.line("Book Title: ")?;
        let author = self.prompter.line("Author: ")?;
        let category = self.prompter.line("Category: ")?;
        let quantity = self.prompter.int("Total Quantity: ")?;

        let book = CatalogService::new(self.storage).add_book(
            &admin.name,
            &title,
            &author,
            &category,
            quantity,
        )?;
        println!("Book added successfully! Book ID: {}", book.id);
        Ok(())
    }

    fn delete_book(&mut self, admin: &Member) -> LibrisResult<()> {
        println!("\n--- Delete a Book ---");
        let id = self.read_id::<BookId>("Enter the ID of the book to delete: ")?;

        CatalogService::new(self.storage).delete_book(&admin.name, id)?;
        println!("Book deleted successfully.");
        Ok(())
    }

    fn list_books(&mut self) -> LibrisResult<()> {
        println!("\n--- List of All Books ---");
        let books = CatalogService::new(self.storage).list()?;
        print!("{}", format_book_list(&books));
        Ok(())
    }

    fn add_member(&mut self, admin: &Member) -> LibrisResult<()> {
        println!("\n--- Add a New Member ---");
        let name = self.prompter.line("Member Name: ")?;
        let email = self.prompter.line("Email: ")?;
        let password = self.read_compliant_password(
            Role::Member,
            "Enter initial password (min 8 chars, at least 1 number): ",
        )?;

        let member = MemberService::new(self.storage, self.codec).add_member(
            &admin.name,
            &name,
            &email,
            &password,
        )?;
        println!("Member added successfully! Member ID: {}", member.id);
        Ok(())
    }

    fn delete_member(&mut self, admin: &Member) -> LibrisResult<()> {
        println!("\n--- Delete a Member ---");
        let service = MemberService::new(self.storage, self.codec);
        print!("{}", format_member_list(&service.list()?));
        let id = self.read_id::<MemberId>("Enter the ID of the member to delete: ")?;

        service.delete_member(&admin.name, id)?;
        println!("Member deleted successfully.");
        Ok(())
    }

    fn list_transactions(&mut self) -> LibrisResult<()> {
        println!("\n--- All Transactions ---");
        let lending = LendingService::new(self.storage, self.settings, self.clock);
        print!(
            "{}",
            format_transaction_list(&lending.all_transactions()?, &self.settings.currency_symbol)
        );
        Ok(())
    }

    fn reset_password(&mut self, admin: &Member) -> LibrisResult<()> {
        println!("\n--- Reset Member Password ---");
        let service = MemberService::new(self.storage, self.codec);
        let id = self.read_id::<MemberId>("Enter member ID: ")?;
        let target = service
            .get(id)?
            .ok_or_else(|| LibrisError::member_not_found(id.to_string()))?;

        let role = if target.is_admin() {
            Role::Admin
        } else {
            Role::Member
        };
        let password = self.read_compliant_password(role, "Enter new password for member: ")?;

        service.reset_password(&admin.name, id, &password)?;
        println!(
            "Password has been reset successfully. Member will be asked to change it on next login."
        );
        Ok(())
    }

    // --- Member actions ---

    fn search_books(&mut self) -> LibrisResult<()> {
        println!("\n--- Search for a Book ---");
        println!("1. Search by Title");
        println!("2. Search by Author");
        println!("3. Search by Category");
        let Some(field) = SearchField::from_choice(self.prompter.int("Choose search method: ")?)
        else {
            println!("Invalid choice.");
            return Ok(());
        };
        let query = self.prompter.line("Enter search term: ")?;

        let found = CatalogService::new(self.storage).search(field, &query)?;
        println!("\n--- Search Results ---");
        if found.is_empty() {
            println!("No books found matching your search.");
        } else {
            print!("{}", format_book_list(&found));
        }
        Ok(())
    }

    fn borrow_book(&mut self, member: &Member) -> LibrisResult<()> {
        println!("\n--- Borrow a Book ---");
        let id = self.read_id::<BookId>("Enter the ID of the book you want to borrow: ")?;

        let lending = LendingService::new(self.storage, self.settings, self.clock);
        let transaction = match lending.borrow(member, id) {
            Err(e) if e.is_not_found() => {
                println!("Book not found.");
                return Ok(());
            }
            Err(LibrisError::Unavailable { .. }) => {
                println!("Sorry, this book is currently unavailable.");
                return Ok(());
            }
            other => other?,
        };
        println!(
            "Book borrowed successfully. The due date is: {}",
            format_timestamp(transaction.due_at, &self.settings.date_format)
        );
        Ok(())
    }

    fn return_book(&mut self, member: &Member) -> LibrisResult<()> {
        println!("\n--- Return a Book ---");
        let lending = LendingService::new(self.storage, self.settings, self.clock);

        let loans = lending.outstanding_loans(member.id)?;
        if loans.is_empty() {
            println!("You have no books to return.");
            return Ok(());
        }
        println!("Books you have borrowed and not yet returned:");
        print!("{}", format_return_targets(&loans));

        let id = self.read_id::<TransactionId>(
            "Enter the transaction ID for the book you want to return: ",
        )?;
        let receipt = match lending.return_book(member, id) {
            Err(e) if e.is_not_found() => {
                println!("Invalid transaction ID or book has already been returned.");
                return Ok(());
            }
            other => other?,
        };

        if receipt.was_late() {
            println!(
                "The book is overdue! A fine of {} has been charged.",
                receipt.fine.format_with_symbol(&self.settings.currency_symbol)
            );
        } else {
            println!("Thank you for returning the book on time.");
        }
        println!("Book returned successfully.");
        Ok(())
    }

    fn view_my_records(&mut self, member: &Member) -> LibrisResult<()> {
        println!("\n--- My Personal Records ---");
        let lending = LendingService::new(self.storage, self.settings, self.clock);
        let records = lending.records_for(member.id)?;
        print!(
            "{}",
            format_member_records(
                &records,
                &self.settings.date_format,
                &self.settings.currency_symbol
            )
        );
        Ok(())
    }

    // --- Input helpers ---

    /// Read a record id; anything that is not a positive integer is rejected
    fn read_id<T: From<u32>>(&mut self, prompt: &str) -> LibrisResult<T> {
        let raw = self.prompter.int(prompt)?;
        u32::try_from(raw)
            .map(T::from)
            .map_err(|_| LibrisError::Validation(format!("{} is not a valid ID", raw)))
    }

    /// Ask until the password satisfies the role's policy
    fn read_compliant_password(&mut self, role: Role, prompt: &str) -> LibrisResult<SecureString> {
        let policy = PasswordPolicy::for_role(role);
        loop {
            let password = self.prompter.password(prompt)?;
            match policy.check(&password) {
                Ok(()) => return Ok(password),
                Err(e) => {
                    tracing::debug!(error = %e, "rejected password");
                    println!("Weak password. Requirements: {}.", policy.describe());
                }
            }
        }
    }
}

/// Print a failed action and carry on; closed input still propagates
fn report(result: LibrisResult<()>) -> LibrisResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_end_of_input() => Err(e),
        Err(e) => {
            if e.is_persistence() {
                tracing::error!(error = %e, "action failed to persist");
            }
            println!("Error: {}", e);
            Ok(())
        }
    }
}

fn timed_out(session: &mut Session<'_>) -> bool {
    if session.check_timeout().is_err() {
        println!("\nSession timed out due to inactivity. You have been logged out.");
        true
    } else {
        false
    }
}
