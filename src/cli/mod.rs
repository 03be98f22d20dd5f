//! Interactive console
//!
//! [`Console`] drives the login flow and the librarian and member menus.
//! Input comes through a [`Prompter`], which lets tests script a whole
//! session.

mod menu;
mod prompt;

pub use menu::Console;
pub use prompt::{Prompter, ScriptedPrompter, StdinPrompter};
