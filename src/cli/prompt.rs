//! Operator input
//!
//! Menus read through [`Prompter`] so the same flows run against a terminal,
//! a pipe, or a script in tests. A closed input stream surfaces as
//! [`LibrisError::EndOfInput`].

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::crypto::SecureString;
use crate::error::{LibrisError, LibrisResult};

/// Source of operator input
pub trait Prompter {
    /// Read one line, without the line terminator
    fn line(&mut self, prompt: &str) -> LibrisResult<String>;

    /// Read a password; terminal input is not echoed
    fn password(&mut self, prompt: &str) -> LibrisResult<SecureString>;

    /// Read an integer, asking again until one is entered
    fn int(&mut self, prompt: &str) -> LibrisResult<i64> {
        loop {
            match self.line(prompt)?.trim().parse() {
                Ok(value) => return Ok(value),
                Err(_) => println!("Invalid input. Please enter an integer."),
            }
        }
    }
}

/// Reads from standard input
///
/// Passwords are read without echo when stdin is a terminal, and as plain
/// lines otherwise so that piped input works.
pub struct StdinPrompter {
    interactive: bool,
}

impl StdinPrompter {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }

    fn read_raw(&mut self, prompt: &str) -> LibrisResult<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut buffer = String::new();
        if io::stdin().lock().read_line(&mut buffer)? == 0 {
            return Err(LibrisError::EndOfInput);
        }

        let trimmed_len = buffer.trim_end_matches(['\n', '\r']).len();
        buffer.truncate(trimmed_len);
        Ok(buffer)
    }
}

impl Default for StdinPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for StdinPrompter {
    fn line(&mut self, prompt: &str) -> LibrisResult<String> {
        self.read_raw(prompt)
    }

    fn password(&mut self, prompt: &str) -> LibrisResult<SecureString> {
        if self.interactive {
            return rpassword::prompt_password(prompt)
                .map(SecureString::new)
                .map_err(|e| match e.kind() {
                    io::ErrorKind::UnexpectedEof => LibrisError::EndOfInput,
                    _ => LibrisError::Io(format!("Failed to read password: {}", e)),
                });
        }

        self.read_raw(prompt).map(SecureString::new)
    }
}

/// Replays a fixed list of answers
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn line(&mut self, prompt: &str) -> LibrisResult<String> {
        let answer = self.answers.pop_front().ok_or(LibrisError::EndOfInput)?;
        println!("{}{}", prompt, answer);
        Ok(answer)
    }

    fn password(&mut self, prompt: &str) -> LibrisResult<SecureString> {
        let answer = self.answers.pop_front().ok_or(LibrisError::EndOfInput)?;
        println!("{}", prompt);
        Ok(SecureString::new(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_retries_until_number() {
        let mut prompter = ScriptedPrompter::new(["abc", "", " 42 "]);
        assert_eq!(prompter.int("Choice: ").unwrap(), 42);
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_exhausted_script_is_end_of_input() {
        let mut prompter = ScriptedPrompter::new(["only"]);
        assert_eq!(prompter.line("> ").unwrap(), "only");
        assert!(prompter.password("> ").unwrap_err().is_end_of_input());
        assert!(prompter.int("> ").unwrap_err().is_end_of_input());
    }
}
