//! Terminal-backed answers to key generation questions.

use std::io::{self, BufRead, Write};

use console::Term;
use secrecy::SecretString;
use twa_core::prompt::{is_affirmative, Prompter};
use twa_core::{Result, TwaError};

use crate::output;

/// Reads answers from stdin.
///
/// Passwords are read without echo when stdout is a terminal. With
/// `assume_yes` the overwrite question is answered without asking.
#[derive(Debug, Default)]
pub struct StdinPrompter {
    assume_yes: bool,
}

impl StdinPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn ask(&self, question: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut line = String::new();
        // EOF leaves the answer empty, which declines
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Prompter for StdinPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        if self.assume_yes {
            println!("{}y", question);
            return Ok(true);
        }
        Ok(is_affirmative(&self.ask(question)?))
    }

    fn password(&self, question: &str) -> Result<SecretString> {
        let term = Term::stdout();
        if !term.is_term() {
            return self.ask(question).map(SecretString::from);
        }

        term.write_str(question)
            .and_then(|_| term.read_secure_line())
            .map(SecretString::from)
            .map_err(|e| TwaError::Prompt(format!("Failed to read password: {}", e)))
    }

    fn warn(&self, message: &str) {
        for line in message.lines() {
            output::print_warning(line);
        }
        eprintln!();
    }
}
