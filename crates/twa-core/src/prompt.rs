//! Sources of operator input.
//!
//! Key generation asks at most three questions: whether to overwrite an
//! existing keystore and the two passwords when they were not configured.
//! Binaries answer them from the terminal; tests answer from a script.

use std::collections::VecDeque;
use std::sync::Mutex;

use secrecy::SecretString;

use crate::error::{Result, TwaError};

/// Answers interactive questions.
pub trait Prompter {
    /// Asks a yes/no question. Only an explicit yes returns `true`.
    fn confirm(&self, question: &str) -> Result<bool>;

    /// Asks for a secret value. Input should not be echoed.
    fn password(&self, question: &str) -> Result<SecretString>;

    /// Shows a warning ahead of a question.
    fn warn(&self, message: &str);
}

/// Whether an answer to a `(y/N)` question means yes.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Replays pre-recorded answers in order.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    questions: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            questions: Mutex::new(Vec::new()),
            warnings: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far.
    pub fn questions(&self) -> Vec<String> {
        self.questions
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    /// Warnings shown so far.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    fn next_answer(&self, question: &str) -> Result<String> {
        if let Ok(mut questions) = self.questions.lock() {
            questions.push(question.to_string());
        }
        self.answers
            .lock()
            .map_err(|_| TwaError::Prompt("answer queue poisoned".to_string()))?
            .pop_front()
            .ok_or_else(|| TwaError::Prompt(format!("No answer scripted for \"{}\"", question)))
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        self.next_answer(question).map(|answer| is_affirmative(&answer))
    }

    fn password(&self, question: &str) -> Result<SecretString> {
        self.next_answer(question).map(SecretString::from)
    }

    fn warn(&self, message: &str) {
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(message.to_string());
        }
    }
}
