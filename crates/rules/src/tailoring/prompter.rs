//! Operator I/O seam for the tailoring session.

use std::collections::VecDeque;
use std::io;

/// Console (or scripted) operator interaction.
pub trait Prompter {
    /// Show `prompt` and read one line of operator input.
    ///
    /// End of input must be reported as an error; the session cannot
    /// continue without an operator.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;

    /// Show an informational message.
    fn say(&mut self, message: &str) -> io::Result<()>;

    /// Show a problem the operator should know about.
    fn warn(&mut self, message: &str) -> io::Result<()> {
        self.say(message)
    }
}

/// Test prompter that replays canned answers and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    /// Every prompt and message, in order.
    pub transcript: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Number of transcript lines that start with `prefix`.
    pub fn count_prefixed(&self, prefix: &str) -> usize {
        self.transcript.iter().filter(|l| l.starts_with(prefix)).count()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.transcript.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        self.transcript.push(message.to_string());
        Ok(())
    }
}
