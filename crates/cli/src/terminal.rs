use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use hardening_rules::tailoring::Prompter;
use std::collections::BTreeSet;
use std::io::{self, Write};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const PROMPT: Color = Color::Green;
    const WARNING: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// Terminal I/O for the generator and the tailoring session.
#[derive(Debug, Default)]
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Print the available tags, one per line.
    pub fn print_tags(&self, tags: &BTreeSet<String>) -> Result<()> {
        let mut stdout = io::stdout();
        for tag in tags {
            execute!(stdout, Print(format!("{}\n", tag)))?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Print controls that no rule covers.
    pub fn print_missing_controls(&self, level: &str, missing: &[String]) -> Result<()> {
        let mut stdout = io::stdout();
        if missing.is_empty() {
            execute!(
                stdout,
                SetForegroundColor(Colors::HEADER),
                Print(format!("Every {} control is covered by a rule.\n", level)),
                ResetColor,
            )?;
        }
        for control in missing {
            execute!(
                stdout,
                Print(format!(
                    "{} missing from any rule, needs a rule or supplemental inclusion\n",
                    control
                )),
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Print an error message.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Print an info message.
    pub fn print_info(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }
}

impl Prompter for Terminal {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::PROMPT),
            Print(prompt),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "standard input closed",
            ));
        }
        Ok(input.trim().to_string())
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Print(format!("{}\n", message)))?;
        stdout.flush()
    }

    fn warn(&mut self, message: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::WARNING),
            Print(format!("{}\n", message)),
            ResetColor,
        )?;
        stdout.flush()
    }
}

/// Ask for free text until something non-empty is entered, or return `default`
/// on empty input.
pub fn ask_text<P: Prompter>(
    prompter: &mut P,
    prompt: &str,
    default: Option<&str>,
) -> io::Result<String> {
    loop {
        let answer = prompter.ask(prompt)?;
        let answer = answer.trim();
        match (answer.is_empty(), default) {
            (false, _) => return Ok(answer.to_string()),
            (true, Some(default)) => return Ok(default.to_string()),
            (true, None) => prompter.warn(
                "Invalid input: Input required when no default is provided. Please try again.",
            )?,
        }
    }
}

/// Like [`ask_text`], but the answer must be usable as a file name.
pub fn ask_file_name<P: Prompter>(
    prompter: &mut P,
    prompt: &str,
    default: &str,
) -> io::Result<String> {
    loop {
        let name = ask_text(prompter, prompt, Some(default))?;
        if name.starts_with('.') || name.contains(['/', '\\']) {
            prompter.warn(&format!(
                "Invalid input: '{}' cannot be used as a file name. Please try again.",
                name
            ))?;
            continue;
        }
        return Ok(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hardening_rules::tailoring::ScriptedPrompter;

    #[test]
    fn test_ask_text_uses_default_on_empty() {
        let mut prompter = ScriptedPrompter::new([""]);
        let name = ask_text(&mut prompter, "Name: ", Some("cis_lvl1")).unwrap();
        assert_eq!(name, "cis_lvl1");
    }

    #[test]
    fn test_ask_text_requires_input_without_default() {
        let mut prompter = ScriptedPrompter::new(["", "  Ada  "]);
        let name = ask_text(&mut prompter, "Enter your name: ", None).unwrap();
        assert_eq!(name, "Ada");
        assert_eq!(prompter.count_prefixed("Invalid input"), 1);
    }

    #[test]
    fn test_ask_file_name_rejects_paths() {
        let mut prompter = ScriptedPrompter::new(["../etc", ".hidden", "acme"]);
        let name = ask_file_name(&mut prompter, "File: ", "cis_lvl1").unwrap();
        assert_eq!(name, "acme");
        assert_eq!(prompter.count_prefixed("Invalid input"), 2);
    }

    #[test]
    fn test_ask_text_end_of_input() {
        let mut prompter = ScriptedPrompter::default();
        let err = ask_text(&mut prompter, "Name: ", None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
