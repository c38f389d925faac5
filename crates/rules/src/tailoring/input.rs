//! Parsing and validation of operator input.

use crate::schema::OdvValue;

use super::decision::Choice;

/// Operator input that cannot be accepted. Always answered with a re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Input must be one of: {0}")]
    NotAChoice(String),

    #[error("expected {expected}, got '{input}'")]
    WrongType { expected: &'static str, input: String },
}

/// Parse an inclusion answer. Empty input means `y`; matching ignores case.
pub fn parse_choice(input: &str, allowed: &[Choice]) -> Result<Choice, InputError> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return Ok(Choice::Include);
    }
    allowed
        .iter()
        .copied()
        .find(|c| c.token() == input)
        .ok_or_else(|| not_a_choice(allowed))
}

fn not_a_choice(allowed: &[Choice]) -> InputError {
    let tokens: Vec<&str> = allowed.iter().map(|c| c.token()).collect();
    let expected = match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    };
    InputError::NotAChoice(expected)
}

/// Parse an ODV answer to the same type as `like`. Empty input returns `like`.
pub fn parse_odv(input: &str, like: &OdvValue) -> Result<OdvValue, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(like.clone());
    }

    let wrong_type = || InputError::WrongType {
        expected: like.type_name(),
        input: input.to_string(),
    };

    match like {
        OdvValue::Integer(_) => input.parse().map(OdvValue::Integer).map_err(|_| wrong_type()),
        OdvValue::Float(_) => input.parse().map(OdvValue::Float).map_err(|_| wrong_type()),
        OdvValue::Boolean(_) => match input.to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(OdvValue::Boolean(true)),
            "false" | "no" | "n" | "0" => Ok(OdvValue::Boolean(false)),
            _ => Err(wrong_type()),
        },
        OdvValue::Text(_) => Ok(OdvValue::Text(input.to_string())),
    }
}
