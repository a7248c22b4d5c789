use std::borrow::Cow;
use std::str::FromStr;

use validator::ValidationError;

use crate::models::quiz::{Difficulty, Language};

pub const SUBJECT_MIN_CHARS: u64 = 3;
pub const SUBJECT_MAX_CHARS: u64 = 500;

const SUBJECT_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', '\'', '-', '—', '–', '(', ')', '"', '“', '”', '‘', '’', '«', '»',
];

/// Basic Cyrillic block, so Bulgarian subjects pass.
fn is_cyrillic_letter(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c) && c.is_alphabetic()
}

fn is_allowed_subject_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || is_cyrillic_letter(c)
        || c.is_whitespace()
        || SUBJECT_PUNCTUATION.contains(&c)
}

pub fn validate_subject_charset(subject: &str) -> Result<(), ValidationError> {
    if subject.chars().all(is_allowed_subject_char) {
        Ok(())
    } else {
        Err(with_message(
            "subject_charset",
            "Subject contains invalid characters",
        ))
    }
}

pub fn validate_difficulty(raw: &str) -> Result<(), ValidationError> {
    parse_with_message::<Difficulty>(raw, "difficulty", "Difficulty must be simple, normal or advanced")
}

pub fn validate_language(raw: &str) -> Result<(), ValidationError> {
    parse_with_message::<Language>(raw, "language", "Language must be en or bg")
}

pub fn validate_uuid(raw: &str) -> Result<(), ValidationError> {
    uuid::Uuid::parse_str(raw.trim())
        .map(|_| ())
        .map_err(|_| with_message("uuid", "Session id must be a valid UUID"))
}

fn parse_with_message<T: FromStr>(
    raw: &str,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    raw.parse::<T>()
        .map(|_| ())
        .map_err(|_| with_message(code, message))
}

fn with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}
