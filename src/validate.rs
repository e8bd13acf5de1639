//! Input validators shared by the sign-up, profile and team forms.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::common::Time;
use crate::domain::limits::{auth, team};

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static GITHUB_URL_REGEX: OnceLock<Regex> = OnceLock::new();
static LINKEDIN_URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn regex<'a>(cell: &'a OnceLock<Regex>, pattern: &str) -> &'a Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    regex(&EMAIL_REGEX, r"^[^\s@]+@[^\s@]+\.[^\s@]+$").is_match(email)
}

pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    if !(auth::USERNAME_MIN_LENGTH..=auth::USERNAME_MAX_LENGTH).contains(&len) {
        return false;
    }
    regex(&USERNAME_REGEX, r"^[a-zA-Z0-9_-]+$").is_match(username)
}

/// Length within bounds and at least one uppercase, one lowercase and one digit.
pub fn is_valid_password(password: &str) -> bool {
    let len = password.chars().count();
    if !(auth::PASSWORD_MIN_LENGTH..=auth::PASSWORD_MAX_LENGTH).contains(&len) {
        return false;
    }
    password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

pub fn is_valid_url(url: &str) -> bool {
    regex(
        &URL_REGEX,
        r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$",
    )
    .is_match(url)
}

pub fn is_valid_github_url(url: &str) -> bool {
    regex(
        &GITHUB_URL_REGEX,
        r"^https?://(www\.)?github\.com/[a-zA-Z0-9_-]+$",
    )
    .is_match(url)
}

pub fn is_valid_linkedin_url(url: &str) -> bool {
    regex(
        &LINKEDIN_URL_REGEX,
        r"^https?://(www\.)?linkedin\.com/in/[a-zA-Z0-9_-]+$",
    )
    .is_match(url)
}

pub fn is_valid_team_size(size: usize) -> bool {
    (team::DEFAULT_MIN_SIZE..=team::MAX_SIZE_LIMIT).contains(&size)
}

pub fn is_valid_date_range(start: Time, end: Time) -> bool {
    end > start
}

pub fn is_future_date(date: Time) -> bool {
    date > chrono::Utc::now()
}

/// Trim surrounding whitespace and strip angle brackets.
pub fn sanitize(input: &str) -> String {
    input.trim().chars().filter(|c| *c != '<' && *c != '>').collect()
}

/// Return the required fields that are absent or hold a falsy value
/// (null, false, zero or the empty string).
pub fn missing_fields<'a>(data: &Value, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|field| match data.get(field) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Number(n)) => n.as_f64() == Some(0.0),
            Some(_) => false,
        })
        .collect()
}
