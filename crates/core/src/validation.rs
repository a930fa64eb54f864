use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::ValidationError;

pub const BIRTHDAY_FORMAT: &str = "%d-%m-%Y";

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub trait FieldValidator {
    fn validate(&self, raw: &str) -> Result<String, ValidationError>;
}

impl<F> FieldValidator for F
where
    F: Fn(&str) -> Result<String, ValidationError>,
{
    fn validate(&self, raw: &str) -> Result<String, ValidationError> {
        self(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Phone,
    Email,
    Birthday,
    Address,
    Text,
    Tags,
    Days,
    Choice(usize),
}

impl FieldValidator for FieldKind {
    fn validate(&self, raw: &str) -> Result<String, ValidationError> {
        match *self {
            FieldKind::Name => validate_name(raw),
            FieldKind::Phone => validate_phone(raw),
            FieldKind::Email => validate_email(raw),
            FieldKind::Birthday => validate_birthday(raw),
            FieldKind::Address => validate_address(raw),
            FieldKind::Text => validate_text(raw),
            FieldKind::Tags => Ok(split_tags(raw).join(", ")),
            FieldKind::Days => validate_days(raw),
            FieldKind::Choice(max) => validate_choice(raw, max),
        }
    }
}

pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.chars().count() < 2 {
        return Err(ValidationError::NameTooShort);
    }
    Ok(name.to_string())
}

pub fn validate_phone(raw: &str) -> Result<String, ValidationError> {
    let phone = raw.trim();
    if !PHONE.is_match(phone) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(phone.to_string())
}

pub fn validate_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim();
    if !EMAIL.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_string())
}

pub fn validate_birthday(raw: &str) -> Result<String, ValidationError> {
    parse_birthday(raw).map(|date| date.format(BIRTHDAY_FORMAT).to_string())
}

pub fn parse_birthday(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), BIRTHDAY_FORMAT)
        .map_err(|_| ValidationError::InvalidBirthday)
}

pub fn validate_address(raw: &str) -> Result<String, ValidationError> {
    let address = raw.trim();
    if address.chars().count() < 5 {
        return Err(ValidationError::AddressTooShort);
    }
    Ok(address.to_string())
}

pub fn validate_text(raw: &str) -> Result<String, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(text.to_string())
}

pub fn validate_days(raw: &str) -> Result<String, ValidationError> {
    raw.trim()
        .parse::<u32>()
        .map(|days| days.to_string())
        .map_err(|_| ValidationError::NotANumber)
}

pub fn validate_choice(raw: &str, max: usize) -> Result<String, ValidationError> {
    match raw.trim().parse::<usize>() {
        Ok(choice) if (1..=max).contains(&choice) => Ok(choice.to_string()),
        _ => Err(ValidationError::OutOfRange { max }),
    }
}

pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}
