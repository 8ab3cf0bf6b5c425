use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::ValidationResult;

pub const MESSAGE_MAX_LENGTH: usize = 500;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

/// How close the message is to the length limit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterLevel {
    Normal,
    Warning,
    Danger,
}

impl CounterLevel {
    pub fn for_remaining(remaining: i64) -> Self {
        if remaining < 50 {
            Self::Danger
        } else if remaining < 100 {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReport {
    pub valid: bool,
    pub name: ValidationResult,
    pub email: ValidationResult,
    pub phone: ValidationResult,
    pub message: ValidationResult,
    pub remaining_characters: i64,
    pub counter: CounterLevel,
}

pub struct ContactValidator {
    email_regex: Regex,
    phone_regex: Regex,
}

impl ContactValidator {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap(),
            phone_regex: Regex::new(r"^\+?[0-9\s-]{10,}$").unwrap(),
        }
    }

    pub fn validate_name(&self, name: &str) -> ValidationResult {
        if name.chars().count() >= 2 {
            ValidationResult::valid("Looks good!")
        } else {
            ValidationResult::invalid("Name must be at least 2 characters")
        }
    }

    pub fn validate_email(&self, email: &str) -> ValidationResult {
        if self.email_regex.is_match(email) {
            ValidationResult::valid("Valid email!")
        } else {
            ValidationResult::invalid("Please enter a valid email address")
        }
    }

    /// The phone number is optional, so an empty one passes.
    pub fn validate_phone(&self, phone: &str) -> ValidationResult {
        if phone.is_empty() || self.phone_regex.is_match(phone) {
            ValidationResult::valid("Valid phone number!")
        } else {
            ValidationResult::invalid("Please enter a valid phone number")
        }
    }

    pub fn validate_message(&self, message: &str) -> ValidationResult {
        let length = message.chars().count();
        if length == 0 {
            ValidationResult::invalid("Please enter a message")
        } else if length > MESSAGE_MAX_LENGTH {
            ValidationResult::invalid(format!(
                "Message must be at most {} characters",
                MESSAGE_MAX_LENGTH
            ))
        } else {
            ValidationResult::valid("Message looks good!")
        }
    }

    pub fn validate(&self, form: &ContactForm) -> ContactReport {
        let name = self.validate_name(&form.name);
        let email = self.validate_email(&form.email);
        let phone = self.validate_phone(&form.phone);
        let message = self.validate_message(&form.message);
        let remaining_characters = remaining_characters(&form.message);
        let valid = [&name, &email, &phone, &message]
            .iter()
            .all(|result| result.is_valid());

        ContactReport {
            valid,
            name,
            email,
            phone,
            message,
            remaining_characters,
            counter: CounterLevel::for_remaining(remaining_characters),
        }
    }
}

impl Default for ContactValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Can go negative once the message is over the limit.
pub fn remaining_characters(message: &str) -> i64 {
    MESSAGE_MAX_LENGTH as i64 - message.chars().count() as i64
}
