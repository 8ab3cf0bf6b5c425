use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::ValidationResult;

pub const PASSWORD_MIN_LENGTH: usize = 8;
/// How many of the five strength checks a password has to pass.
pub const REQUIRED_CHECKS: usize = 3;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChecks {
    pub has_upper_case: bool,
    pub has_lower_case: bool,
    pub has_numbers: bool,
    pub has_special_char: bool,
    pub is_long_enough: bool,
}

impl PasswordChecks {
    pub fn passed(&self) -> usize {
        [
            self.has_upper_case,
            self.has_lower_case,
            self.has_numbers,
            self.has_special_char,
            self.is_long_enough,
        ]
        .into_iter()
        .filter(|check| *check)
        .count()
    }

    /// 0, 20, 40, 60, 80 or 100.
    pub fn strength_percentage(&self) -> u8 {
        (self.passed() * 20) as u8
    }
}

/// Colour band of the strength meter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLevel {
    pub fn for_percentage(percentage: u8) -> Self {
        match percentage {
            0..=40 => Self::Weak,
            41..=70 => Self::Medium,
            _ => Self::Strong,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SignupReport {
    pub valid: bool,
    pub password: ValidationResult,
    pub confirm: ValidationResult,
    pub checks: PasswordChecks,
    pub strength: u8,
    pub level: StrengthLevel,
}

pub struct SignupValidator {
    upper_regex: Regex,
    lower_regex: Regex,
    digit_regex: Regex,
    special_regex: Regex,
}

impl SignupValidator {
    pub fn new() -> Self {
        Self {
            upper_regex: Regex::new(r"[A-Z]").unwrap(),
            lower_regex: Regex::new(r"[a-z]").unwrap(),
            digit_regex: Regex::new(r"[0-9]").unwrap(),
            special_regex: Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).unwrap(),
        }
    }

    pub fn check_password_strength(&self, password: &str) -> PasswordChecks {
        PasswordChecks {
            has_upper_case: self.upper_regex.is_match(password),
            has_lower_case: self.lower_regex.is_match(password),
            has_numbers: self.digit_regex.is_match(password),
            has_special_char: self.special_regex.is_match(password),
            is_long_enough: password.chars().count() >= PASSWORD_MIN_LENGTH,
        }
    }

    pub fn validate_password(&self, password: &str) -> ValidationResult {
        if password.is_empty() {
            return ValidationResult::invalid("Password is required");
        }
        let checks = self.check_password_strength(password);
        if !checks.is_long_enough {
            return ValidationResult::invalid(format!(
                "Password must be at least {} characters",
                PASSWORD_MIN_LENGTH
            ));
        }
        if checks.passed() < REQUIRED_CHECKS {
            return ValidationResult::invalid(
                "Password must contain at least 3: uppercase, lowercase, number, special character",
            );
        }
        ValidationResult::valid("Password is strong")
    }

    pub fn validate_confirm_password(&self, password: &str, confirm: &str) -> ValidationResult {
        if confirm.is_empty() {
            return ValidationResult::invalid("Please confirm your password");
        }
        if confirm != password {
            return ValidationResult::invalid("Passwords do not match");
        }
        ValidationResult::valid("Passwords match")
    }

    pub fn validate(&self, form: &SignupForm) -> SignupReport {
        let password = self.validate_password(&form.password);
        let confirm = self.validate_confirm_password(&form.password, &form.confirm_password);
        let checks = self.check_password_strength(&form.password);
        let strength = checks.strength_percentage();

        SignupReport {
            valid: password.is_valid() && confirm.is_valid(),
            password,
            confirm,
            checks,
            strength,
            level: StrengthLevel::for_percentage(strength),
        }
    }
}

impl Default for SignupValidator {
    fn default() -> Self {
        Self::new()
    }
}
