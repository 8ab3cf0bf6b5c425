use serde::Serialize;

/// The verdict on a single form field, with the message shown next to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    message: String,
}

impl ValidationResult {
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[cfg(test)]
    pub fn message(&self) -> &str {
        &self.message
    }
}
