// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form field validator.
//!
//! Every field is checked independently so that all errors can be shown
//! at once:
//! - Required / length checks on the trimmed value
//! - Spam pattern rejection for free-text fields
//! - Email shape and disposable-domain blocklist

use crate::config::{LengthBounds, ValidationConfig};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Script tags, bare links, inline event handlers and `javascript:` URLs.
static SPAM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<script|https?://|www\.|\bon[a-z]+\s*=|javascript:")
        .expect("invalid spam pattern")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("invalid email pattern")
});

/// A validated contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Subject => "Subject",
            Self::Message => "Message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single field was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{} is required", .0.label())]
    Required(Field),

    #[error("{} must be at least {min} characters", .field.label())]
    TooShort { field: Field, min: usize },

    #[error("{} must be at most {max} characters", .field.label())]
    TooLong { field: Field, max: usize },

    #[error("{} contains links or script content that is not allowed", .0.label())]
    SpamContent(Field),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please use a permanent email address")]
    BlockedDomain { domain: String },
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-field validation errors. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    /// Drop the entry for a field, typically because the user edited it.
    pub fn clear(&mut self, field: Field) -> Option<FieldError> {
        self.0.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(f, e)| (*f, e))
    }

    /// Human-readable messages keyed by field name.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.0
            .iter()
            .map(|(field, err)| (field.as_str(), err.to_string()))
            .collect()
    }
}

/// Whether free text contains link-like or script-like content.
pub fn is_spam(text: &str) -> bool {
    SPAM_PATTERN.is_match(text)
}

/// Whether text has a conventional `local@domain.tld` shape.
pub fn is_valid_email_shape(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}

/// Lower-cased domain portion of an email address.
pub fn email_domain(email: &str) -> Option<String> {
    email
        .split_once('@')
        .map(|(_, domain)| domain.trim().to_lowercase())
        .filter(|domain| !domain.is_empty())
}

/// Whether the email's domain appears in the blocklist (case-insensitive).
pub fn is_blocked_domain<S: AsRef<str>>(email: &str, blocklist: &[S]) -> bool {
    match email_domain(email) {
        Some(domain) => blocklist
            .iter()
            .any(|blocked| blocked.as_ref().eq_ignore_ascii_case(&domain)),
        None => false,
    }
}

/// Contact form validator.
#[derive(Debug, Clone)]
pub struct ContactValidator {
    config: ValidationConfig,
}

impl Default for ContactValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl ContactValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn validate_name(&self, value: &str) -> Result<(), FieldError> {
        self.validate_text(Field::Name, value, self.config.name)
    }

    pub fn validate_subject(&self, value: &str) -> Result<(), FieldError> {
        self.validate_text(Field::Subject, value, self.config.subject)
    }

    pub fn validate_message(&self, value: &str) -> Result<(), FieldError> {
        self.validate_text(Field::Message, value, self.config.message)
    }

    pub fn validate_email(&self, value: &str) -> Result<(), FieldError> {
        let trimmed = value.trim();
        check_length(Field::Email, trimmed, self.config.email)?;

        if !is_valid_email_shape(trimmed) {
            debug!(email = %trimmed, "Email shape invalid");
            return Err(FieldError::InvalidEmail);
        }

        if is_blocked_domain(trimmed, &self.config.blocked_domains) {
            let domain = email_domain(trimmed).unwrap_or_default();
            debug!(domain = %domain, "Email domain blocked");
            return Err(FieldError::BlockedDomain { domain });
        }

        Ok(())
    }

    /// Validate a single field by name.
    pub fn validate_field(&self, field: Field, value: &str) -> Result<(), FieldError> {
        match field {
            Field::Name => self.validate_name(value),
            Field::Email => self.validate_email(value),
            Field::Subject => self.validate_subject(value),
            Field::Message => self.validate_message(value),
        }
    }

    /// Validate all four fields, collecting every failure.
    pub fn validate(&self, name: &str, email: &str, subject: &str, message: &str) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for (field, value) in [
            (Field::Name, name),
            (Field::Email, email),
            (Field::Subject, subject),
            (Field::Message, message),
        ] {
            if let Err(err) = self.validate_field(field, value) {
                errors.insert(field, err);
            }
        }
        errors
    }

    fn validate_text(&self, field: Field, value: &str, bounds: LengthBounds) -> Result<(), FieldError> {
        let trimmed = value.trim();
        check_length(field, trimmed, bounds)?;

        if is_spam(trimmed) {
            debug!(%field, "Spam pattern matched");
            return Err(FieldError::SpamContent(field));
        }

        Ok(())
    }
}

fn check_length(field: Field, trimmed: &str, bounds: LengthBounds) -> Result<(), FieldError> {
    if trimmed.is_empty() {
        return Err(FieldError::Required(field));
    }

    let len = trimmed.chars().count();
    if len < bounds.min {
        return Err(FieldError::TooShort {
            field,
            min: bounds.min,
        });
    }
    if len > bounds.max {
        return Err(FieldError::TooLong {
            field,
            max: bounds.max,
        });
    }

    Ok(())
}
