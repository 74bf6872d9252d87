// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact-form submission gate.
//!
//! Defaults reproduce the behaviour of the portfolio contact form:
//! a 60 second cooldown after a successful send, a 5 second success
//! banner, a 3 second error banner, and the per-field length bounds.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration errors detected by [`Config::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid delivery endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Missing delivery setting: {0}")]
    MissingSetting(&'static str),

    #[error("Invalid length bounds for {field}: min {min} > max {max}")]
    InvalidBounds {
        field: &'static str,
        min: usize,
        max: usize,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Outbound delivery settings
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Cooldown between successful submissions
    #[serde(default)]
    pub cooldown: CooldownConfig,

    /// Auto-revert delays for the submission status
    #[serde(default)]
    pub status: StatusConfig,

    /// Field validation rules
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Settings for the email delivery service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// REST endpoint of the delivery service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Service identifier registered with the delivery service
    #[serde(default = "default_service_id")]
    pub service_id: String,

    /// Template identifier used to render the email
    #[serde(default = "default_template_id")]
    pub template_id: String,

    /// Public key (credential) sent as `user_id`
    #[serde(default)]
    pub public_key: String,

    /// Fixed recipient address passed as `to_email`
    #[serde(default)]
    pub recipient: String,

    /// Request timeout in milliseconds (default: 10000)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Cooldown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    /// Minimum seconds between two successful submissions (default: 60)
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

/// Delays before `success` / `error` fall back to `idle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default = "default_success_revert_ms")]
    pub success_revert_ms: u64,

    #[serde(default = "default_error_revert_ms")]
    pub error_revert_ms: u64,
}

/// Inclusive length range, counted in characters of the trimmed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl LengthBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// Validation rules for the contact form fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_name_bounds")]
    pub name: LengthBounds,

    #[serde(default = "default_email_bounds")]
    pub email: LengthBounds,

    #[serde(default = "default_subject_bounds")]
    pub subject: LengthBounds,

    #[serde(default = "default_message_bounds")]
    pub message: LengthBounds,

    /// Disposable or placeholder email domains that are always rejected
    #[serde(default = "default_blocked_domains")]
    pub blocked_domains: Vec<String>,
}

// Default value functions
fn default_endpoint() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

fn default_service_id() -> String {
    "service_portfolio".to_string()
}

fn default_template_id() -> String {
    "template_contact".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_success_revert_ms() -> u64 {
    5_000
}

fn default_error_revert_ms() -> u64 {
    3_000
}

fn default_name_bounds() -> LengthBounds {
    LengthBounds::new(2, 60)
}

fn default_email_bounds() -> LengthBounds {
    LengthBounds::new(10, 100)
}

fn default_subject_bounds() -> LengthBounds {
    LengthBounds::new(3, 100)
}

fn default_message_bounds() -> LengthBounds {
    LengthBounds::new(10, 2000)
}

/// Disposable-mail providers and placeholder domains.
pub const BLOCKED_DOMAINS: &[&str] = &[
    "mailinator.com",
    "guerrillamail.com",
    "guerrillamail.net",
    "guerrillamail.org",
    "sharklasers.com",
    "grr.la",
    "10minutemail.com",
    "tempmail.com",
    "temp-mail.org",
    "tempmail.net",
    "tempinbox.com",
    "tempail.com",
    "tempr.email",
    "throwawaymail.com",
    "yopmail.com",
    "trashmail.com",
    "getnada.com",
    "dispostable.com",
    "maildrop.cc",
    "fakeinbox.com",
    "mailnesia.com",
    "mintemail.com",
    "mohmal.com",
    "emailondeck.com",
    "spamgourmet.com",
    "mytemp.email",
    "burnermail.io",
    "mailcatch.com",
    "moakt.com",
    "discard.email",
    "spambox.us",
    "inboxkitten.com",
    "test.com",
    "test.org",
    "example.com",
    "example.org",
    "example.net",
    "domain.com",
    "fake.com",
    "asdf.com",
];

fn default_blocked_domains() -> Vec<String> {
    BLOCKED_DOMAINS.iter().map(|d| d.to_string()).collect()
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            service_id: default_service_id(),
            template_id: default_template_id(),
            public_key: String::new(),
            recipient: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            success_revert_ms: default_success_revert_ms(),
            error_revert_ms: default_error_revert_ms(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name: default_name_bounds(),
            email: default_email_bounds(),
            subject: default_subject_bounds(),
            message: default_message_bounds(),
            blocked_domains: default_blocked_domains(),
        }
    }
}

impl CooldownConfig {
    /// Get the cooldown window
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl StatusConfig {
    pub fn success_revert(&self) -> Duration {
        Duration::from_millis(self.success_revert_ms)
    }

    pub fn error_revert(&self) -> Duration {
        Duration::from_millis(self.error_revert_ms)
    }
}

impl DeliveryConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Parse the endpoint, accepting only http(s) URLs with a host.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::InvalidEndpoint {
                url: self.endpoint.clone(),
                reason: "expected an http(s) URL with a host".to_string(),
            });
        }

        Ok(url)
    }
}

impl Config {
    /// Check settings that cannot be expressed through serde defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delivery.endpoint_url()?;

        if self.delivery.recipient.trim().is_empty() {
            return Err(ConfigError::MissingSetting("recipient"));
        }
        if self.delivery.public_key.trim().is_empty() {
            return Err(ConfigError::MissingSetting("public_key"));
        }

        let v = &self.validation;
        for (field, bounds) in [
            ("name", v.name),
            ("email", v.email),
            ("subject", v.subject),
            ("message", v.message),
        ] {
            if bounds.min > bounds.max {
                return Err(ConfigError::InvalidBounds {
                    field,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }

        Ok(())
    }
}
