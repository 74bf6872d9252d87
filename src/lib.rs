// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gate
//!
//! This crate gates contact-form submissions before they reach an
//! email delivery service:
//!
//! - Honeypot field: suspected bots are dropped silently
//! - Cooldown: one successful send per session every 60 seconds
//! - Per-field validation: required, length bounds, spam pattern
//! - Email shape and disposable-domain blocklist
//! - Submission state with timed `success` / `error` reverts

pub mod config;
pub mod fallback;
pub mod limiter;
pub mod session;
pub mod transport;
pub mod validator;

pub use config::Config;
pub use limiter::{Cooldown, RateLimitResult};
pub use session::{FormInput, FormSession, SubmissionState, SubmitOutcome};
pub use transport::{Ack, EmailJsSender, EmailSender, TemplateParams, TransportError};
pub use validator::{ContactValidator, Field, FieldError, ValidationErrors};
