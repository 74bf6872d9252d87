// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form session: the submission gate.
//!
//! A [`FormSession`] exclusively owns the form input, the per-field
//! errors, the submission state and the cooldown. Each submit is
//! decided in a fixed order:
//!
//! 1. Honeypot filled: dropped silently
//! 2. Cooldown active: rejected with the seconds remaining
//! 3. Field validation: all fields checked, all errors reported
//! 4. Dispatch to the [`EmailSender`]
//!
//! `success` and `error` fall back to `idle` on a timer. Pending timers
//! are aborted when superseded or when the session is dropped.

use crate::config::{Config, StatusConfig};
use crate::limiter::{Cooldown, RateLimitResult};
use crate::transport::{Ack, EmailSender, TemplateParams};
use crate::validator::{ContactValidator, Field, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

/// Raw form contents as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    /// Hidden from humans; bots tend to fill it.
    #[serde(default)]
    pub honeypot: String,
}

impl FormInput {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Subject => &mut self.subject,
            Field::Message => &mut self.message,
        }
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty()) && self.honeypot.is_empty()
    }
}

/// Lifecycle of a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    #[default]
    Idle,
    Sending,
    Success,
    Error,
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Sending => "sending",
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

/// What happened to a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Honeypot was filled; nothing sent, nothing reported
    Discarded,
    /// A send is already outstanding for this session
    Busy,
    /// A previous send succeeded less than one cooldown window ago
    CoolingDown { retry_after_secs: u64 },
    /// One or more fields failed validation
    Invalid(ValidationErrors),
    /// Delivery accepted
    Sent(Ack),
    /// Delivery failed; details are only logged
    Failed,
}

impl SubmitOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Discarded => "discarded",
            Self::Busy => "busy",
            Self::CoolingDown { .. } => "cooling_down",
            Self::Invalid(_) => "invalid",
            Self::Sent(_) => "sent",
            Self::Failed => "failed",
        }
    }

    pub fn was_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }

    /// Text to show the visitor. `None` for silently discarded submissions.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Discarded => None,
            Self::Busy => Some("Your message is still being sent.".to_string()),
            Self::CoolingDown { retry_after_secs } => Some(format!(
                "Please wait {retry_after_secs} seconds before sending another message."
            )),
            Self::Invalid(_) => Some("Please fix the highlighted fields.".to_string()),
            Self::Sent(_) => Some("Message sent! Thank you!".to_string()),
            Self::Failed => Some(
                "Failed to send the message. Please try again or reach out by email directly."
                    .to_string(),
            ),
        }
    }
}

/// One visitor's contact form.
pub struct FormSession {
    input: FormInput,
    errors: ValidationErrors,
    validator: Arc<ContactValidator>,
    cooldown: Cooldown,
    timing: StatusConfig,
    recipient: String,
    sender: Arc<dyn EmailSender>,
    state: Arc<watch::Sender<SubmissionState>>,
    revert: Option<JoinHandle<()>>,
    countdown: Option<JoinHandle<()>>,
}

impl FormSession {
    /// Create a session with its own validator built from `config`.
    pub fn new(config: &Config, sender: Arc<dyn EmailSender>) -> Self {
        let validator = Arc::new(ContactValidator::new(config.validation.clone()));
        Self::with_validator(config, validator, sender)
    }

    /// Create a session sharing a read-only validator (and its blocklist).
    pub fn with_validator(
        config: &Config,
        validator: Arc<ContactValidator>,
        sender: Arc<dyn EmailSender>,
    ) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            input: FormInput::default(),
            errors: ValidationErrors::new(),
            validator,
            cooldown: Cooldown::new(&config.cooldown),
            timing: config.status.clone(),
            recipient: config.delivery.recipient.clone(),
            sender,
            state: Arc::new(state),
            revert: None,
            countdown: None,
        }
    }

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn status(&self) -> SubmissionState {
        *self.state.borrow()
    }

    /// Observe state changes, including timer-driven reverts.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Whether the submit control should be offered.
    pub fn can_submit(&self) -> bool {
        self.status() != SubmissionState::Sending
    }

    pub fn cooldown_remaining(&self) -> Option<Duration> {
        self.cooldown.remaining_at(Instant::now())
    }

    /// Update a field and clear its error.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.input.slot(field) = value.into();
        self.errors.clear(field);
    }

    pub fn set_honeypot(&mut self, value: impl Into<String>) {
        self.input.honeypot = value.into();
    }

    /// Replace the whole input, e.g. from a decoded request body.
    pub fn fill(&mut self, input: FormInput) {
        self.input = input;
        self.errors = ValidationErrors::new();
    }

    /// Run the gate and, if everything passes, send the message.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.status() == SubmissionState::Sending {
            return SubmitOutcome::Busy;
        }

        if !self.input.honeypot.is_empty() {
            warn!("Honeypot field filled, discarding submission");
            return SubmitOutcome::Discarded;
        }

        let limit = self.cooldown.check_at(Instant::now());
        if let RateLimitResult::Limited { .. } = limit {
            let retry_after_secs = limit.retry_after_secs();
            info!(retry_after_secs, "Submission rejected during cooldown");
            return SubmitOutcome::CoolingDown { retry_after_secs };
        }

        self.errors = self.validator.validate(
            &self.input.name,
            &self.input.email,
            &self.input.subject,
            &self.input.message,
        );
        if !self.errors.is_empty() {
            debug!(
                fields = ?self.errors.iter().map(|(f, _)| f.as_str()).collect::<Vec<_>>(),
                "Submission failed validation"
            );
            return SubmitOutcome::Invalid(self.errors.clone());
        }

        let params = self.template_params();
        self.transition(SubmissionState::Sending);

        let guard = SendingGuard::new(Arc::clone(&self.state));
        let result = self.sender.send(&params).await;
        guard.disarm();

        match result {
            Ok(ack) => {
                self.cooldown.record_success_at(Instant::now());
                self.input = FormInput::default();
                self.errors = ValidationErrors::new();
                info!(status = ack.status, sent_at = %ack.sent_at, "Contact message delivered");
                self.transition(SubmissionState::Success);
                self.schedule_revert(SubmissionState::Success, self.timing.success_revert());
                SubmitOutcome::Sent(ack)
            }
            Err(err) => {
                warn!(error = %err, "Contact message delivery failed");
                self.transition(SubmissionState::Error);
                self.schedule_revert(SubmissionState::Error, self.timing.error_revert());
                SubmitOutcome::Failed
            }
        }
    }

    /// Publish the remaining cooldown once per second until it reaches zero.
    ///
    /// # Panics
    ///
    /// Spawns a task, so it must be called from within a Tokio runtime.
    pub fn start_countdown(&mut self) -> watch::Receiver<u64> {
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }

        let now = Instant::now();
        let initial = self.cooldown.check_at(now).retry_after_secs();
        let (tx, rx) = watch::channel(initial);

        if let (Some(last), true) = (self.cooldown.last_success(), initial > 0) {
            let deadline = last + self.cooldown.window();
            self.countdown = Some(tokio::spawn(async move {
                let mut remaining = initial;
                while remaining > 0 {
                    time::sleep_until(deadline - Duration::from_secs(remaining - 1)).await;
                    remaining -= 1;
                    if tx.send(remaining).is_err() {
                        break;
                    }
                }
            }));
        }

        rx
    }

    fn template_params(&self) -> TemplateParams {
        TemplateParams {
            from_name: self.input.name.trim().to_string(),
            from_email: self.input.email.trim().to_lowercase(),
            subject: self.input.subject.trim().to_string(),
            message: self.input.message.trim().to_string(),
            to_email: self.recipient.clone(),
        }
    }

    fn transition(&mut self, next: SubmissionState) {
        if let Some(handle) = self.revert.take() {
            handle.abort();
        }
        let previous = self.state.send_replace(next);
        debug!(from = %previous, to = %next, "Submission state changed");
    }

    fn schedule_revert(&mut self, from: SubmissionState, delay: Duration) {
        let state = Arc::clone(&self.state);
        let deadline = Instant::now() + delay;
        self.revert = Some(tokio::spawn(async move {
            time::sleep_until(deadline).await;
            state.send_if_modified(|current| {
                if *current == from {
                    *current = SubmissionState::Idle;
                    true
                } else {
                    false
                }
            });
        }));
    }
}

/// Puts an abandoned `sending` state back to `idle`.
///
/// Armed across the send await; if the submit future is dropped before
/// the send resolves, the form becomes editable again.
struct SendingGuard {
    state: Option<Arc<watch::Sender<SubmissionState>>>,
}

impl SendingGuard {
    fn new(state: Arc<watch::Sender<SubmissionState>>) -> Self {
        Self { state: Some(state) }
    }

    fn disarm(mut self) {
        self.state = None;
    }
}

impl Drop for SendingGuard {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            warn!("Submission cancelled while sending");
            state.send_if_modified(|current| {
                if *current == SubmissionState::Sending {
                    *current = SubmissionState::Idle;
                    true
                } else {
                    false
                }
            });
        }
    }
}

impl Drop for FormSession {
    fn drop(&mut self) {
        if let Some(handle) = self.revert.take() {
            handle.abort();
        }
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }
    }
}
