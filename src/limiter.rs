// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Cooldown limiter for contact form submissions.
//!
//! A session may send at most once per cooldown window. Only successful
//! sends start the window; failed deliveries never extend it.

use crate::config::CooldownConfig;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Result of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Submission may proceed
    Allowed,
    /// Submission is inside the cooldown window
    Limited {
        /// Time until the window closes
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Whole seconds left, rounded up so `0.2s` still reads as `1`.
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            Self::Allowed => 0,
            Self::Limited { retry_after } => ceil_secs(*retry_after),
        }
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

/// Per-session cooldown state.
#[derive(Debug, Clone)]
pub struct Cooldown {
    window: Duration,
    last_success: Option<Instant>,
}

impl Cooldown {
    pub fn new(config: &CooldownConfig) -> Self {
        Self {
            window: config.window(),
            last_success: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn last_success(&self) -> Option<Instant> {
        self.last_success
    }

    /// Check whether a submission at `now` is allowed.
    pub fn check_at(&self, now: Instant) -> RateLimitResult {
        let Some(last) = self.last_success else {
            return RateLimitResult::Allowed;
        };

        let elapsed = now.saturating_duration_since(last);
        if elapsed >= self.window {
            RateLimitResult::Allowed
        } else {
            let retry_after = self.window - elapsed;
            debug!(?retry_after, "Submission in cooldown");
            RateLimitResult::Limited { retry_after }
        }
    }

    /// Start a new window after a successful send.
    pub fn record_success_at(&mut self, now: Instant) {
        self.last_success = Some(now);
    }

    /// Remaining cooldown at `now`, if any.
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        match self.check_at(now) {
            RateLimitResult::Allowed => None,
            RateLimitResult::Limited { retry_after } => Some(retry_after),
        }
    }
}
