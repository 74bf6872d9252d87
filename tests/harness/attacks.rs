// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Scripted submission patterns for security testing.

use super::generators;
use contact_gate::session::FormInput;
use std::time::Duration;

/// Kind of traffic a pattern produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traffic {
    Legitimate,
    HoneypotBot,
    LinkSpam,
    DisposableEmail,
}

/// Submission pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submit attempts
    pub total_submissions: usize,
    /// Pause between attempts
    pub interval: Duration,
    /// What each attempt carries
    pub traffic: Traffic,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_submissions: 20,
            interval: Duration::from_secs(1),
            traffic: Traffic::Legitimate,
        }
    }
}

/// Predefined patterns.
impl AttackConfig {
    /// Bot that fills every field, including the hidden one.
    pub fn honeypot_bot() -> Self {
        Self {
            total_submissions: 50,
            interval: Duration::from_millis(200),
            traffic: Traffic::HoneypotBot,
        }
    }

    /// Human-looking forms with links or scripts in the message.
    pub fn link_spammer() -> Self {
        Self {
            total_submissions: 30,
            traffic: Traffic::LinkSpam,
            ..Default::default()
        }
    }

    /// Throwaway addresses from disposable-mail providers.
    pub fn disposable_mailer() -> Self {
        Self {
            total_submissions: 40,
            traffic: Traffic::DisposableEmail,
            ..Default::default()
        }
    }

    /// Valid forms resubmitted every 5 seconds.
    pub fn rapid_repeat() -> Self {
        Self {
            total_submissions: 20,
            interval: Duration::from_secs(5),
            traffic: Traffic::Legitimate,
        }
    }

    /// Valid forms spaced just beyond the cooldown window.
    pub fn slow_drip() -> Self {
        Self {
            total_submissions: 5,
            interval: Duration::from_secs(61),
            traffic: Traffic::Legitimate,
        }
    }

    /// Materialise the form inputs for this pattern.
    pub fn inputs(&self) -> Vec<FormInput> {
        let n = self.total_submissions;
        match self.traffic {
            Traffic::Legitimate => generators::generate_visitors(n),
            Traffic::HoneypotBot => generators::generate_honeypot_bots(n),
            Traffic::LinkSpam => generators::generate_link_spam(n),
            Traffic::DisposableEmail => generators::generate_disposable(n),
        }
    }
}
