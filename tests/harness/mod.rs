// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

#![allow(dead_code)]

//! Test harness for contact gate bot-traffic simulation.
//!
//! This module provides a recording sender and utilities for driving
//! scripted submission patterns through a form session.

pub mod attacks;
pub mod metrics;

use async_trait::async_trait;
use contact_gate::transport::{Ack, EmailSender, TemplateParams, TransportError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Sender that records every delivery and can be switched to fail.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<TemplateParams>>,
    failing: AtomicBool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<TemplateParams> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, params: &TemplateParams) -> Result<Ack, TransportError> {
        self.sent.lock().unwrap().push(params.clone());
        if self.failing.load(Ordering::SeqCst) {
            Err(TransportError::Rejected {
                status: 503,
                body: "service unavailable".to_string(),
            })
        } else {
            Ok(Ack::now(200))
        }
    }
}
