// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound email delivery.
//!
//! The gate treats delivery as an opaque capability behind [`EmailSender`].
//! [`EmailJsSender`] talks to the EmailJS REST API.

use crate::config::{ConfigError, DeliveryConfig};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Template variables rendered into the outgoing email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub message: String,
    pub to_email: String,
}

/// Acknowledgement from the delivery service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    /// HTTP status returned by the service
    pub status: u16,
    pub sent_at: DateTime<Utc>,
}

impl Ack {
    pub fn now(status: u16) -> Self {
        Self {
            status,
            sent_at: Utc::now(),
        }
    }
}

/// Delivery failure. Never shown verbatim to the person submitting.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Delivery request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Delivery rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Capability to send one rendered contact email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, params: &TemplateParams) -> Result<Ack, TransportError>;
}

/// Request body accepted by `POST /api/v1.0/email/send`.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

/// EmailJS REST client.
pub struct EmailJsSender {
    endpoint: Url,
    service_id: String,
    template_id: String,
    public_key: String,
    client: reqwest::Client,
}

impl EmailJsSender {
    /// Create a client from delivery settings.
    pub fn new(config: &DeliveryConfig) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint_url()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::InvalidEndpoint {
                url: config.endpoint.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            endpoint,
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            public_key: config.public_key.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EmailSender for EmailJsSender {
    async fn send(&self, params: &TemplateParams) -> Result<Ack, TransportError> {
        let body = SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: params,
        };

        debug!(endpoint = %self.endpoint, template = %self.template_id, "Sending contact email");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "Contact email accepted");
            Ok(Ack::now(status.as_u16()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(TransportError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
