// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gate relay
//!
//! Reads one contact form as JSON on stdin, runs it through the
//! submission gate and, if it passes, delivers it via EmailJS.
//! A JSON report is written to stdout.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honoured):
//!
//! - `EMAILJS_ENDPOINT`: REST endpoint (default: EmailJS v1.0 send)
//! - `EMAILJS_SERVICE_ID`: service identifier (default: service_portfolio)
//! - `EMAILJS_TEMPLATE_ID`: template identifier (default: template_contact)
//! - `EMAILJS_PUBLIC_KEY`: public key (required)
//! - `CONTACT_RECIPIENT`: address that receives messages (required)
//! - `COOLDOWN_SECS`: cooldown after a successful send (default: 60)
//! - `USER_AGENT`: visitor's user agent, picks the fallback link shown
//!   when delivery fails (mailto on mobile, Gmail compose otherwise)

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_gate::{
    config::Config,
    fallback::direct_email_link,
    session::{FormInput, FormSession, SubmissionState, SubmitOutcome},
    transport::EmailJsSender,
};

/// Report printed after the submission is processed.
#[derive(Debug, Serialize)]
struct Report {
    outcome: &'static str,
    state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    errors: BTreeMap<&'static str, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_secs: Option<u64>,
    /// Direct email link offered when delivery failed
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_link: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = load_config();
    config.validate()?;
    info!(
        endpoint = %config.delivery.endpoint,
        template = %config.delivery.template_id,
        cooldown_secs = config.cooldown.cooldown_secs,
        "Starting contact gate relay"
    );

    let mut raw = String::new();
    tokio::io::stdin().read_to_string(&mut raw).await?;
    let input: FormInput = serde_json::from_str(&raw)?;

    let sender = Arc::new(EmailJsSender::new(&config.delivery)?);
    let mut session = FormSession::new(&config, sender);
    session.fill(input);

    let outcome = session.submit().await;
    let user_agent = std::env::var("USER_AGENT").unwrap_or_default();
    let report = build_report(
        &outcome,
        session.status(),
        &user_agent,
        &config.delivery.recipient,
    )?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Project a submit outcome into the printed report.
fn build_report(
    outcome: &SubmitOutcome,
    state: SubmissionState,
    user_agent: &str,
    recipient: &str,
) -> anyhow::Result<Report> {
    let fallback_link = match outcome {
        SubmitOutcome::Failed => Some(direct_email_link(user_agent, recipient)?.href.to_string()),
        _ => None,
    };

    Ok(Report {
        outcome: outcome.kind(),
        state: state.to_string(),
        message: outcome.message(),
        errors: match outcome {
            SubmitOutcome::Invalid(errors) => errors.messages(),
            _ => BTreeMap::new(),
        },
        retry_after_secs: match outcome {
            SubmitOutcome::CoolingDown { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        },
        fallback_link,
    })
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let mut config = Config::default();
    let delivery = &mut config.delivery;

    if let Ok(v) = std::env::var("EMAILJS_ENDPOINT") {
        delivery.endpoint = v;
    }
    if let Ok(v) = std::env::var("EMAILJS_SERVICE_ID") {
        delivery.service_id = v;
    }
    if let Ok(v) = std::env::var("EMAILJS_TEMPLATE_ID") {
        delivery.template_id = v;
    }
    delivery.public_key = std::env::var("EMAILJS_PUBLIC_KEY").unwrap_or_default();
    delivery.recipient = std::env::var("CONTACT_RECIPIENT").unwrap_or_default();

    config.cooldown.cooldown_secs = std::env::var("COOLDOWN_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(config.cooldown.cooldown_secs);

    config
}
