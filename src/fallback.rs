// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Direct email link shown next to the form.
//!
//! Mobile browsers get a `mailto:` link; desktop browsers get a Gmail
//! compose window in a new tab.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static MOBILE_AGENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Mobi|Android|iPhone").expect("invalid user agent pattern"));

const GMAIL_COMPOSE: &str = "https://mail.google.com/mail/";

/// A link that opens a new email to the site owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectEmailLink {
    pub href: Url,
    pub opens_new_tab: bool,
}

pub fn is_mobile_agent(user_agent: &str) -> bool {
    MOBILE_AGENT.is_match(user_agent)
}

/// Build the direct email link for a visitor's user agent.
pub fn direct_email_link(user_agent: &str, address: &str) -> Result<DirectEmailLink, url::ParseError> {
    if is_mobile_agent(user_agent) {
        let href = Url::parse(&format!("mailto:{address}"))?;
        return Ok(DirectEmailLink {
            href,
            opens_new_tab: false,
        });
    }

    let mut href = Url::parse(GMAIL_COMPOSE)?;
    href.query_pairs_mut()
        .append_pair("view", "cm")
        .append_pair("fs", "1")
        .append_pair("to", address);

    Ok(DirectEmailLink {
        href,
        opens_new_tab: true,
    })
}
