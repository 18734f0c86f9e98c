//! Links handed to the app from outside (command line, shared text).
//!
//! The current link is an explicit value the caller owns and passes back in;
//! there is no process-wide "last shared URL".

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;
use url::Url;

/// How content arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareIntent {
    /// A URL to open directly.
    View(String),
    /// Free text that may contain a URL somewhere inside it.
    Send(String),
}

impl ShareIntent {
    /// Classify a command-line argument: a bare http(s) URL is a view,
    /// anything else is shared text.
    pub fn from_argument(arg: &str) -> Self {
        let trimmed = arg.trim();
        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                Self::View(trimmed.to_string())
            }
            _ => Self::Send(arg.to_string()),
        }
    }
}

/// A link accepted for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedLink {
    url: String,
}

impl SharedLink {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolve an intent against the link currently in use.
    ///
    /// Returns the new link, or `None` when there is nothing new: no URL in
    /// shared text, or the same URL shared again.
    pub fn resolve(intent: &ShareIntent, current: Option<&SharedLink>) -> Option<SharedLink> {
        let url = match intent {
            ShareIntent::View(url) => url.trim().to_string(),
            ShareIntent::Send(text) => match_url_from_shared_text(text)?,
        };

        if url.is_empty() {
            return None;
        }

        if matches!(intent, ShareIntent::Send(_)) && current.is_some_and(|c| c.url == url) {
            debug!(url = %url, "Ignoring duplicate shared link");
            return None;
        }

        Some(SharedLink { url })
    }
}

fn url_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://[^\s<>()]+").ok())
        .as_ref()
}

/// The first http(s) URL inside `text`, without trailing punctuation.
pub fn match_url_from_shared_text(text: &str) -> Option<String> {
    let found = url_regex()?.find(text)?;
    let url = found
        .as_str()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '"' | '\''));
    Url::parse(url).ok().map(|_| url.to_string())
}
