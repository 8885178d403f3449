// src/verify.rs
// =============================================================================
// Optional --check: makes sure the download link actually answers.
//
// Key functionality:
// - Makes an HTTP HEAD request (lightweight, no body download)
// - Follows up to 5 redirects (dl.ui.com often redirects to a CDN)
// - Sorts the outcome into OK / redirect / broken / timeout / error
//
// Off by default. The check never changes the record; it only adds a line
// to the output and can turn the exit code into 3.
// =============================================================================

use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

// Represents the status of the download link after checking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinkStatus {
    /// Link is working (2xx)
    Ok,
    /// 3xx that reqwest could not follow (e.g. missing Location header)
    Redirect { target: String },
    /// 404 or 410
    Broken,
    /// Request timed out
    Timeout,
    /// Anything else (5xx, DNS, TLS, ...)
    Error,
}

// The result of checking the download link
#[derive(Debug, Clone, Serialize)]
pub struct LinkCheck {
    pub url: String,
    #[serde(flatten)]
    pub status: LinkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LinkCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, LinkStatus::Ok)
    }
}

// Checks that the download URL is reachable
//
// Parameters:
//   url: absolute download URL
//   timeout: upper bound for the whole request
pub async fn check_download(url: &str, timeout: Duration) -> LinkCheck {
    let client = match Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return LinkCheck {
                url: url.to_string(),
                status: LinkStatus::Error,
                message: Some(format!("could not build HTTP client: {}", e)),
            }
        }
    };

    match client.head(url).send().await {
        Ok(response) => {
            let code = response.status();
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok());
            LinkCheck {
                url: url.to_string(),
                status: status_for_code(code, location),
                message: Some(format!("HTTP {}", code.as_u16())),
            }
        }
        Err(e) => {
            let status = if e.is_timeout() {
                LinkStatus::Timeout
            } else {
                LinkStatus::Error
            };
            LinkCheck {
                url: url.to_string(),
                status,
                message: Some(e.to_string()),
            }
        }
    }
}

// Maps the final status code (after reqwest followed what it could) to a LinkStatus
fn status_for_code(code: StatusCode, location: Option<&str>) -> LinkStatus {
    match code {
        c if c.is_success() => LinkStatus::Ok,
        c if c == StatusCode::NOT_FOUND || c == StatusCode::GONE => LinkStatus::Broken,
        c if c.is_redirection() => LinkStatus::Redirect {
            target: location.unwrap_or("unknown").to_string(),
        },
        _ => LinkStatus::Error,
    }
}

// One line summary printed after the record
pub fn format_check(check: &LinkCheck) -> String {
    let label = match &check.status {
        LinkStatus::Ok => "OK".to_string(),
        LinkStatus::Redirect { target } => format!("REDIRECT -> {}", target),
        LinkStatus::Broken => "BROKEN".to_string(),
        LinkStatus::Timeout => "TIMEOUT".to_string(),
        LinkStatus::Error => "ERROR".to_string(),
    };

    match &check.message {
        Some(message) => format!("Link check:     {} ({})", label, message),
        None => format!("Link check:     {}", label),
    }
}
