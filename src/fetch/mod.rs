// src/fetch/mod.rs
// =============================================================================
// This module gets the HTML of the download page.
//
// Submodules:
// - browser: Renders the page in headless Chromium (runs the page's JavaScript)
// - http: Plain HTTP GET, no JavaScript (the --static mode)
//
// Both return the same RenderedPage, so the rest of the program doesn't care
// which one was used.
//
// Rust concepts:
// - Enums with data: FetchError carries the URL and cause of each failure
// - thiserror: derives the Display and Error impls for our error enum
// =============================================================================

mod browser;
mod http;

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Which way to load the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Headless Chromium, waits for JavaScript to run
    Browser,
    /// A single GET request, returns the raw server HTML
    Static,
}

/// Everything the fetch stage needs to know
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub url: Url,
    pub backend: Backend,
    /// Fixed wait after the page loads, gives client-side scripts time to run
    pub wait: Duration,
    /// Upper bound on navigation (browser) or the whole request (static)
    pub timeout: Duration,
    pub ignore_https_errors: bool,
}

/// The page after loading
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Final URL after navigation/redirects. Relative links resolve against this.
    pub url: String,
    pub html: String,
}

/// Why we couldn't get the page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {secs}s loading {url}")]
    Timeout { url: String, secs: u64 },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not read rendered page {url}: {reason}")]
    Render { url: String, reason: String },
}

// Loads the page with whichever backend was asked for
//
// There are no retries: one failure ends the run.
pub async fn fetch_page(opts: &FetchOptions) -> Result<RenderedPage, FetchError> {
    match opts.backend {
        Backend::Browser => browser::render_page(opts).await,
        Backend::Static => http::fetch_static(opts).await,
    }
}
