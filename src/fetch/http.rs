// src/fetch/http.rs
// =============================================================================
// Fetches a page with a single HTTP GET (no JavaScript).
//
// Used by --static. The real UniFi page won't have the links in its raw HTML,
// but a mirror or a saved copy of the rendered page will.
// =============================================================================

use reqwest::Client;
use tracing::info;

use super::{FetchError, FetchOptions, RenderedPage};

// Fetches a web page and returns its HTML content
//
// Errors:
//   FetchError::Timeout - the request took longer than opts.timeout
//   FetchError::Status  - the server answered with a non-2xx status
//   FetchError::Http    - anything else reqwest reports (DNS, TLS, ...)
pub async fn fetch_static(opts: &FetchOptions) -> Result<RenderedPage, FetchError> {
    let url = opts.url.to_string();

    let client = Client::builder()
        .timeout(opts.timeout)
        .danger_accept_invalid_certs(opts.ignore_https_errors)
        .build()
        .map_err(|source| FetchError::Http {
            url: url.clone(),
            source,
        })?;

    info!("Fetching {} (static)", url);

    let response = client
        .get(opts.url.clone())
        .send()
        .await
        .map_err(|e| request_error(&url, opts, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url,
            status: status.as_u16(),
        });
    }

    // After redirects this may differ from what we asked for
    let final_url = response.url().to_string();

    let html = response
        .text()
        .await
        .map_err(|e| request_error(&final_url, opts, e))?;

    info!("Fetched {} ({} bytes)", final_url, html.len());

    Ok(RenderedPage {
        url: final_url,
        html,
    })
}

fn request_error(url: &str, opts: &FetchOptions, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            secs: opts.timeout.as_secs(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
