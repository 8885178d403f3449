// src/fetch/browser.rs
// =============================================================================
// Renders the download page in headless Chromium.
//
// The UniFi release page is a JavaScript app: the raw HTML from the server
// has no download links in it. So we:
// 1. Launch Chromium and open the page
// 2. Click the cookie banner's "Accept" button if there is one
// 3. Wait a fixed time for the scripts to fill in the release list
// 4. Read back the rendered HTML
//
// The page and the browser are closed on every path out of here, success or
// failure. Rust has no async Drop, so instead of a guard object we run the
// work in an inner function and always close afterwards.
//
// Rust concepts:
// - tokio::spawn: the CDP event handler must be polled in the background
// - tokio::time::timeout: wraps a future so it fails if it takes too long
// =============================================================================

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::{FetchError, FetchOptions, RenderedPage};

// How long a closed browser gets to exit before we kill it
const BROWSER_EXIT_GRACE: Duration = Duration::from_secs(5);

// Clicks the OneTrust "Accept All" button if the banner is showing.
// Evaluates to true when something was clicked.
const DISMISS_COOKIE_BANNER: &str = "(() => { \
    const btn = document.querySelector('button#onetrust-accept-btn-handler'); \
    if (btn) { btn.click(); return true; } \
    return false; \
})()";

pub async fn render_page(opts: &FetchOptions) -> Result<RenderedPage, FetchError> {
    let mut builder = BrowserConfig::builder().request_timeout(opts.timeout);
    if opts.ignore_https_errors {
        builder = builder.arg("--ignore-certificate-errors");
    }
    let config = builder.build().map_err(FetchError::Launch)?;

    info!("Launching headless browser for {}", opts.url);
    let (mut browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| FetchError::Launch(e.to_string()))?;

    // The handler stream carries every message from the browser.
    // If nobody polls it, every browser call hangs.
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("browser event error: {}", e);
            }
        }
    });

    let outcome = open_and_render(&browser, opts).await;

    shutdown(&mut browser).await;
    handler_task.abort();

    outcome
}

// Closes the browser and makes sure the child process is gone
//
// A failed close means the CDP connection is likely dead, so the process is
// killed right away. A successful close still only gets BROWSER_EXIT_GRACE
// to exit before it is killed.
async fn shutdown(browser: &mut Browser) {
    match browser.close().await {
        Ok(_) => {
            if exited_within(BROWSER_EXIT_GRACE, browser.wait()).await {
                debug!("Browser exited");
                return;
            }
            warn!(
                "Browser did not exit within {}s, killing it",
                BROWSER_EXIT_GRACE.as_secs()
            );
        }
        Err(e) => warn!("Error closing browser, killing it: {}", e),
    }

    if let Some(Err(e)) = browser.kill().await {
        warn!("Error killing browser process: {}", e);
    }
}

// true if `wait` finished within `grace`
async fn exited_within<F, T>(grace: Duration, wait: F) -> bool
where
    F: Future<Output = T>,
{
    timeout(grace, wait).await.is_ok()
}

// Opens a page, renders it, and closes the page again (even if rendering failed)
async fn open_and_render(browser: &Browser, opts: &FetchOptions) -> Result<RenderedPage, FetchError> {
    let url = opts.url.to_string();

    let page = timeout(opts.timeout, browser.new_page(url.as_str()))
        .await
        .map_err(|_| FetchError::Timeout {
            url: url.clone(),
            secs: opts.timeout.as_secs(),
        })?
        .map_err(|e| FetchError::Navigation {
            url: url.clone(),
            reason: e.to_string(),
        })?;

    let result = read_rendered(&page, opts).await;

    match page.close().await {
        Ok(()) => debug!("Closed page for {}", url),
        Err(e) => warn!("Error closing page for {}: {}", url, e),
    }

    result
}

async fn read_rendered(page: &Page, opts: &FetchOptions) -> Result<RenderedPage, FetchError> {
    let requested = opts.url.to_string();

    // Not fatal: the banner may simply not be there
    match page.evaluate(DISMISS_COOKIE_BANNER).await {
        Ok(result) => {
            let clicked: bool = result.into_value().unwrap_or(false);
            debug!(clicked, "cookie banner check done");
        }
        Err(e) => warn!("Cookie banner script failed on {}: {}", requested, e),
    }

    debug!("Waiting {}ms for JavaScript to render", opts.wait.as_millis());
    sleep(opts.wait).await;

    let final_url = match page.url().await {
        Ok(Some(url)) => url,
        _ => requested.clone(),
    };

    let html = page.content().await.map_err(|e| FetchError::Render {
        url: final_url.clone(),
        reason: e.to_string(),
    })?;

    info!("Rendered {} ({} bytes)", final_url, html.len());

    Ok(RenderedPage {
        url: final_url,
        html,
    })
}
