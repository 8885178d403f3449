// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Fetch (render) the download page
// 3. Find the download link and build the record
// 4. Print it, optionally check the link
// 5. Exit with a proper code:
//      0 = record printed
//      1 = no download link found on the page
//      2 = error (page could not be loaded, bad URL, ...)
//      3 = record printed, but --check says the link is not reachable
//
// Rust concepts used:
// - async/await: The browser and HTTP client are async
// - Result<T, E>: For error handling (T = success type, E = error type)
// - downcast_ref: Looking inside an anyhow::Error for our own error types
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;     // src/cli.rs - command-line parsing
mod extract; // src/extract/ - finding the download link
mod fetch;   // src/fetch/ - loading the page (browser or plain HTTP)
mod logging; // src/logging.rs - tracing setup
mod output;  // src/output.rs - printing the record
mod record;  // src/record.rs - DownloadRecord + version back-fill
mod verify;  // src/verify.rs - optional HEAD check of the link

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info, warn};

use cli::Cli;
use extract::ExtractionError;
use fetch::{FetchError, RenderedPage};
use record::{normalize_version, DownloadRecord};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let exit_code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => report_failure(&cli, &e),
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = record printed
//   Ok(3) = record printed, link check failed
//   Err   = fetch or extraction failed (see report_failure)
async fn run(cli: &Cli) -> Result<i32> {
    let record = scrape(cli).await?;

    let check = if cli.check {
        Some(verify::check_download(&record.download_url, cli.timeout()).await)
    } else {
        None
    };

    output::print_record(&record, check.as_ref(), cli.json)?;

    match check {
        Some(check) if !check.is_ok() => {
            warn!("Download link check failed for {}", check.url);
            Ok(3)
        }
        _ => Ok(0),
    }
}

// Fetches the page and turns it into a finished record
//
// Nothing is printed here: on any error the caller never reaches the output step.
async fn scrape(cli: &Cli) -> Result<DownloadRecord> {
    let opts = cli.fetch_options();

    info!("Requesting {}", opts.url);
    let page = fetch::fetch_page(&opts).await?;

    let record = build_record(cli, &page)?;
    info!("Download record: {:?}", record);
    Ok(record)
}

// Extract -> resolve -> version, for an already loaded page
fn build_record(cli: &Cli, page: &RenderedPage) -> Result<DownloadRecord, ExtractionError> {
    let link = extract::find_download_link(&page.html).ok_or_else(|| ExtractionError::NoMatch {
        url: page.url.clone(),
    })?;
    debug!("Resolving {} ({:?} match) against {}", link.href, link.kind, page.url);

    let record = DownloadRecord::from_link(&cli.software_name, &cli.platform, &page.url, &link.href)?;
    Ok(normalize_version(record))
}

// Logs a terminal failure and picks the exit code
fn report_failure(cli: &Cli, err: &anyhow::Error) -> i32 {
    if let Some(ExtractionError::NoMatch { url }) = err.downcast_ref::<ExtractionError>() {
        error!(
            "Neither the primary nor the fallback pattern found a Linux .deb download URL on {}",
            url
        );
        warn!(
            "Possible causes:\n\
             1. The page's HTML structure or download link naming changed.\n\
             2. The cookie banner or --wait-ms needs adjusting (JavaScript had no time to render).\n\
             3. The links are no longer listed on this page.\n\
             Rerun with -v to see every candidate link."
        );
        return 1;
    }

    if let Some(fetch_err) = err.downcast_ref::<FetchError>() {
        error!("Request for {} failed: {}", cli.url, fetch_err);
    } else {
        error!("Error: {:#}", err);
    }
    2
}
