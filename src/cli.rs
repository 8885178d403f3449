// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is only one thing this tool does (find the UniFi download link), so
// unlike a multi-command CLI we don't need subcommands. Every flag has a
// default, which means running `unifi-fetch` with no arguments just works.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// - Value parsers: clap can parse straight into types like Url
// =============================================================================

use clap::Parser;
use std::time::Duration;
use url::Url;

use crate::fetch::{Backend, FetchOptions};

/// The UniFi Network Server release listing page
pub const DEFAULT_URL: &str = "https://ui.com/download/releases/network-server";

/// Labels printed on the record
pub const DEFAULT_SOFTWARE_NAME: &str = "UniFi Network Server";
pub const DEFAULT_PLATFORM: &str = "Linux (Debian/Ubuntu)";

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "unifi-fetch",
    version,
    about = "Find the current UniFi Network Server download link for Debian/Ubuntu",
    long_about = "unifi-fetch renders the UniFi release page in a headless browser, picks out \
                  the Linux .deb download link and prints it together with its version."
)]
pub struct Cli {
    /// Page to scrape for the download link
    ///
    /// Parsed with Url::parse, so an invalid URL is rejected before we start
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: Url,

    /// How long to wait (milliseconds) after loading for JavaScript to render
    #[arg(long, default_value_t = 10_000)]
    pub wait_ms: u64,

    /// Timeout (seconds) for navigation and HTTP requests
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Skip the browser and fetch the raw HTML with a plain HTTP GET
    ///
    /// Faster, but the real download page needs JavaScript, so this is mostly
    /// useful for mirrors or saved copies of the page
    #[arg(long = "static")]
    pub static_fetch: bool,

    /// Do not ignore TLS certificate errors
    #[arg(long)]
    pub strict_tls: bool,

    /// Output the record as JSON instead of a text block
    #[arg(long)]
    pub json: bool,

    /// Send a HEAD request to the download link to make sure it's alive
    #[arg(long)]
    pub check: bool,

    /// Software name printed on the record
    #[arg(long, default_value = DEFAULT_SOFTWARE_NAME)]
    pub software_name: String,

    /// Platform printed on the record
    #[arg(long, default_value = DEFAULT_PLATFORM)]
    pub platform: String,

    /// Show debug logs (same as RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Turns the parsed flags into the options the fetch stage needs
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            url: self.url.clone(),
            backend: if self.static_fetch {
                Backend::Static
            } else {
                Backend::Browser
            },
            wait: Duration::from_millis(self.wait_ms),
            timeout: Duration::from_secs(self.timeout_secs),
            ignore_https_errors: !self.strict_tls,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
