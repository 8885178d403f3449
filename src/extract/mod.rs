// src/extract/mod.rs
// =============================================================================
// This module finds the download link in the rendered page.
//
// Submodules:
// - patterns: The rules an href has to satisfy (primary and fallback)
// - html: Walks the <a href> elements and applies the rules in order
//
// This is the only place with any "business logic": try the strict rule,
// then the loose one, take the first link that matches.
// =============================================================================

mod html;
mod patterns;

use thiserror::Error;

pub use html::find_download_link;
pub use patterns::DOWNLOAD_HOST;

/// Why the page didn't give us a usable download link
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no Linux .deb download link found on {url}")]
    NoMatch { url: String },

    #[error("download link {href:?} could not be resolved against {base}: {reason}")]
    InvalidUrl {
        href: String,
        base: String,
        reason: String,
    },
}
