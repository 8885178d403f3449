// src/record.rs
// =============================================================================
// The DownloadRecord we print, and the steps that fill it in.
//
// Steps:
// 1. from_link: turn the raw href into an absolute URL (relative hrefs are
//    resolved against the page URL), version starts as "Unknown"
// 2. normalize_version: pull a version like 8.2.93 out of the URL path
//
// Rust concepts:
// - LazyLock: compile the regex once, the first time it's used
// - serde::Serialize: lets us print the record as JSON
// =============================================================================

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use url::Url;

use crate::extract::{ExtractionError, DOWNLOAD_HOST};

/// Placeholder until a version is found
pub const UNKNOWN_VERSION: &str = "Unknown";

// A path segment of dot-separated numbers: /8.2.93/ or /7.5/
// Empty parts (/1..2/, /.5/, /8./) don't count.
static VERSION_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([0-9]+(?:\.[0-9]+)*)/").expect("version regex is valid")
});

/// One download, ready to print
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRecord {
    pub software_name: String,
    pub platform: String,
    pub version: String,
    pub download_url: String,
}

impl DownloadRecord {
    // Builds a record from the link the extractor picked
    //
    // Parameters:
    //   software_name, platform: labels for the record
    //   base_url: the page the link was found on
    //   href: the raw href (absolute, relative, or protocol-relative)
    //
    // Examples:
    //   base = "https://ui.com/download/releases/network-server"
    //   href = "//dl.ui.com/unifi/7.5/unifi_debian_all.deb"
    //     -> "https://dl.ui.com/unifi/7.5/unifi_debian_all.deb"
    //
    // The resolved URL must be on dl.ui.com, otherwise InvalidUrl.
    pub fn from_link(
        software_name: &str,
        platform: &str,
        base_url: &str,
        href: &str,
    ) -> Result<Self, ExtractionError> {
        let invalid = |reason: String| ExtractionError::InvalidUrl {
            href: href.to_string(),
            base: base_url.to_string(),
            reason,
        };

        let base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        // join() keeps an absolute href as is
        let absolute = base.join(href).map_err(|e| invalid(e.to_string()))?;

        if absolute.host_str() != Some(DOWNLOAD_HOST) {
            return Err(invalid(format!("{} is not on {}", absolute, DOWNLOAD_HOST)));
        }

        Ok(Self {
            software_name: software_name.to_string(),
            platform: platform.to_string(),
            version: UNKNOWN_VERSION.to_string(),
            download_url: absolute.to_string(),
        })
    }

    pub fn has_version(&self) -> bool {
        !self.version.is_empty() && self.version != UNKNOWN_VERSION
    }
}

// Fills in the version from the download URL
//
// Only touches records whose version is still "Unknown" (or empty), so
// running it twice changes nothing. If the URL has no version segment the
// record keeps "Unknown".
pub fn normalize_version(mut record: DownloadRecord) -> DownloadRecord {
    if record.has_version() {
        return record;
    }

    record.version = version_from_url(&record.download_url)
        .unwrap_or(UNKNOWN_VERSION)
        .to_string();
    record
}

// Returns the first /<number>.<number>.../ segment of a URL
pub fn version_from_url(url: &str) -> Option<&str> {
    VERSION_SEGMENT_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://ui.com/download/releases/network-server";

    fn record(url: &str) -> DownloadRecord {
        DownloadRecord::from_link("UniFi Network Server", "Linux (Debian/Ubuntu)", PAGE, url)
            .unwrap()
    }

    #[test]
    fn test_version_three_parts() {
        let r = normalize_version(record("https://dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb"));
        assert_eq!(r.version, "8.2.93");
    }

    #[test]
    fn test_version_two_parts() {
        let r = normalize_version(record("https://dl.ui.com/unifi/7.5/unifi_debian_all.deb"));
        assert_eq!(r.version, "7.5");
    }

    #[test]
    fn test_no_version_segment_stays_unknown() {
        let r = normalize_version(record("https://dl.ui.com/unifi/latest/unifi_sysvinit_all.deb"));
        assert_eq!(r.version, UNKNOWN_VERSION);
    }

    #[test]
    fn test_version_in_filename_only_is_ignored() {
        // Not delimited by slashes on both sides
        let r = normalize_version(record(
            "https://dl.ui.com/unifi/unifi_network-application_9.0.114_all.deb",
        ));
        assert_eq!(r.version, UNKNOWN_VERSION);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_version(record("https://dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb"));
        let twice = normalize_version(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_existing_version_is_kept() {
        let mut r = record("https://dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb");
        r.version = "9.9.9".to_string();
        assert_eq!(normalize_version(r).version, "9.9.9");
    }

    #[test]
    fn test_empty_version_is_filled() {
        let mut r = record("https://dl.ui.com/unifi/7.5/unifi_debian_all.deb");
        r.version = String::new();
        assert_eq!(normalize_version(r).version, "7.5");
    }

    #[test]
    fn test_resolves_relative_href() {
        // A mirror listing page served from the download host itself
        let r = DownloadRecord::from_link(
            "UniFi Network Server",
            "Linux (Debian/Ubuntu)",
            "https://dl.ui.com/unifi/index.html",
            "8.2.93/unifi_sysvinit_all.deb",
        )
        .unwrap();
        assert_eq!(r.download_url, "https://dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb");
        assert_eq!(r.version, UNKNOWN_VERSION);
    }

    #[test]
    fn test_relative_href_off_download_host() {
        let err = DownloadRecord::from_link("a", "b", PAGE, "/unifi/8.2.93/unifi_sysvinit_all.deb")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUrl { .. }));
    }

    #[test]
    fn test_version_segment_needs_digits_between_dots() {
        for url in [
            "https://dl.ui.com/unifi/1..2./unifi_sysvinit_all.deb",
            "https://dl.ui.com/unifi/.../unifi_sysvinit_all.deb",
            "https://dl.ui.com/unifi/.5/unifi_sysvinit_all.deb",
        ] {
            assert_eq!(normalize_version(record(url)).version, UNKNOWN_VERSION, "{}", url);
        }
    }

    #[test]
    fn test_version_skips_bad_segment_for_later_good_one() {
        let r = normalize_version(record("https://dl.ui.com/unifi/1..2./8.2.93/unifi_sysvinit_all.deb"));
        assert_eq!(r.version, "8.2.93");
    }

    #[test]
    fn test_resolves_protocol_relative_href() {
        let r = record("//dl.ui.com/unifi/7.5/unifi_debian_all.deb");
        assert_eq!(r.download_url, "https://dl.ui.com/unifi/7.5/unifi_debian_all.deb");
    }

    #[test]
    fn test_absolute_href_kept() {
        let url = "https://dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb";
        assert_eq!(record(url).download_url, url);
    }

    #[test]
    fn test_rejects_link_off_download_host() {
        let err = DownloadRecord::from_link(
            "a",
            "b",
            PAGE,
            "https://evil.example/?u=dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb",
        )
        .unwrap_err();
        match err {
            ExtractionError::InvalidUrl { reason, .. } => assert!(reason.contains("evil.example")),
            other => panic!("expected InvalidUrl, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let err = DownloadRecord::from_link("a", "b", "not a url", "/x.deb").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUrl { .. }));
    }
}
