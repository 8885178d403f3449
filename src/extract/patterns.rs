// src/extract/patterns.rs
// =============================================================================
// The rules that decide whether an href is the download we want.
//
// UniFi packages live on dl.ui.com under /unifi/, for example:
//   https://dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb
//   https://dl.ui.com/unifi/9.0.114/unifi_network-application_9.0.114_all.deb
//
// Primary rule: one of the known Linux package names.
// Fallback rule: any .deb under dl.ui.com/.../unifi/.
//
// Both rules first require the href to point at dl.ui.com itself. After that
// the checks are plain, case-sensitive substring tests on the raw href.
// =============================================================================

use url::Url;

/// The only host we accept download links from
pub const DOWNLOAD_HOST: &str = "dl.ui.com";

/// Which rule a link was matched by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Primary,
    Fallback,
}

/// A link that passed one of the rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// The href exactly as it appears in the page (may be relative)
    pub href: String,
    pub kind: MatchKind,
}

impl MatchKind {
    /// The rules in the order they are tried
    pub const ORDER: [MatchKind; 2] = [MatchKind::Primary, MatchKind::Fallback];

    pub fn matches(self, href: &str) -> bool {
        match self {
            MatchKind::Primary => is_primary(href),
            MatchKind::Fallback => is_fallback(href),
        }
    }
}

// The host an href names, if it names one
//
// Protocol-relative hrefs (//dl.ui.com/...) count. Path-relative hrefs have
// no host of their own, so they return None.
fn href_host(href: &str) -> Option<String> {
    let parsed = if href.starts_with("//") {
        Url::parse(&format!("https:{}", href))
    } else {
        Url::parse(href)
    };
    parsed.ok()?.host_str().map(|host| host.to_string())
}

// "dl.ui.com/" inside a query string or on another host doesn't count
fn is_vendor_unifi_path(href: &str) -> bool {
    href_host(href).as_deref() == Some(DOWNLOAD_HOST)
        && href.contains("dl.ui.com/")
        && href.contains("/unifi/")
}

// Known Debian/Ubuntu package names, old and new
fn is_primary(href: &str) -> bool {
    is_vendor_unifi_path(href)
        && (href.contains("_sysvinit_all.deb")
            || href.contains("_debian_all.deb")
            || (href.contains("unifi_network-application_") && href.contains("_all.deb")))
}

fn is_fallback(href: &str) -> bool {
    is_vendor_unifi_path(href) && href.contains(".deb")
}
