// src/extract/html.rs
// =============================================================================
// This module picks the download link out of the page's HTML.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Returns elements in document order, which is what "first match" means
//
// Rust concepts:
// - Iterators: find() stops at the first element that matches
// - Option<T>: "no link found" is None, not an error, at this level
// =============================================================================

use scraper::{Html, Selector};
use tracing::{debug, info};

use super::patterns::{LinkMatch, MatchKind};

// Collects every href on the page, in document order
//
// Example:
//   html = "<a href='/a'>A</a><a>no href</a><a href='/b'>B</a>"
//   result = ["/a", "/b"]
pub fn collect_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // Selector::parse only fails on invalid CSS; this one is a constant
    let selector = Selector::parse("a[href]").expect("a[href] is a valid selector");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

// Finds the download link in a page
//
// Tries the primary rule against every link first. Only if nothing matches
// does it try the fallback rule. Within a rule, the first link in document
// order wins; version numbers inside the links are not compared.
//
// Returns: Some(LinkMatch) with the raw href, or None if no rule matched
pub fn find_download_link(html: &str) -> Option<LinkMatch> {
    let hrefs = collect_hrefs(html);
    debug!("Page has {} links", hrefs.len());

    for kind in MatchKind::ORDER {
        let candidates: Vec<&String> = hrefs.iter().filter(|href| kind.matches(href)).collect();
        debug!("{:?} candidates: {:?}", kind, candidates);

        if let Some(first) = candidates.first() {
            info!("Selected download URL ({:?} match): {}", kind, first);
            return Some(LinkMatch {
                href: (*first).clone(),
                kind,
            });
        }
    }

    None
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why collect the hrefs first and then filter twice?
//    - The fallback pass must only run when the primary pass found nothing
//    - Parsing the HTML once and reusing the Vec<String> avoids parsing twice
//
// 2. What does filter_map do?
//    - It's filter + map in one step
//    - attr("href") returns Option<&str>; None values are dropped
//
// 3. Why (*first).clone()?
//    - candidates is a Vec<&String>, so first() gives us &&String
//    - Dereferencing once gives &String, and clone() makes an owned String
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SYSVINIT: &str = "https://dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb";
    const DEBIAN: &str = "https://dl.ui.com/unifi/7.5/unifi_debian_all.deb";
    const ARM: &str = "https://dl.ui.com/unifi/8.2.93/unifi_arm64.deb";
    const ARM_OLD: &str = "https://dl.ui.com/unifi/8.1.0/unifi_arm64.deb";

    #[test]
    fn test_collect_hrefs_in_order() {
        let html = r#"<a href="/a">A</a><a>no href</a><div><a href="/b">B</a></div>"#;
        assert_eq!(collect_hrefs(html), vec!["/a", "/b"]);
    }

    #[test]
    fn test_primary_wins_over_earlier_fallback() {
        let html = format!(
            r#"<a href="{ARM}">arm</a>
               <a href="{ARM_OLD}">arm old</a>
               <a href="{SYSVINIT}">deb</a>"#
        );
        let found = find_download_link(&html).unwrap();
        assert_eq!(found.href, SYSVINIT);
        assert_eq!(found.kind, MatchKind::Primary);
    }

    #[test]
    fn test_first_primary_in_document_order() {
        // 7.5 comes first, so it wins even though 8.2.93 is newer
        let html = format!(r#"<a href="{DEBIAN}">old</a><a href="{SYSVINIT}">new</a>"#);
        let found = find_download_link(&html).unwrap();
        assert_eq!(found.href, DEBIAN);
    }

    #[test]
    fn test_fallback_used_when_no_primary() {
        let html = format!(
            r#"<a href="https://ui.com/download">Downloads</a>
               <a href="{ARM}">arm</a>
               <a href="{ARM_OLD}">arm old</a>"#
        );
        let found = find_download_link(&html).unwrap();
        assert_eq!(found.href, ARM);
        assert_eq!(found.kind, MatchKind::Fallback);
    }

    #[test]
    fn test_no_match() {
        let html = r#"
            <a href="https://ui.com/download">Downloads</a>
            <a href="https://dl.ui.com/unifi/8.2.93/UniFi.unix.zip">zip</a>
            <a href="mailto:support@ui.com">Mail</a>
        "#;
        assert_eq!(find_download_link(html), None);
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(find_download_link(""), None);
    }

    #[test]
    fn test_relative_href_returned_raw() {
        let html = r#"<a href="//dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb">deb</a>"#;
        let found = find_download_link(html).unwrap();
        assert_eq!(found.href, "//dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb");
    }

    #[test]
    fn test_off_host_link_does_not_beat_vendor_link() {
        let html = format!(
            r#"<a href="https://evil.example/?u=dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb">x</a>
               <a href="{SYSVINIT}">deb</a>"#
        );
        let found = find_download_link(&html).unwrap();
        assert_eq!(found.href, SYSVINIT);
        assert_eq!(found.kind, MatchKind::Primary);
    }
}
