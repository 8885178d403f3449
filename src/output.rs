// src/output.rs
// =============================================================================
// Prints the DownloadRecord to stdout.
//
// Two formats:
// - text: a fixed-width block that's easy to read in a terminal
// - json: one pretty-printed object, for scripts
//
// The formatting functions return a String instead of printing directly,
// which keeps them testable.
// =============================================================================

use anyhow::Result;
use serde::Serialize;

use crate::record::DownloadRecord;
use crate::verify::{format_check, LinkCheck};

const RULE_WIDTH: usize = 60;

// What --json prints: the record's fields, plus "check" when --check ran
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    record: &'a DownloadRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    check: Option<&'a LinkCheck>,
}

pub fn print_record(record: &DownloadRecord, check: Option<&LinkCheck>, json: bool) -> Result<()> {
    if json {
        println!("{}", format_json(record, check)?);
    } else {
        print!("{}", format_block(record));
        if let Some(check) = check {
            println!("{}", format_check(check));
        }
    }
    Ok(())
}

pub fn format_json(record: &DownloadRecord, check: Option<&LinkCheck>) -> Result<String> {
    let report = JsonReport { record, check };
    Ok(serde_json::to_string_pretty(&report)?)
}

// Renders the text block, e.g.
//
//   ============================================================
//   Software:       UniFi Network Server
//   Platform:       Linux (Debian/Ubuntu)
//   Version:        8.2.93
//   Download URL:   https://dl.ui.com/unifi/8.2.93/unifi_sysvinit_all.deb
//   ============================================================
pub fn format_block(record: &DownloadRecord) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "{rule}\n\
         {:<16}{}\n\
         {:<16}{}\n\
         {:<16}{}\n\
         {:<16}{}\n\
         {rule}\n",
        "Software:",
        record.software_name,
        "Platform:",
        record.platform,
        "Version:",
        record.version,
        "Download URL:",
        record.download_url,
    )
}
