// PanicScope - core/report.rs
//
// Plain-text rendering of an analysis for the clipboard, and the
// character-capped raw log excerpt shown in the log pane.

use crate::core::model::AnalysisReport;
use std::fmt::Write;

/// Heading placed above the findings list.
pub const FINDINGS_HEADING: &str = "=== Interpretation & Repair Suggestion ===";

/// Return at most `max_chars` characters from the start of `text`, and
/// whether anything was cut off.
pub fn display_excerpt(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

/// Render the findings of `report` as plain text.
///
/// Layout: the log name, a heading, then one cause/fix pair per finding
/// separated by blank lines.
pub fn format_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Latest log: {}", report.log_name);
    let _ = writeln!(
        out,
        "Modified: {}",
        report.log_modified.format("%Y-%m-%d %H:%M:%S")
    );
    out.push('\n');
    out.push_str(FINDINGS_HEADING);
    out.push_str("\n\n");
    for finding in &report.classification.findings {
        let _ = writeln!(out, "{}", finding.cause);
        let _ = writeln!(out, "Fix: {}", finding.fix);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::classify;
    use chrono::{Local, TimeZone};

    fn make_report(text: &str) -> AnalysisReport {
        AnalysisReport {
            log_name: "panic-full-A".to_string(),
            log_modified: Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            classification: classify(text),
        }
    }

    #[test]
    fn test_excerpt_under_cap_is_whole_text() {
        assert_eq!(display_excerpt("short", 5000), ("short", false));
    }

    #[test]
    fn test_excerpt_caps_at_char_count() {
        let text = "x".repeat(6000);
        let (shown, truncated) = display_excerpt(&text, 5000);
        assert_eq!(shown.chars().count(), 5000);
        assert!(truncated);
    }

    #[test]
    fn test_excerpt_exactly_at_cap_is_not_truncated() {
        let text = "y".repeat(10);
        assert_eq!(display_excerpt(&text, 10), (text.as_str(), false));
    }

    #[test]
    fn test_excerpt_multibyte_boundary() {
        let (shown, truncated) = display_excerpt("ααα", 2);
        assert_eq!(shown, "αα");
        assert!(truncated);
    }

    #[test]
    fn test_report_lists_findings_in_order() {
        let report = make_report("baseband reset, then pmgr fault");
        let text = format_report(&report);

        assert!(text.starts_with("Latest log: panic-full-A\n"));
        assert!(text.contains("Modified: 2024-03-01 09:30:00"));
        assert!(text.contains(FINDINGS_HEADING));
        let baseband = text.find("Baseband Crash").unwrap();
        let pmgr = text.find("Power Manager Issue").unwrap();
        assert!(baseband < pmgr);
    }

    #[test]
    fn test_report_for_unknown_cause() {
        let text = format_report(&make_report("nothing to see"));
        assert!(text.contains("Unknown panic cause."));
        assert!(text.contains("Fix: Further manual board-level diagnosis required."));
    }
}
