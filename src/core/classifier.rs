// PanicScope - core/classifier.rs
//
// Signature classification of panic log text.
// Core layer: operates on in-memory text only, never touches the filesystem.
//
// Matching is case-insensitive substring containment. All rules are checked
// independently, so one log can yield several findings. Whether a single
// "first match wins" answer would serve technicians better is an open
// product question; cumulative reporting is the current contract.

use crate::core::model::{Classification, Finding};
use crate::core::rules::{SignatureRule, BUILTIN_RULES, FALLBACK_FINDING};

/// Classify `text` against the built-in rule set.
pub fn classify(text: &str) -> Classification {
    classify_with(BUILTIN_RULES, text)
}

/// Classify `text` against an arbitrary ordered rule set.
///
/// Always returns at least one finding: the fallback when nothing matches.
pub fn classify_with(rules: &[SignatureRule], text: &str) -> Classification {
    Classification {
        raw_text: text.to_string(),
        findings: match_findings(rules, text),
    }
}

/// Evaluate `rules` in order against `text` and collect the findings.
pub fn match_findings(rules: &[SignatureRule], text: &str) -> Vec<Finding> {
    let lowered = text.to_lowercase();

    let mut findings: Vec<Finding> = rules
        .iter()
        .filter(|rule| rule.matches(&lowered))
        .map(|rule| rule.finding)
        .collect();

    if findings.is_empty() {
        findings.push(FALLBACK_FINDING);
    }

    tracing::debug!(
        rules = rules.len(),
        matched = findings.len(),
        fallback = findings[0] == FALLBACK_FINDING,
        "Classified panic log"
    );

    findings
}

/// Decode raw log bytes as UTF-8, dropping any invalid byte sequences.
///
/// Never fails: a log with a corrupt region still classifies on whatever
/// text survives around it.
pub fn decode_permissive(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0usize;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        dropped += chunk.invalid().len();
    }
    if dropped > 0 {
        tracing::debug!(dropped_bytes = dropped, "Dropped invalid UTF-8 bytes from log");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::FindingKind;

    fn kinds(text: &str) -> Vec<FindingKind> {
        classify(text).findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_empty_text_yields_fallback() {
        assert_eq!(kinds(""), vec![FindingKind::Unknown]);
    }

    #[test]
    fn test_unrelated_text_yields_only_fallback() {
        let result = classify("panicString: something unrelated happened\nCPU 0 halted");
        assert_eq!(result.findings, vec![FALLBACK_FINDING]);
    }

    #[test]
    fn test_mixed_case_memory_matches() {
        assert!(kinds("Kernel reported Memory pressure").contains(&FindingKind::MemoryFault));
        assert!(kinds("PAGE FAULT in kernel").contains(&FindingKind::MemoryFault));
    }

    #[test]
    fn test_baseband_and_pmgr_in_rule_order() {
        // pmgr appears first in the text, but baseband comes first in the table.
        let result = kinds("pmgr timeout after BaseBand reset");
        assert_eq!(
            result,
            vec![FindingKind::ModemCrash, FindingKind::PowerManagement]
        );
    }

    #[test]
    fn test_memory_rule_reported_once_when_both_triggers_present() {
        let result = kinds("memory corruption caused a page fault");
        assert_eq!(result, vec![FindingKind::MemoryFault]);
    }

    #[test]
    fn test_all_rules_can_fire_together() {
        let text = "userspace watchdog timeout; missingkeys.plist; AOP PANIC; \
                    baseband; thermalmonitord; pmgr; page fault";
        let result = kinds(text);
        assert_eq!(result.len(), BUILTIN_RULES.len());
        assert!(!result.contains(&FindingKind::Unknown));
    }

    #[test]
    fn test_raw_text_is_preserved_verbatim() {
        let text = "AOP Panic detected at boot";
        let result = classify(text);
        assert_eq!(result.raw_text, text);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].kind, FindingKind::AopFailure);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let text = "thermalmonitord exceeded limits";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn test_custom_rule_set() {
        let rules = [SignatureRule {
            triggers: &["nand"],
            finding: Finding {
                kind: FindingKind::MemoryFault,
                cause: "NAND",
                fix: "Replace NAND",
            },
        }];
        let result = classify_with(&rules, "NAND controller timeout");
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].cause, "NAND");

        let none = classify_with(&[], "anything");
        assert_eq!(none.findings, vec![FALLBACK_FINDING]);
    }

    #[test]
    fn test_decode_drops_invalid_bytes() {
        let bytes = b"AOP \xff\xfePanic\x80 here";
        assert_eq!(decode_permissive(bytes), "AOP Panic here");
    }

    #[test]
    fn test_decode_keeps_valid_multibyte() {
        let text = "température élevée";
        assert_eq!(decode_permissive(text.as_bytes()), text);
    }
}
