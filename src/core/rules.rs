// PanicScope - core/rules.rs
//
// Built-in panic signature table.
//
// Each rule pairs one or more lowercase trigger substrings with the finding
// reported when any of them appears in the log. Rules are evaluated in table
// order and are cumulative: every matching rule contributes a finding.

use crate::core::model::{Finding, FindingKind};

/// A single signature rule.
#[derive(Debug, Clone, Copy)]
pub struct SignatureRule {
    /// Lowercase substrings; the rule fires if any one is present.
    pub triggers: &'static [&'static str],
    pub finding: Finding,
}

impl SignatureRule {
    /// `haystack_lower` must already be lowercased.
    pub fn matches(&self, haystack_lower: &str) -> bool {
        self.triggers.iter().any(|t| haystack_lower.contains(t))
    }
}

/// The built-in rule set, in evaluation order.
pub const BUILTIN_RULES: &[SignatureRule] = &[
    SignatureRule {
        triggers: &["userspace watchdog"],
        finding: Finding {
            kind: FindingKind::SoftwareFreeze,
            cause: "Userspace Watchdog: iOS or an app froze.",
            fix: "Likely software issue. Perform a full DFU restore.",
        },
    },
    SignatureRule {
        triggers: &["missingkeys.plist"],
        finding: Finding {
            kind: FindingKind::KeyMismatch,
            cause: "Missing Keys: hardware/software key mismatch.",
            fix: "Logic board replacement or reflash.",
        },
    },
    SignatureRule {
        triggers: &["aop panic"],
        finding: Finding {
            kind: FindingKind::AopFailure,
            cause: "AOP Panic: Always-On Processor failure.",
            fix: "Replace or repair the AOP IC (logic board).",
        },
    },
    SignatureRule {
        triggers: &["baseband"],
        finding: Finding {
            kind: FindingKind::ModemCrash,
            cause: "Baseband Crash: cellular modem issue.",
            fix: "Replace or reball the baseband IC.",
        },
    },
    SignatureRule {
        triggers: &["thermalmonitord"],
        finding: Finding {
            kind: FindingKind::Overheating,
            cause: "Thermal Issue: device overheated.",
            fix: "Replace the thermal sensor; check the PMU and battery.",
        },
    },
    SignatureRule {
        triggers: &["pmgr"],
        finding: Finding {
            kind: FindingKind::PowerManagement,
            cause: "Power Manager Issue: PMU failure.",
            fix: "Replace the PMU chip.",
        },
    },
    SignatureRule {
        triggers: &["memory", "page fault"],
        finding: Finding {
            kind: FindingKind::MemoryFault,
            cause: "Memory Fault: RAM/NAND corruption.",
            fix: "Replace the RAM/NAND chips.",
        },
    },
];

/// Reported when no rule in the set matches.
pub const FALLBACK_FINDING: Finding = Finding {
    kind: FindingKind::Unknown,
    cause: "Unknown panic cause.",
    fix: "Further manual board-level diagnosis required.",
};
