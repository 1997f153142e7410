// PanicScope - ui/theme.rs
//
// Colour scheme, finding colour/icon mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::app::state::NoticeLevel;
use crate::core::model::FindingKind;
use egui::Color32;

/// Accent colour for a finding's cause line.
pub fn finding_colour(kind: FindingKind) -> Color32 {
    match kind {
        FindingKind::SoftwareFreeze => Color32::from_rgb(96, 165, 250), // Blue 400
        FindingKind::KeyMismatch => Color32::from_rgb(250, 204, 21),    // Yellow 400
        FindingKind::AopFailure => Color32::from_rgb(251, 146, 60),     // Orange 400
        FindingKind::ModemCrash => Color32::from_rgb(167, 139, 250),    // Violet 400
        FindingKind::Overheating => Color32::from_rgb(248, 113, 113),   // Red 400
        FindingKind::PowerManagement => Color32::from_rgb(52, 211, 153), // Emerald 400
        FindingKind::MemoryFault => Color32::from_rgb(244, 114, 182),   // Pink 400
        FindingKind::Unknown => Color32::from_rgb(156, 163, 175),       // Gray 400
    }
}

/// Emoji shown before a finding's cause (egui ships an emoji font).
pub fn finding_icon(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::SoftwareFreeze => "\u{1f4f1}",  // mobile phone
        FindingKind::KeyMismatch => "\u{1f511}",     // key
        FindingKind::AopFailure => "\u{26a1}",       // high voltage
        FindingKind::ModemCrash => "\u{1f4e1}",      // satellite antenna
        FindingKind::Overheating => "\u{1f525}",     // fire
        FindingKind::PowerManagement => "\u{1f50b}", // battery
        FindingKind::MemoryFault => "\u{1f4be}",     // floppy disk
        FindingKind::Unknown => "\u{2754}",          // white question mark
    }
}

/// Background fill for the notice banner.
pub fn notice_bg_colour(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => Color32::from_rgba_premultiplied(59, 130, 246, 30),
        NoticeLevel::Error => Color32::from_rgba_premultiplied(220, 38, 38, 35),
    }
}

/// Title colour for the notice banner.
pub fn notice_text_colour(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => Color32::from_rgb(147, 197, 253), // Blue 300
        NoticeLevel::Error => Color32::from_rgb(248, 113, 113), // Red 400
    }
}

/// Primary action button fill (the Analyze button).
pub const ACCENT: Color32 = Color32::from_rgb(46, 134, 222);

/// Layout constants.
pub const FINDINGS_PANEL_HEIGHT: f32 = 260.0;
pub const STATUS_BAR_HEIGHT: f32 = 28.0;
