use chrono::{Datelike, NaiveDate, Weekday};

/// Queue configuration for one time slot: the first queue number handed out
/// and how many trucks the slot holds (`None` = unlimited).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotConfig {
    pub start: i32,
    pub limit: Option<i32>,
}

/// The five canonical gate slots. Queue number ranges are disjoint so a
/// booking code identifies both the day and the slot it was issued for.
const SLOT_QUEUE_CONFIG: [(&str, SlotConfig); 5] = [
    ("08:00-09:00", SlotConfig { start: 1, limit: Some(4) }),
    ("09:00-10:00", SlotConfig { start: 5, limit: Some(4) }),
    ("10:00-11:00", SlotConfig { start: 9, limit: Some(4) }),
    ("11:00-12:00", SlotConfig { start: 13, limit: Some(4) }),
    ("13:00-14:00", SlotConfig { start: 17, limit: None }),
];

/// Slot that becomes unlimited on Saturdays (extra weekend intake).
const SATURDAY_UNLIMITED_SLOT: &str = "10:00-11:00";

/// Resolve the queue configuration for a slot on a given calendar date.
///
/// Total function: a slot label outside the canonical table falls back to
/// `{start: 1, limit: unlimited}`. Takes the date explicitly so the weekday
/// branch is testable without touching the system clock.
pub fn resolve(slot: &str, date: NaiveDate) -> SlotConfig {
    let base = SLOT_QUEUE_CONFIG
        .iter()
        .find(|(label, _)| *label == slot)
        .map(|(_, config)| *config)
        .unwrap_or(SlotConfig { start: 1, limit: None });

    if date.weekday() == Weekday::Sat && slot == SATURDAY_UNLIMITED_SLOT {
        return SlotConfig { start: base.start, limit: None };
    }

    base
}

/// Labels of the canonical slots, in gate order. Used by the daily stats
/// breakdown.
pub fn canonical_slots() -> impl Iterator<Item = &'static str> {
    SLOT_QUEUE_CONFIG.iter().map(|(label, _)| *label)
}
