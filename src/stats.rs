use chrono::NaiveDate;

use crate::models::Entry;

/// Aggregates shown in the stats cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total_entries: usize,
    pub current_streak: usize,
    pub good_days: usize,
}

impl Stats {
    pub fn compute(entries: &[Entry], today: NaiveDate) -> Self {
        Self {
            total_entries: total_entries(entries),
            current_streak: current_streak(entries, today),
            good_days: good_days(entries),
        }
    }
}

pub fn total_entries(entries: &[Entry]) -> usize {
    entries.len()
}

/// Entries whose mood was great or good
pub fn good_days(entries: &[Entry]) -> usize {
    entries.iter().filter(|e| e.mood.is_good()).count()
}

/// Length of the unbroken daily run starting at the newest entry.
///
/// `entries` must be newest first. The entry at position `i` has to be dated
/// exactly `i` days before `today`, so a run that ends yesterday counts as 0.
pub fn current_streak(entries: &[Entry], today: NaiveDate) -> usize {
    let mut streak = 0;
    for entry in entries {
        let days_ago = today.signed_duration_since(entry.date).num_days();
        if days_ago == streak as i64 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}
