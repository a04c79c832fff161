//! Daily streak rules.
//!
//! The streak counts consecutive calendar days with at least one timed
//! claim. It is computed from the stored `(streak, last_streak_date)` pair
//! and the calendar day of the new claim; the 12-hour cooldown plays no
//! part in it.

use chrono::NaiveDate;

use crate::calendar::days_between;

/// How a claim moved the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// First qualifying claim ever; streak becomes 1.
    Started,
    /// Claim on the day after the last counted day; streak grows by 1.
    Extended,
    /// A day or more was missed; streak restarts at 1.
    Reset,
    /// Already counted today; streak unchanged.
    Unchanged,
}

impl StreakChange {
    /// Whether the streak counter was (re)written to a newly reached value.
    pub const fn advanced(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// The streak after a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    /// New streak value.
    pub streak: u32,
    /// New last-counted day.
    pub last_date: NaiveDate,
    /// What happened.
    pub change: StreakChange,
}

/// Compute the streak after a claim made on `today`.
///
/// The gap is the absolute day difference, so a clock that jumped
/// backwards is treated like one that jumped forwards by the same amount.
pub fn advance(streak: u32, last_date: Option<NaiveDate>, today: NaiveDate) -> StreakUpdate {
    let Some(last) = last_date else {
        return StreakUpdate {
            streak: 1,
            last_date: today,
            change: StreakChange::Started,
        };
    };

    match days_between(last, today) {
        0 => StreakUpdate {
            // A stored streak of 0 with a date is only possible in a
            // hand-edited blob; count today so the invariant holds.
            streak: streak.max(1),
            last_date: last,
            change: StreakChange::Unchanged,
        },
        1 => StreakUpdate {
            streak: streak.saturating_add(1),
            last_date: today,
            change: StreakChange::Extended,
        },
        _ => StreakUpdate {
            streak: 1,
            last_date: today,
            change: StreakChange::Reset,
        },
    }
}

/// Where the streak stands on a given day, before any claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakStatus {
    /// No claim has ever counted.
    None,
    /// Today already counted.
    Active,
    /// Yesterday was the last counted day; a claim today extends it.
    AtRisk,
    /// A day was missed; the next claim restarts at 1.
    Broken,
}

impl core::fmt::Display for StreakStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Active => "active",
            Self::AtRisk => "at risk",
            Self::Broken => "broken",
        };
        f.write_str(label)
    }
}

/// Classify the stored streak as seen on `today`.
pub fn status(last_date: Option<NaiveDate>, today: NaiveDate) -> StreakStatus {
    match last_date.map(|last| days_between(last, today)) {
        None => StreakStatus::None,
        Some(0) => StreakStatus::Active,
        Some(1) => StreakStatus::AtRisk,
        Some(_) => StreakStatus::Broken,
    }
}
