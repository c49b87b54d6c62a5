//! Daily practice streaks.
//!
//! A streak is a run of consecutive calendar days (UTC) with at least one
//! completed session. The current streak only counts if its newest day is
//! today or yesterday, so a streak survives until the end of the next day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

/// Compute streaks over completion dates in any order, duplicates allowed.
pub fn streaks<I>(dates: I, today: NaiveDate) -> Streaks
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = dates.into_iter().collect();

    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for &day in &days {
        run = match prev {
            Some(p) if (day - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    // `run` is now the run ending at the newest day.
    let current = match prev {
        Some(newest) if matches!((today - newest).num_days(), 0 | 1) => run,
        _ => 0,
    };

    Streaks { current, longest }
}
