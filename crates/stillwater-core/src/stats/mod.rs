//! Statistics over completed sessions.

mod streak;

pub use streak::{streaks, Streaks};

use serde::{Deserialize, Serialize};

/// Aggregate numbers shown on the history screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_sessions: u64,
    /// Sum of whole minutes per session.
    pub total_minutes: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
}
