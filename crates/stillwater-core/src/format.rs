//! Human-readable durations.

/// `MM:SS`, minutes not capped at 59.
pub fn clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `5m` for a minute or more, `45s` below that.
pub fn short(secs: u32) -> String {
    let mins = secs / 60;
    if mins == 0 {
        format!("{secs}s")
    } else {
        format!("{mins}m")
    }
}
