//! Phase sequencing over a [`Pattern`].
//!
//! Pure lookups: nothing here holds state, the engine passes the index in.

use super::pattern::{Pattern, PhaseSpec};

/// Result of stepping past the end of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseAdvance {
    pub next_index: usize,
    /// True when the sequence went back to the first phase.
    pub wrapped: bool,
}

/// Phase at `index`, or `None` for a plain countdown.
pub fn current_phase(pattern: &Pattern, index: usize) -> Option<&PhaseSpec> {
    pattern.phases.get(index)
}

/// Index of the phase following `index`, wrapping at the end.
///
/// Returns `None` when the pattern has no phases.
pub fn advance_phase(pattern: &Pattern, index: usize) -> Option<PhaseAdvance> {
    let len = pattern.phases.len();
    if len == 0 {
        return None;
    }
    let next_index = (index + 1) % len;
    Some(PhaseAdvance {
        next_index,
        wrapped: next_index == 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{PhaseKind, PhaseSpec};

    fn three_phase() -> Pattern {
        Pattern::cycled(
            vec![
                PhaseSpec::new(PhaseKind::Inhale, 4, "Breathe in"),
                PhaseSpec::new(PhaseKind::HoldAfterInhale, 7, "Hold"),
                PhaseSpec::new(PhaseKind::Exhale, 8, "Breathe out"),
            ],
            8,
        )
    }

    #[test]
    fn countdown_has_no_current_phase() {
        assert!(current_phase(&Pattern::countdown(60), 0).is_none());
        assert!(advance_phase(&Pattern::countdown(60), 0).is_none());
    }

    #[test]
    fn advance_moves_forward_without_wrap() {
        let p = three_phase();
        assert_eq!(
            advance_phase(&p, 0),
            Some(PhaseAdvance { next_index: 1, wrapped: false })
        );
        assert_eq!(current_phase(&p, 1).map(|s| s.duration_secs), Some(7));
    }

    #[test]
    fn advance_from_last_wraps() {
        let p = three_phase();
        assert_eq!(
            advance_phase(&p, 2),
            Some(PhaseAdvance { next_index: 0, wrapped: true })
        );
    }

    #[test]
    fn single_phase_always_wraps() {
        let p = Pattern::cycled(vec![PhaseSpec::new(PhaseKind::Rest, 30, "Rest")], 1);
        assert_eq!(
            advance_phase(&p, 0),
            Some(PhaseAdvance { next_index: 0, wrapped: true })
        );
    }
}
