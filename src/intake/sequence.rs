//! The timed eject sequencer.
//!
//! When the sort mode rejects the color currently in view, the intake runs
//! a fixed three-phase sequence instead of feeding forward:
//!
//! 1. **Reverse** — every motor reverses, physically ejecting the piece
//!    back out the intake.
//! 2. **Mid** — the feed motors resume forward to re-admit trailing pieces
//!    while the indexer keeps reversing to hold the rejected piece clear.
//! 3. **Forward** — normal operation.
//!
//! The sequence is advanced one tick per [`evaluate`] call and never
//! restarts on its own: once it has run, another rejection requires an
//! explicit [`PhaseState::reset`] (button release or a new behavior).
//! Without that rule a rejected piece lingering in front of the sensor
//! would re-trigger the reverse phase every tick and the intake would
//! oscillate.

use super::classify::{Classification, SortMode};

/// Ticks spent in the reverse phase (about 120 ms at the default tick).
const REVERSE_END: u32 = 12;
/// Tick at which the sequence returns to plain forward (about 370 ms).
const MID_END: u32 = 37;

/// A named segment of the eject sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Ejecting the rejected piece.
    Reverse,
    /// Re-admitting trailing pieces while holding the rejected one clear.
    Mid,
    /// Normal forward operation.
    Forward,
}

/// Per-behavior sequencer state.
///
/// Owned by exactly one held or background behavior; never shared. Freshly
/// constructed (or [`reset`](Self::reset)) it sits unlatched at the start
/// of the reverse phase, ready to trigger on the next rejected
/// classification.
#[derive(Clone, Debug)]
pub struct PhaseState {
    elapsed_ticks: u32,
    phase:         Phase,
    latched:       bool,
}

impl Default for PhaseState {
    fn default() -> Self {
        PhaseState {
            elapsed_ticks: 0,
            phase:         Phase::Reverse,
            latched:       false,
        }
    }
}

impl PhaseState {
    /// The phase decided by the last [`evaluate`] call.
    pub fn phase(&self) -> Phase { self.phase }

    /// Returns the state to unlatched tick 0, allowing a new sequence.
    pub fn reset(&mut self) { *self = PhaseState::default(); }
}

/// The motor voltages decided for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SortCommand {
    /// Signed voltage for the feed motor group.
    pub feed:    f64,
    /// Signed voltage for the indexing motor.
    pub indexer: f64,
}

/// Decides this tick's motor commands from the current classification and
/// sort mode, advancing `state` by one tick when a sequence is running.
///
/// While `mode` is [`SortMode::ForwardOnly`], or the classification is not
/// the color `mode` rejects and no sequence is latched, everything runs
/// forward at `power` and the state does not advance. A rejected
/// classification latches the sequence, which then runs to completion on
/// its own clock regardless of what the sensor sees — and stays in
/// [`Phase::Forward`] afterwards until the state is explicitly reset.
pub fn evaluate(
    state: &mut PhaseState,
    class: Classification,
    mode: SortMode,
    power: f64,
) -> SortCommand {
    if !state.latched {
        if !mode.rejects(class) {
            state.phase = Phase::Forward;
            return SortCommand {
                feed:    power,
                indexer: power,
            };
        }
        state.latched = true;
        state.elapsed_ticks = 0;
    }

    let tick = state.elapsed_ticks;
    state.elapsed_ticks = tick.saturating_add(1);
    state.phase = if tick < REVERSE_END {
        Phase::Reverse
    } else if tick < MID_END {
        Phase::Mid
    } else {
        Phase::Forward
    };

    match state.phase {
        Phase::Reverse => SortCommand {
            feed:    -power,
            indexer: -power,
        },
        Phase::Mid => SortCommand {
            feed:    power,
            indexer: -power,
        },
        Phase::Forward => SortCommand {
            feed:    power,
            indexer: power,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POWER: f64 = 12.0;

    fn evaluate_red(state: &mut PhaseState) -> SortCommand {
        evaluate(state, Classification::Red, SortMode::RejectRed, POWER)
    }

    #[test]
    fn phase_boundaries_are_exact() {
        let mut state = PhaseState::default();

        // Ticks [0, REVERSE_END) reverse, [REVERSE_END, MID_END) mid,
        // [MID_END, ..) forward.
        for tick in 0..(MID_END + 8) {
            let command = evaluate_red(&mut state);
            let expected = if tick < REVERSE_END {
                Phase::Reverse
            } else if tick < MID_END {
                Phase::Mid
            } else {
                Phase::Forward
            };
            assert_eq!(state.phase(), expected, "tick {}", tick);
            match expected {
                Phase::Reverse => assert_eq!(command, SortCommand { feed: -POWER, indexer: -POWER }),
                Phase::Mid => assert_eq!(command, SortCommand { feed: POWER, indexer: -POWER }),
                Phase::Forward => assert_eq!(command, SortCommand { feed: POWER, indexer: POWER }),
            }
        }
    }

    #[test]
    fn edge_ticks_match_the_calibration() {
        let mut state = PhaseState::default();
        let mut phases = Vec::new();
        for _ in 0..=MID_END {
            evaluate_red(&mut state);
            phases.push(state.phase());
        }
        assert_eq!(phases[11], Phase::Reverse);
        assert_eq!(phases[12], Phase::Mid);
        assert_eq!(phases[36], Phase::Mid);
        assert_eq!(phases[37], Phase::Forward);
    }

    #[test]
    fn forward_only_never_sorts() {
        let mut state = PhaseState::default();
        for _ in 0..100 {
            let command = evaluate(&mut state, Classification::Red, SortMode::ForwardOnly, POWER);
            assert_eq!(state.phase(), Phase::Forward);
            assert_eq!(command, SortCommand { feed: POWER, indexer: POWER });
        }
    }

    #[test]
    fn non_rejected_color_runs_forward() {
        let mut state = PhaseState::default();
        let command = evaluate(&mut state, Classification::Blue, SortMode::RejectRed, POWER);
        assert_eq!(state.phase(), Phase::Forward);
        assert_eq!(command, SortCommand { feed: POWER, indexer: POWER });

        // No color in view behaves the same.
        let command = evaluate(&mut state, Classification::None, SortMode::RejectRed, POWER);
        assert_eq!(command, SortCommand { feed: POWER, indexer: POWER });
    }

    #[test]
    fn sequence_runs_to_completion_once_latched() {
        let mut state = PhaseState::default();
        evaluate_red(&mut state);
        assert_eq!(state.phase(), Phase::Reverse);

        // The piece leaves the sensor's view mid-sequence; the sequence
        // keeps its own clock.
        for _ in 1..REVERSE_END {
            evaluate(&mut state, Classification::None, SortMode::RejectRed, POWER);
            assert_eq!(state.phase(), Phase::Reverse);
        }
        evaluate(&mut state, Classification::None, SortMode::RejectRed, POWER);
        assert_eq!(state.phase(), Phase::Mid);
    }

    #[test]
    fn no_reverse_reentry_without_reset() {
        let mut state = PhaseState::default();
        for _ in 0..=MID_END {
            evaluate_red(&mut state);
        }
        assert_eq!(state.phase(), Phase::Forward);

        // Still staring at a red piece: stays forward.
        for _ in 0..50 {
            let command = evaluate_red(&mut state);
            assert_eq!(state.phase(), Phase::Forward);
            assert_eq!(command, SortCommand { feed: POWER, indexer: POWER });
        }

        // Only an explicit reset re-arms the sequence.
        state.reset();
        evaluate_red(&mut state);
        assert_eq!(state.phase(), Phase::Reverse);
    }

    #[test]
    fn power_scales_the_commands() {
        let mut state = PhaseState::default();
        let command = evaluate(&mut state, Classification::Red, SortMode::RejectRed, 6.0);
        assert_eq!(command, SortCommand { feed: -6.0, indexer: -6.0 });
    }
}
