//! Hue classification and sort mode selection.
//!
//! The optical sensor reports a hue in degrees. [`classify`] buckets a
//! sample into red, blue, or no color; [`SortMode`] says which of those the
//! intake should reject. The mode is process-wide state cycled by a
//! controller button and read by every eject evaluation, so it lives behind
//! the cloneable [`ModeHandle`].

use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

/// Hues below this many degrees read as red.
const RED_BELOW: f64 = 20.0;
/// Hues at or above this many degrees read as red (the red band wraps
/// through zero).
const RED_ABOVE: f64 = 340.0;
/// Start of the blue band, inclusive.
const BLUE_FROM: f64 = 180.0;
/// End of the blue band, exclusive.
const BLUE_TO: f64 = 240.0;

/// The color category inferred from a single hue sample.
///
/// Recomputed every evaluation; a classification has no identity beyond the
/// tick it was sampled on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// No recognized game piece color in view.
    None,
    /// A red game piece.
    Red,
    /// A blue game piece.
    Blue,
}

/// Buckets a hue sample in degrees into a [`Classification`].
///
/// Red is a wraparound band: below `RED_BELOW` or at/above `RED_ABOVE`.
/// Blue is the half-open band `[BLUE_FROM, BLUE_TO)`. Anything else,
/// including NaN from a failed sensor read, is [`Classification::None`].
///
/// Boundary hues land on exactly one side: `RED_ABOVE` itself is red,
/// `RED_BELOW` itself is not; `BLUE_FROM` itself is blue, `BLUE_TO` itself
/// is not.
pub fn classify(hue: f64) -> Classification {
    if hue < RED_BELOW || hue >= RED_ABOVE {
        Classification::Red
    } else if (BLUE_FROM..BLUE_TO).contains(&hue) {
        Classification::Blue
    } else {
        Classification::None
    }
}

/// Which color the intake rejects during eject sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortMode {
    /// No sorting; everything is carried forward.
    #[default]
    ForwardOnly,
    /// Red pieces are ejected back out the intake.
    RejectRed,
    /// Blue pieces are ejected back out the intake.
    RejectBlue,
}

impl SortMode {
    /// Returns whether `class` is the color this mode ejects.
    pub fn rejects(self, class: Classification) -> bool {
        matches!(
            (self, class),
            (SortMode::RejectRed, Classification::Red) |
                (SortMode::RejectBlue, Classification::Blue)
        )
    }

    /// The mode following this one in the cycle order.
    pub fn next(self) -> SortMode {
        match self {
            SortMode::ForwardOnly => SortMode::RejectRed,
            SortMode::RejectRed => SortMode::RejectBlue,
            SortMode::RejectBlue => SortMode::ForwardOnly,
        }
    }

    fn from_index(index: u8) -> SortMode {
        match index {
            1 => SortMode::RejectRed,
            2 => SortMode::RejectBlue,
            _ => SortMode::ForwardOnly,
        }
    }

    fn index(self) -> u8 {
        match self {
            SortMode::ForwardOnly => 0,
            SortMode::RejectRed => 1,
            SortMode::RejectBlue => 2,
        }
    }
}

/// A cloneable handle to the process-wide [`SortMode`].
///
/// One writer (the operator control path) cycles or sets the mode; any
/// number of behaviors read it, including background tasks holding their
/// own clone. Defaults to [`SortMode::ForwardOnly`].
#[derive(Clone, Default)]
pub struct ModeHandle {
    mode: Arc<AtomicU8>,
}

impl ModeHandle {
    /// Creates a handle starting at `mode`.
    pub fn new(mode: SortMode) -> Self {
        let handle = ModeHandle::default();
        handle.set(mode);
        handle
    }

    /// The current mode.
    pub fn get(&self) -> SortMode { SortMode::from_index(self.mode.load(Ordering::SeqCst)) }

    /// Replaces the current mode.
    pub fn set(&self, mode: SortMode) { self.mode.store(mode.index(), Ordering::SeqCst); }

    /// Advances to the next mode in the cycle and returns it.
    pub fn cycle(&self) -> SortMode {
        let next = self.get().next();
        self.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_band_wraps_through_zero() {
        assert_eq!(classify(0.0), Classification::Red);
        assert_eq!(classify(359.0), Classification::Red);
        assert_eq!(classify(10.0), Classification::Red);
        assert_eq!(classify(345.5), Classification::Red);
    }

    #[test]
    fn blue_band_is_the_mid_range() {
        assert_eq!(classify(200.0), Classification::Blue);
        assert_eq!(classify(239.9), Classification::Blue);
        assert_eq!(classify(100.0), Classification::None);
        assert_eq!(classify(300.0), Classification::None);
    }

    #[test]
    fn boundaries_land_on_exactly_one_side() {
        // Each threshold is assigned deterministically.
        assert_eq!(classify(RED_BELOW), Classification::None);
        assert_eq!(classify(RED_ABOVE), Classification::Red);
        assert_eq!(classify(BLUE_FROM), Classification::Blue);
        assert_eq!(classify(BLUE_TO), Classification::None);
    }

    #[test]
    fn unreadable_sample_is_no_color() { assert_eq!(classify(f64::NAN), Classification::None); }

    #[test]
    fn mode_rejects_only_its_color() {
        assert!(SortMode::RejectRed.rejects(Classification::Red));
        assert!(!SortMode::RejectRed.rejects(Classification::Blue));
        assert!(!SortMode::RejectRed.rejects(Classification::None));
        assert!(SortMode::RejectBlue.rejects(Classification::Blue));
        assert!(!SortMode::ForwardOnly.rejects(Classification::Red));
        assert!(!SortMode::ForwardOnly.rejects(Classification::Blue));
    }

    #[test]
    fn cycle_wraps_around() {
        let handle = ModeHandle::default();
        assert_eq!(handle.get(), SortMode::ForwardOnly);
        assert_eq!(handle.cycle(), SortMode::RejectRed);
        assert_eq!(handle.cycle(), SortMode::RejectBlue);
        assert_eq!(handle.cycle(), SortMode::ForwardOnly);
    }

    #[test]
    fn clones_read_the_same_mode() {
        let handle = ModeHandle::new(SortMode::RejectBlue);
        let reader = handle.clone();
        assert_eq!(reader.get(), SortMode::RejectBlue);
        handle.set(SortMode::RejectRed);
        assert_eq!(reader.get(), SortMode::RejectRed);
    }
}
