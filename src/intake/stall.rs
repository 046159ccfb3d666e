//! Feed motor stall detection.
//!
//! A stall is a sustained low-velocity condition on the feed motor,
//! inferred to mean a piece is jammed or seated and the feed should park.
//! Detection needs a grace period: a motor draws through near-zero velocity
//! while spinning up, and reporting that as a stall would park the feed the
//! instant it starts.

/// Stall detection calibration.
///
/// The default policy latches: once a stall is reported it stays reported
/// until [`StallDetector::reset`], even if the motor spins back up, because
/// a seated piece does not un-seat itself. Setting `latching` to `false`
/// selects the alternative policy where the stall flag tracks the velocity
/// threshold tick by tick.
#[derive(Clone, Copy, Debug)]
pub struct StallConfig {
    /// Ticks after a (re)start during which a stall is never reported.
    pub grace_ticks: u32,
    /// Velocity magnitude below this many RPM counts as stalled.
    pub min_rpm:     f64,
    /// Whether the stall flag latches once set.
    pub latching:    bool,
}

impl Default for StallConfig {
    fn default() -> Self {
        StallConfig {
            grace_ticks: 25,
            min_rpm:     10.0,
            latching:    true,
        }
    }
}

/// Tick-driven stall detector for one behavior instance.
///
/// Owned by exactly one held or background behavior and reset whenever that
/// behavior restarts. Call [`update`](Self::update) once per tick with the
/// feed motor's current velocity.
#[derive(Clone, Debug)]
pub struct StallDetector {
    config:        StallConfig,
    elapsed_ticks: u32,
    stalled:       bool,
}

impl StallDetector {
    /// Creates a detector with the given calibration, unstalled, at tick 0.
    pub fn new(config: StallConfig) -> Self {
        StallDetector {
            config,
            elapsed_ticks: 0,
            stalled: false,
        }
    }

    /// Advances one tick with the feed motor's velocity and returns the
    /// current stall state.
    ///
    /// The sign of `velocity_rpm` is ignored. During the grace period the
    /// result is always `false` regardless of velocity.
    pub fn update(&mut self, velocity_rpm: f64) -> bool {
        self.elapsed_ticks = self.elapsed_ticks.saturating_add(1);
        if self.elapsed_ticks <= self.config.grace_ticks {
            return self.stalled;
        }

        let below = velocity_rpm.abs() < self.config.min_rpm;
        if self.config.latching {
            if below {
                self.stalled = true;
            }
        } else {
            self.stalled = below;
        }
        self.stalled
    }

    /// The stall state as of the last [`update`](Self::update).
    pub fn is_stalled(&self) -> bool { self.stalled }

    /// Clears the tick count and the latch.
    ///
    /// Must be called whenever the owning behavior restarts, so the grace
    /// period covers the new spin-up.
    pub fn reset(&mut self) {
        self.elapsed_ticks = 0;
        self.stalled = false;
    }
}

impl Default for StallDetector {
    fn default() -> Self { StallDetector::new(StallConfig::default()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grace_period_masks_spinup() {
        let config = StallConfig::default();
        let mut detector = StallDetector::new(config);

        // Zero velocity for the whole grace period never reads as a stall.
        for _ in 0..config.grace_ticks {
            assert!(!detector.update(0.0));
        }
        // The very next tick does.
        assert!(detector.update(0.0));
    }

    #[test]
    fn latch_survives_velocity_recovery() {
        let config = StallConfig::default();
        let mut detector = StallDetector::new(config);
        for _ in 0..=config.grace_ticks {
            detector.update(0.0);
        }
        assert!(detector.is_stalled());

        // The piece is assumed seated; a velocity spike does not clear it.
        assert!(detector.update(600.0));
        assert!(detector.is_stalled());
    }

    #[test]
    fn healthy_velocity_never_stalls() {
        let mut detector = StallDetector::default();
        for _ in 0..200 {
            assert!(!detector.update(180.0));
        }
    }

    #[test]
    fn direction_does_not_matter() {
        let config = StallConfig::default();
        let mut detector = StallDetector::new(config);
        for _ in 0..=config.grace_ticks {
            detector.update(-3.0);
        }
        assert!(detector.is_stalled());
    }

    #[test]
    fn reset_restores_the_grace_period() {
        let config = StallConfig::default();
        let mut detector = StallDetector::new(config);
        for _ in 0..=config.grace_ticks {
            detector.update(0.0);
        }
        assert!(detector.is_stalled());

        detector.reset();
        assert!(!detector.is_stalled());
        for _ in 0..config.grace_ticks {
            assert!(!detector.update(0.0));
        }
    }

    #[test]
    fn non_latching_policy_tracks_the_threshold() {
        let config = StallConfig {
            latching: false,
            ..StallConfig::default()
        };
        let mut detector = StallDetector::new(config);
        for _ in 0..=config.grace_ticks {
            detector.update(0.0);
        }
        assert!(detector.is_stalled());

        // Without the latch the flag follows the velocity back up.
        assert!(!detector.update(600.0));
        assert!(detector.update(0.0));
    }
}
