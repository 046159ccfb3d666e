//! Intake and outtake actuation.
//!
//! This module drives a game-piece intake: a feed motor group and an
//! indexing motor plus three pneumatic pistons, decided tick by tick from a
//! hue sample and the feed motor's velocity. It provides:
//!
//! - **Color sorting**: Wrong-colored pieces trigger a timed
//!   reverse/re-admit/forward sequence that spits the piece back out the
//!   intake before normal operation resumes.
//! - **Stall-aware storing**: Intaking runs until the feed motor stalls,
//!   which is taken to mean a piece is seated and the feed should park.
//! - **Held and one-shot entry points**: Held behaviors are re-invoked by
//!   the caller once per control tick while a button stays down; one-shot
//!   behaviors spawn a background task that runs until it completes or a
//!   newer behavior supersedes it.
//!
//! # Example
//!
//! ```ignore
//! use charybdis::intake::{
//!     classify::ModeHandle,
//!     engine::{ActuationEngine, EngineConfig},
//!     port::V5Intake,
//! };
//! use charybdis::tasking::TaskSupervisor;
//!
//! let mut engine = ActuationEngine::new(
//!     rig.clone(),
//!     rig,
//!     TaskSupervisor::new(),
//!     ModeHandle::default(),
//!     EngineConfig::default(),
//! );
//!
//! // Once per control tick while the eject button is held:
//! engine.run_long_eject(button_held, 12.0);
//!
//! // Or fire and forget:
//! engine.start_store(12.0);
//! ```

/// Hue classification and sort mode selection.
///
/// Maps optical sensor hue samples to [`Classification`](classify::Classification)
/// values and holds the process-wide [`SortMode`](classify::SortMode).
pub mod classify;

/// The actuation engine.
///
/// [`ActuationEngine`](engine::ActuationEngine) wires the classifier, stall
/// detector, and phase sequencer to the actuator seams, running held
/// behaviors synchronously and one-shot behaviors as background tasks.
pub mod engine;

/// Actuator and sensor seams.
///
/// The [`IntakePort`](port::IntakePort) and [`IntakeSensors`](port::IntakeSensors)
/// traits, and [`V5Intake`](port::V5Intake), their vexide device
/// implementation.
pub mod port;

/// The timed eject sequencer.
///
/// A three-phase state machine (reverse, re-admit, forward) advanced one
/// tick per evaluation while a rejected piece is cleared.
pub mod sequence;

/// Feed motor stall detection.
///
/// Velocity thresholding with a spin-up grace period and a latching policy.
pub mod stall;
