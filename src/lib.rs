//! # Charybdis
//!
//! Charybdis is an intake and color-sorting actuation library for VEX V5
//! robots built on top of [Vexide](https://vexide.dev). It drives the motors
//! and pneumatic pistons of a game-piece intake, and provides:
//!
//! - **Held Behaviors**: Reverse-then-forward eject sequences driven one
//!   control tick at a time for as long as a controller button stays held,
//!   with color sorting through an optical sensor.
//! - **One-Shot Behaviors**: Spawn-and-forget background tasks (store until
//!   the feed motor stalls, eject while sorting by color) that run
//!   concurrently with the rest of the robot program until they finish or
//!   are superseded.
//! - **Task Supersession**: A generation counter that guarantees at most one
//!   background behavior owns the actuators at a time, with cooperative
//!   polling cancellation.
//! - **Operator Control**: A per-tick dispatcher that maps controller
//!   buttons onto the held behaviors.
//! - **Logging**: A file-based logger for debugging and telemetry.
//!
//! ## Quick Start
//!
//! ```ignore
//! use charybdis::{
//!     intake::{
//!         classify::ModeHandle,
//!         engine::{ActuationEngine, EngineConfig},
//!         port::V5Intake,
//!     },
//!     tasking::TaskSupervisor,
//! };
//! use vexide::prelude::*;
//!
//! #[vexide::main]
//! async fn main(peripherals: Peripherals) {
//!     let rig = V5Intake::new(
//!         [Motor::new(peripherals.port_19, Gearset::Blue, Direction::Forward)],
//!         Motor::new(peripherals.port_17, Gearset::Blue, Direction::Forward),
//!         AdiDigitalOut::new(peripherals.adi_f),
//!         AdiDigitalOut::new(peripherals.adi_a),
//!         AdiDigitalOut::new(peripherals.adi_h),
//!         OpticalSensor::new(peripherals.port_10),
//!     );
//!
//!     let mut engine = ActuationEngine::new(
//!         rig.clone(),
//!         rig,
//!         TaskSupervisor::new(),
//!         ModeHandle::default(),
//!         EngineConfig::default(),
//!     );
//!
//!     engine.start_store(12.0); // runs in the background until a stall
//! }
//! ```
//!
//! ## Modules
//!
//! - [`intake`]: The actuation core — classifier, stall detection, phase
//!   sequencing, and the engine that ties them to the hardware.
//! - [`tasking`]: Generation-based supersession of background behaviors.
//! - [`opcontrol`]: Controller button dispatch for driver control periods.
//! - [`fs`]: Filesystem utilities including logging.

/// Filesystem utilities module.
///
/// Contains logging functionality for recording robot telemetry and debug
/// information to files on the V5 Brain's SD card.
pub mod fs;

/// Intake actuation module.
///
/// The core of the crate: hue classification ([`intake::classify`]), stall
/// detection ([`intake::stall`]), the timed eject sequencer
/// ([`intake::sequence`]), the hardware seams ([`intake::port`]), and the
/// [`ActuationEngine`](intake::engine::ActuationEngine) that runs held and
/// background behaviors against them.
pub mod intake;

/// Operator control utilities module.
///
/// Maps controller buttons to intake behaviors once per driver-control
/// tick, with the same priority ordering as a physical if/else button
/// chain.
pub mod opcontrol;

/// Background task supersession module.
///
/// Provides the [`TaskSupervisor`](tasking::TaskSupervisor), a
/// monotonically increasing generation counter used by background
/// behaviors to detect that they have been superseded.
pub mod tasking;
