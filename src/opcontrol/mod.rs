//! Operator control utilities for driver control periods.
//!
//! This module dispatches controller input to the intake engine once per
//! driver tick. Held buttons drive the held behaviors, a new-press cycles
//! the sort mode, and with nothing held the intake parks.
//!
//! # Example
//!
//! ```ignore
//! use charybdis::opcontrol::intake::IntakeControls;
//!
//! let controls = IntakeControls::default();
//! loop {
//!     controls.dispatch(&mut engine, &controller, 12.0);
//!     sleep(Controller::UPDATE_INTERVAL).await;
//! }
//! ```

/// Intake button dispatch.
///
/// Provides [`IntakeControls`](intake::IntakeControls) for mapping
/// controller buttons to intake behaviors with a fixed priority order.
pub mod intake;
