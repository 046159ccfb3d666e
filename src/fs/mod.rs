//! Filesystem utilities for the V5 Brain.
//!
//! This module provides utilities for interacting with the V5 Brain's
//! filesystem, currently logging: sort decisions, stall events, and task
//! supersessions are much easier to reconstruct from a log file than from
//! watching the robot.
//!
//! # Example
//!
//! ```ignore
//! use charybdis::fs::logger;
//! use log::{info, LevelFilter};
//!
//! // Initialize the logger at program start
//! logger::init(LevelFilter::Info).expect("Failed to initialize logger");
//!
//! info!("Intake engine ready");
//! ```

/// File-based logging for the V5 Brain.
///
/// Provides a logger implementation that writes to both the console
/// and a file on the SD card.
pub mod logger;
