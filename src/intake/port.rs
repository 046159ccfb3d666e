//! Actuator and sensor seams for the intake.
//!
//! The engine talks to hardware only through [`IntakePort`] and
//! [`IntakeSensors`]: fire-and-forget actuator writes and non-blocking
//! snapshot reads. [`V5Intake`] implements both against vexide devices,
//! holding everything in reference-counted cells so a clone can be moved
//! into a background task while the control loop keeps its own handle.
//!
//! Device errors do not propagate. Every vexide call returns a `Result`;
//! failed writes are logged and dropped, and failed reads return sentinel
//! values chosen so they cannot be mistaken for actionable sensor states
//! (an unreadable hue classifies as no color, an unreadable velocity never
//! looks like a stall).

use std::{cell::RefCell, rc::Rc, time::Duration};

use log::warn;
use vexide::prelude::{AdiDigitalOut, Motor, OpticalSensor};

/// Maximum number of motors in the feed group.
pub const FEED_MOTORS: usize = 4;

/// Fire-and-forget actuator writes for the intake path.
///
/// `feed` is the roller group that pulls pieces in, `indexer` the single
/// motor that seats them. The three pistons shape the piece's path:
/// `floating` lifts the intake, `hood` opens the long-goal exit, `gate`
/// diverts to the mid goal.
pub trait IntakePort {
    /// Commands the feed motor group, in signed volts.
    fn set_feed(&self, volts: f64);
    /// Commands the indexing motor, in signed volts.
    fn set_indexer(&self, volts: f64);
    /// Extends or retracts the floating piston.
    fn set_floating(&self, extended: bool);
    /// Extends or retracts the hood piston.
    fn set_hood(&self, extended: bool);
    /// Extends or retracts the gate piston.
    fn set_gate(&self, extended: bool);
}

/// Non-blocking snapshot reads for the intake path.
///
/// Each read reflects the device's latest sample, not necessarily "now";
/// callers tolerate that by re-sampling every tick instead of caching.
pub trait IntakeSensors {
    /// Latest hue sample in degrees, `[0, 360)`.
    ///
    /// NaN when the sensor cannot be read, which classifies as no color.
    fn hue(&self) -> f64;

    /// Latest feed motor velocity in signed RPM.
    ///
    /// Positive infinity when the motor cannot be read, so a read failure
    /// never reads as a stall.
    fn feed_velocity(&self) -> f64;
}

/// The vexide device implementation of both intake seams.
///
/// # Example
///
/// ```ignore
/// use charybdis::intake::port::V5Intake;
/// use vexide::prelude::*;
///
/// let rig = V5Intake::new(
///     [
///         Motor::new(peripherals.port_19, Gearset::Blue, Direction::Forward),
///         Motor::new(peripherals.port_18, Gearset::Blue, Direction::Forward),
///     ],
///     Motor::new(peripherals.port_17, Gearset::Blue, Direction::Forward),
///     AdiDigitalOut::new(peripherals.adi_f), // floating
///     AdiDigitalOut::new(peripherals.adi_a), // hood
///     AdiDigitalOut::new(peripherals.adi_h), // gate
///     OpticalSensor::new(peripherals.port_10),
/// );
/// rig.configure();
/// ```
#[derive(Clone)]
pub struct V5Intake {
    feed:     Rc<RefCell<heapless::Vec<Motor, FEED_MOTORS>>>,
    indexer:  Rc<RefCell<Motor>>,
    floating: Rc<RefCell<AdiDigitalOut>>,
    hood:     Rc<RefCell<AdiDigitalOut>>,
    gate:     Rc<RefCell<AdiDigitalOut>>,
    optical:  Rc<RefCell<OpticalSensor>>,
}

impl V5Intake {
    /// Builds the rig from its devices.
    ///
    /// At most [`FEED_MOTORS`] feed motors are kept; extras are dropped
    /// with a logged warning.
    pub fn new(
        feed: impl IntoIterator<Item = Motor>,
        indexer: Motor,
        floating: AdiDigitalOut,
        hood: AdiDigitalOut,
        gate: AdiDigitalOut,
        optical: OpticalSensor,
    ) -> Self {
        let mut group: heapless::Vec<Motor, FEED_MOTORS> = heapless::Vec::new();
        for motor in feed {
            if group.push(motor).is_err() {
                warn!("Feed Motor Group Full: extra motor dropped");
            }
        }

        V5Intake {
            feed:     Rc::new(RefCell::new(group)),
            indexer:  Rc::new(RefCell::new(indexer)),
            floating: Rc::new(RefCell::new(floating)),
            hood:     Rc::new(RefCell::new(hood)),
            gate:     Rc::new(RefCell::new(gate)),
            optical:  Rc::new(RefCell::new(optical)),
        }
    }

    /// One-time sensor setup, called once at program start.
    ///
    /// Runs the optical LED at full brightness and shortens the integration
    /// window so hue samples keep up with the control tick.
    pub fn configure(&self) {
        let mut optical = self.optical.borrow_mut();
        optical.set_led_brightness(1.0).unwrap_or_else(|e| {
            warn!("Optical LED Error: {}", e);
        });
        optical
            .set_integration_time(Duration::from_millis(10))
            .unwrap_or_else(|e| {
                warn!("Optical Integration Time Error: {}", e);
            });
    }
}

impl IntakePort for V5Intake {
    fn set_feed(&self, volts: f64) {
        if let Ok(mut motors) = self.feed.try_borrow_mut() {
            for motor in motors.iter_mut() {
                motor.set_voltage(volts).unwrap_or_else(|e| {
                    warn!("Feed Motor Set Voltage Error: {}", e);
                });
            }
        }
    }

    fn set_indexer(&self, volts: f64) {
        if let Ok(mut motor) = self.indexer.try_borrow_mut() {
            motor.set_voltage(volts).unwrap_or_else(|e| {
                warn!("Indexer Motor Set Voltage Error: {}", e);
            });
        }
    }

    fn set_floating(&self, extended: bool) { set_piston(&self.floating, extended, "Floating"); }

    fn set_hood(&self, extended: bool) { set_piston(&self.hood, extended, "Hood"); }

    fn set_gate(&self, extended: bool) { set_piston(&self.gate, extended, "Gate"); }
}

impl IntakeSensors for V5Intake {
    fn hue(&self) -> f64 {
        self.optical.borrow_mut().hue().unwrap_or_else(|e| {
            warn!("Optical Hue Error: {}", e);
            f64::NAN
        })
    }

    fn feed_velocity(&self) -> f64 {
        let motors = self.feed.borrow_mut();
        match motors.first() {
            Some(motor) => motor.velocity().unwrap_or_else(|e| {
                warn!("Feed Motor Velocity Error: {}", e);
                f64::INFINITY
            }),
            None => f64::INFINITY,
        }
    }
}

fn set_piston(piston: &Rc<RefCell<AdiDigitalOut>>, extended: bool, name: &str) {
    let mut piston = piston.borrow_mut();
    let result = if extended {
        piston.set_high()
    } else {
        piston.set_low()
    };
    result.unwrap_or_else(|e| {
        warn!("{} Piston Error: {}", name, e);
    });
}
