//! The actuation engine.
//!
//! [`ActuationEngine`] owns the decision layer between the robot program
//! and the intake hardware. It exposes two kinds of entry points:
//!
//! - **Held behaviors** (`run_*`): invoked once per control tick for as
//!   long as a physical input stays active. These run synchronously inside
//!   the caller's tick and never spawn or block. A rising edge resets the
//!   behavior's private state and supersedes any background behavior; a
//!   falling edge resets the state and writes nothing.
//! - **One-shot behaviors** (`start_*`): capture a fresh generation from
//!   the [`TaskSupervisor`], move an owned parameter block into a detached
//!   background task, and return immediately. The task loops at the
//!   configured tick period; every iteration re-checks its generation
//!   before touching an actuator, so a superseded task zeroes its outputs
//!   and terminates within one tick period of being displaced.
//!
//! # Architecture
//!
//! Each background loop is a plain step function called once per
//! iteration. A step either continues (the loop sleeps one tick), reports
//! itself superseded (zeroed and done), or completes naturally (the store
//! behavior once the feed stalls). The sort-on-eject behavior has no
//! natural completion; it re-samples hue forever until superseded.
//!
//! # Example
//!
//! ```ignore
//! use charybdis::intake::engine::{ActuationEngine, EngineConfig};
//!
//! // Driver control, once per tick:
//! engine.run_long_eject(controller_state.button_l1.is_pressed(), 12.0);
//!
//! // Autonomous, fire and forget:
//! engine.start_store(12.0);
//! // ... drive to the goal ...
//! engine.start_sort_eject(12.0); // supersedes the store task
//! engine.stop();
//! ```

use std::time::Duration;

use log::info;
use vexide::{task::spawn, time::sleep};

use super::{
    classify::{ModeHandle, SortMode, classify},
    port::{IntakePort, IntakeSensors},
    sequence::{PhaseState, evaluate},
    stall::{StallConfig, StallDetector},
};
use crate::tasking::{Generation, TaskSupervisor};

/// Engine calibration.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Delay between background loop iterations.
    pub tick_period: Duration,
    /// Stall detection calibration for the store behaviors.
    pub stall:       StallConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tick_period: Duration::from_millis(10),
            stall:       StallConfig::default(),
        }
    }
}

/// Parameters for one background behavior, moved into its task at spawn.
struct OneShotTask {
    generation: Generation,
    power:      f64,
}

/// What a background loop iteration decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepVerdict {
    /// Keep looping; sleep one tick period.
    Continue,
    /// A newer generation took over; outputs are zeroed, terminate.
    Superseded,
    /// The behavior reached its terminal condition; outputs are zeroed,
    /// terminate.
    Complete,
}

/// Private state of one sequencer-driven held behavior.
#[derive(Default)]
struct HeldSequence {
    state:   PhaseState,
    engaged: bool,
}

/// Private state of the stall-driven held store behavior.
struct HeldStore {
    stall:   StallDetector,
    engaged: bool,
}

/// The intake actuation orchestrator.
///
/// Generic over the actuator and sensor seams so the decision logic can be
/// exercised against recording fakes; on the robot both parameters are
/// [`V5Intake`](super::port::V5Intake) clones.
pub struct ActuationEngine<P: IntakePort, S: IntakeSensors> {
    port:       P,
    sensors:    S,
    supervisor: TaskSupervisor,
    mode:       ModeHandle,
    config:     EngineConfig,
    long_eject: HeldSequence,
    mid_eject:  HeldSequence,
    store:      HeldStore,
    outtake:    bool,
    lower:      bool,
}

impl<P: IntakePort, S: IntakeSensors> ActuationEngine<P, S> {
    /// Creates an engine over the given seams and shared handles.
    ///
    /// The supervisor and mode handles are shared by design: pass clones of
    /// the same instances to anything else that needs to supersede
    /// background work or read the sort mode.
    pub fn new(
        port: P,
        sensors: S,
        supervisor: TaskSupervisor,
        mode: ModeHandle,
        config: EngineConfig,
    ) -> Self {
        ActuationEngine {
            port,
            sensors,
            supervisor,
            mode,
            store: HeldStore {
                stall:   StallDetector::new(config.stall),
                engaged: false,
            },
            config,
            long_eject: HeldSequence::default(),
            mid_eject: HeldSequence::default(),
            outtake: false,
            lower: false,
        }
    }

    /// The current sort mode.
    pub fn mode(&self) -> SortMode { self.mode.get() }

    /// Replaces the sort mode.
    pub fn set_mode(&self, mode: SortMode) { self.mode.set(mode); }

    /// Advances the sort mode to the next in the cycle and returns it.
    pub fn cycle_mode(&self) -> SortMode { self.mode.cycle() }

    /// Color-sorted eject toward the long goal. Held behavior; call once
    /// per control tick with whether the input is still active.
    ///
    /// While active: floating and hood pistons extended, gate retracted,
    /// motors driven by the eject sequencer against the current sort mode.
    pub fn run_long_eject(&mut self, active: bool, power: f64) {
        if !active {
            if self.long_eject.engaged {
                self.long_eject.state.reset();
                self.long_eject.engaged = false;
            }
            return;
        }
        if !self.long_eject.engaged {
            self.long_eject.state.reset();
            self.long_eject.engaged = true;
            self.supervisor.cancel_all();
        }

        let class = classify(self.sensors.hue());
        let command = evaluate(&mut self.long_eject.state, class, self.mode.get(), power);
        self.port.set_floating(true);
        self.port.set_hood(true);
        self.port.set_gate(false);
        self.port.set_feed(command.feed);
        self.port.set_indexer(command.indexer);
    }

    /// Color-sorted eject toward the upper mid goal. Held behavior.
    ///
    /// Same sequencing as [`run_long_eject`](Self::run_long_eject) with the
    /// gate piston extended and the hood retracted.
    pub fn run_mid_eject(&mut self, active: bool, power: f64) {
        if !active {
            if self.mid_eject.engaged {
                self.mid_eject.state.reset();
                self.mid_eject.engaged = false;
            }
            return;
        }
        if !self.mid_eject.engaged {
            self.mid_eject.state.reset();
            self.mid_eject.engaged = true;
            self.supervisor.cancel_all();
        }

        let class = classify(self.sensors.hue());
        let command = evaluate(&mut self.mid_eject.state, class, self.mode.get(), power);
        self.port.set_floating(true);
        self.port.set_hood(false);
        self.port.set_gate(true);
        self.port.set_feed(command.feed);
        self.port.set_indexer(command.indexer);
    }

    /// Stall-aware intake-and-store. Held behavior.
    ///
    /// Runs everything forward until the feed motor stalls past the grace
    /// period, then parks the motors at zero while the input stays held —
    /// the piece is seated and grinding the feed would not seat it further.
    pub fn run_store(&mut self, active: bool, power: f64) {
        if !active {
            if self.store.engaged {
                self.store.stall.reset();
                self.store.engaged = false;
            }
            return;
        }
        if !self.store.engaged {
            self.store.stall.reset();
            self.store.engaged = true;
            self.supervisor.cancel_all();
        }

        let stalled = self.store.stall.update(self.sensors.feed_velocity());
        self.port.set_floating(true);
        self.port.set_hood(false);
        self.port.set_gate(false);
        if stalled {
            self.port.set_feed(0.0);
            self.port.set_indexer(0.0);
        } else {
            self.port.set_feed(power);
            self.port.set_indexer(power);
        }
    }

    /// Plain unsorted reverse out the front of the intake. Held behavior.
    pub fn run_outtake(&mut self, active: bool, power: f64) {
        if !active {
            self.outtake = false;
            return;
        }
        if !self.outtake {
            self.outtake = true;
            self.supervisor.cancel_all();
        }

        self.port.set_floating(true);
        self.port.set_hood(false);
        self.port.set_gate(false);
        self.port.set_feed(-power);
        self.port.set_indexer(-power);
    }

    /// Reverse eject into the lower mid goal, every piston retracted. Held
    /// behavior.
    pub fn run_lower_eject(&mut self, active: bool, power: f64) {
        if !active {
            self.lower = false;
            return;
        }
        if !self.lower {
            self.lower = true;
            self.supervisor.cancel_all();
        }

        self.port.set_floating(false);
        self.port.set_hood(false);
        self.port.set_gate(false);
        self.port.set_feed(-power);
        self.port.set_indexer(-power);
    }

    /// The idle write for ticks when no input is active: motors parked,
    /// floating piston up, hood closed. Does not cancel background work.
    pub fn park(&self) {
        self.port.set_floating(true);
        self.port.set_hood(false);
        self.port.set_feed(0.0);
        self.port.set_indexer(0.0);
    }

    /// Full stop: supersedes every background behavior and synchronously
    /// zeroes every actuator this engine controls.
    ///
    /// A background task mid-iteration may still land one write after this,
    /// bounded by one tick period; its own generation check then zeroes the
    /// motors again. Calling `stop` twice is the same as calling it once.
    pub fn stop(&mut self) {
        self.supervisor.cancel_all();
        self.long_eject.state.reset();
        self.long_eject.engaged = false;
        self.mid_eject.state.reset();
        self.mid_eject.engaged = false;
        self.store.stall.reset();
        self.store.engaged = false;
        self.outtake = false;
        self.lower = false;

        self.port.set_feed(0.0);
        self.port.set_indexer(0.0);
        self.port.set_floating(false);
        self.port.set_hood(false);
        self.port.set_gate(false);
    }
}

impl<P, S> ActuationEngine<P, S>
where
    P: IntakePort + Clone + 'static,
    S: IntakeSensors + Clone + 'static,
{
    /// Starts the one-shot store behavior in the background.
    ///
    /// Supersedes any running background behavior. The task intakes at
    /// `power` until the feed motor stalls (natural completion, motors
    /// parked) or a newer behavior takes over.
    pub fn start_store(&self, power: f64) {
        let task = OneShotTask {
            generation: self.supervisor.begin_new(),
            power,
        };
        info!("Store Task Started (generation {})", task.generation);

        let port = self.port.clone();
        let sensors = self.sensors.clone();
        let supervisor = self.supervisor.clone();
        let tick = self.config.tick_period;
        let mut stall = StallDetector::new(self.config.stall);

        spawn(async move {
            loop {
                match store_step(&port, &sensors, &supervisor, &task, &mut stall) {
                    StepVerdict::Continue => sleep(tick).await,
                    StepVerdict::Superseded | StepVerdict::Complete => break,
                }
            }
        })
        .detach();
    }

    /// Starts the one-shot color-sorting eject behavior in the background.
    ///
    /// Supersedes any running background behavior. The task re-samples hue
    /// every iteration and drives the long-goal eject sequence against the
    /// live sort mode; it has no natural completion and runs until
    /// superseded.
    pub fn start_sort_eject(&self, power: f64) {
        let task = OneShotTask {
            generation: self.supervisor.begin_new(),
            power,
        };
        info!("Sort Eject Task Started (generation {})", task.generation);

        let port = self.port.clone();
        let sensors = self.sensors.clone();
        let supervisor = self.supervisor.clone();
        let mode = self.mode.clone();
        let tick = self.config.tick_period;
        let mut state = PhaseState::default();

        spawn(async move {
            loop {
                match sort_eject_step(&port, &sensors, &supervisor, &task, &mut state, mode.get())
                {
                    StepVerdict::Continue => sleep(tick).await,
                    StepVerdict::Superseded | StepVerdict::Complete => break,
                }
            }
        })
        .detach();
    }
}

/// Zeroes the motors a background behavior controls. Pistons are left
/// where they are; the superseding behavior owns them now.
fn zero_motors<P: IntakePort>(port: &P) {
    port.set_feed(0.0);
    port.set_indexer(0.0);
}

/// One iteration of the background store loop.
fn store_step<P: IntakePort, S: IntakeSensors>(
    port: &P,
    sensors: &S,
    supervisor: &TaskSupervisor,
    task: &OneShotTask,
    stall: &mut StallDetector,
) -> StepVerdict {
    if !supervisor.is_current(task.generation) {
        zero_motors(port);
        return StepVerdict::Superseded;
    }

    let stalled = stall.update(sensors.feed_velocity());
    port.set_floating(true);
    port.set_hood(false);
    port.set_gate(false);
    if stalled {
        zero_motors(port);
        return StepVerdict::Complete;
    }
    port.set_feed(task.power);
    port.set_indexer(task.power);
    StepVerdict::Continue
}

/// One iteration of the background sort-eject loop.
fn sort_eject_step<P: IntakePort, S: IntakeSensors>(
    port: &P,
    sensors: &S,
    supervisor: &TaskSupervisor,
    task: &OneShotTask,
    state: &mut PhaseState,
    mode: SortMode,
) -> StepVerdict {
    if !supervisor.is_current(task.generation) {
        zero_motors(port);
        return StepVerdict::Superseded;
    }

    let class = classify(sensors.hue());
    let command = evaluate(state, class, mode, task.power);
    port.set_floating(true);
    port.set_hood(true);
    port.set_gate(false);
    port.set_feed(command.feed);
    port.set_indexer(command.indexer);
    StepVerdict::Continue
}
