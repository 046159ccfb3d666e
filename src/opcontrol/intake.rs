//! Controller button dispatch for the intake.
//!
//! One [`IntakeControls::dispatch`] call per driver tick reads the
//! controller and drives the engine's held entry points. Buttons resolve
//! in a fixed priority order, so at most one held behavior is active per
//! tick and every other behavior sees its falling edge the tick a
//! higher-priority button takes over. With nothing held the intake parks.
//!
//! The default bindings match the competition robot: R1 stores, L1 ejects
//! long, Down ejects mid, R2 outtakes, B ejects into the lower mid goal,
//! and X cycles the color sort mode.

use log::{info, warn};
use vexide::{
    controller::{ButtonState, ControllerState},
    prelude::Controller,
};

use crate::intake::{
    engine::ActuationEngine,
    port::{IntakePort, IntakeSensors},
};

/// A physical button on the VEX controller.
#[derive(Debug, Clone, Copy)]
pub enum ControllerButton {
    ButtonA,
    ButtonB,
    ButtonX,
    ButtonY,
    ButtonUp,
    ButtonDown,
    ButtonLeft,
    ButtonRight,
    ButtonL1,
    ButtonL2,
    ButtonR1,
    ButtonR2,
}

/// The held behavior selected for this tick, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeldAction {
    Store,
    LongEject,
    MidEject,
    Outtake,
    LowerEject,
}

/// Button bindings for the intake.
///
/// # Example
///
/// ```ignore
/// use charybdis::opcontrol::intake::{ControllerButton, IntakeControls};
///
/// // Swap store and outtake for a driver who prefers R2 to intake.
/// let controls = IntakeControls {
///     store:   ControllerButton::ButtonR2,
///     outtake: ControllerButton::ButtonR1,
///     ..IntakeControls::default()
/// };
/// ```
pub struct IntakeControls {
    /// Held: stall-aware intake-and-store.
    pub store:       ControllerButton,
    /// Held: color-sorted eject toward the long goal.
    pub long_eject:  ControllerButton,
    /// Held: color-sorted eject toward the upper mid goal.
    pub mid_eject:   ControllerButton,
    /// Held: plain reverse out the intake.
    pub outtake:     ControllerButton,
    /// Held: reverse into the lower mid goal.
    pub lower_eject: ControllerButton,
    /// New press: advance the color sort mode.
    pub mode_cycle:  ControllerButton,
}

impl Default for IntakeControls {
    fn default() -> Self {
        IntakeControls {
            store:       ControllerButton::ButtonR1,
            long_eject:  ControllerButton::ButtonL1,
            mid_eject:   ControllerButton::ButtonDown,
            outtake:     ControllerButton::ButtonR2,
            lower_eject: ControllerButton::ButtonB,
            mode_cycle:  ControllerButton::ButtonX,
        }
    }
}

impl IntakeControls {
    /// Reads the controller once and drives the engine for this tick.
    ///
    /// `power` is the commanded voltage for whichever behavior is active.
    /// On a controller read error the default (all released) state is used
    /// and a warning is logged, so a radio dropout parks the intake rather
    /// than freezing its last command.
    pub fn dispatch<P: IntakePort, S: IntakeSensors>(
        &self,
        engine: &mut ActuationEngine<P, S>,
        controller: &Controller,
        power: f64,
    ) {
        let state = get_state(controller);

        if get_button_state(state, self.mode_cycle).is_now_pressed() {
            let mode = engine.cycle_mode();
            info!("Sort Mode: {:?}", mode);
        }

        let held = if get_button_state(state, self.store).is_pressed() {
            Some(HeldAction::Store)
        } else if get_button_state(state, self.long_eject).is_pressed() {
            Some(HeldAction::LongEject)
        } else if get_button_state(state, self.mid_eject).is_pressed() {
            Some(HeldAction::MidEject)
        } else if get_button_state(state, self.outtake).is_pressed() {
            Some(HeldAction::Outtake)
        } else if get_button_state(state, self.lower_eject).is_pressed() {
            Some(HeldAction::LowerEject)
        } else {
            None
        };

        engine.run_store(held == Some(HeldAction::Store), power);
        engine.run_long_eject(held == Some(HeldAction::LongEject), power);
        engine.run_mid_eject(held == Some(HeldAction::MidEject), power);
        engine.run_outtake(held == Some(HeldAction::Outtake), power);
        engine.run_lower_eject(held == Some(HeldAction::LowerEject), power);

        if held.is_none() {
            engine.park();
        }
    }
}

fn get_button_state(state: ControllerState, button: ControllerButton) -> ButtonState {
    match button {
        ControllerButton::ButtonA => state.button_a,
        ControllerButton::ButtonB => state.button_b,
        ControllerButton::ButtonX => state.button_x,
        ControllerButton::ButtonY => state.button_y,
        ControllerButton::ButtonUp => state.button_up,
        ControllerButton::ButtonDown => state.button_down,
        ControllerButton::ButtonLeft => state.button_left,
        ControllerButton::ButtonRight => state.button_right,
        ControllerButton::ButtonL1 => state.button_l1,
        ControllerButton::ButtonL2 => state.button_l2,
        ControllerButton::ButtonR1 => state.button_r1,
        ControllerButton::ButtonR2 => state.button_r2,
    }
}

fn get_state(controller: &Controller) -> ControllerState {
    controller.state().unwrap_or_else(|e| {
        warn!("Controller State Error: {}", e);
        ControllerState::default()
    })
}
