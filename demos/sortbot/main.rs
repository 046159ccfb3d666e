//! A minimal competition program wiring the intake engine to real
//! hardware: feed rollers on ports 19/18, indexer on 17, optical sensor on
//! 10, pistons on ADI F/A/H.

use std::time::Duration;

use charybdis::{
    fs::logger,
    intake::{
        classify::ModeHandle,
        engine::{ActuationEngine, EngineConfig},
        port::V5Intake,
    },
    opcontrol::intake::IntakeControls,
    tasking::TaskSupervisor,
};
use log::LevelFilter;
use vexide::prelude::*;

struct Robot {
    controller: Controller,
    engine:     ActuationEngine<V5Intake, V5Intake>,
    controls:   IntakeControls,
}

impl Compete for Robot {
    async fn autonomous(&mut self) {
        // Load from the match loader until a piece seats, then score while
        // sorting out the other alliance's pieces.
        self.engine.start_store(12.0);
        sleep(Duration::from_millis(1500)).await;

        self.engine.start_sort_eject(12.0);
        sleep(Duration::from_millis(2500)).await;

        self.engine.stop();
    }

    async fn driver(&mut self) {
        loop {
            self.controls
                .dispatch(&mut self.engine, &self.controller, 12.0);
            sleep(Controller::UPDATE_INTERVAL).await;
        }
    }
}

#[vexide::main]
async fn main(peripherals: Peripherals) {
    let _ = logger::init(LevelFilter::Info);

    let rig = V5Intake::new(
        [
            Motor::new(peripherals.port_19, Gearset::Blue, Direction::Forward),
            Motor::new(peripherals.port_18, Gearset::Blue, Direction::Forward),
        ],
        Motor::new(peripherals.port_17, Gearset::Blue, Direction::Forward),
        AdiDigitalOut::new(peripherals.adi_f),
        AdiDigitalOut::new(peripherals.adi_a),
        AdiDigitalOut::new(peripherals.adi_h),
        OpticalSensor::new(peripherals.port_10),
    );
    rig.configure();

    let robot = Robot {
        controller: peripherals.primary_controller,
        engine:     ActuationEngine::new(
            rig.clone(),
            rig,
            TaskSupervisor::new(),
            ModeHandle::default(),
            EngineConfig::default(),
        ),
        controls:   IntakeControls::default(),
    };

    robot.compete().await;
}
