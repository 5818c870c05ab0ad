use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;

use crate::config::config::{RigCommand, RigState};
use crate::controllers::RigController;
use crate::sequence::MovementStep;

pub struct RigClient {
    cmd_tx: mpsc::Sender<RigCommand>,
    state: Arc<RwLock<RigState>>, // cached state
}

impl RigClient {
    pub fn new(cmd_tx: mpsc::Sender<RigCommand>, state: Arc<RwLock<RigState>>) -> Self {
        Self { cmd_tx, state }
    }

    fn enqueue(&self, command: RigCommand) {
        if let Err(e) = self.cmd_tx.try_send(command) {
            let mut s = self.state.write().unwrap();
            s.last_error = Some(format!("send failed: {}", e));
        }
    }
}

impl RigController for RigClient {
    fn take_photo(&self) {
        self.enqueue(RigCommand::TakePhoto);
    }

    fn jog_stepper(&self, distance_mm: f32, speed_pct: u8) {
        self.enqueue(RigCommand::JogStepper {
            distance_mm,
            speed_pct,
        });
    }

    fn jog_servo(&self, angle_deg: i32, speed_pct: u8) {
        self.enqueue(RigCommand::JogServo {
            angle_deg,
            speed_pct,
        });
    }

    fn zero_stepper(&self) {
        self.enqueue(RigCommand::ZeroStepper);
    }

    fn enable_stepper(&self, on: bool) {
        self.enqueue(RigCommand::EnableStepper(on));
    }

    fn run_sequence(&self, name: String, steps: Vec<MovementStep>) {
        self.enqueue(RigCommand::RunSequence { name, steps });
    }

    fn pause_sequence(&self) {
        self.enqueue(RigCommand::PauseSequence);
    }

    fn resume_sequence(&self) {
        self.enqueue(RigCommand::ResumeSequence);
    }

    fn stop_sequence(&self) {
        self.enqueue(RigCommand::StopSequence);
    }

    fn state(&self) -> RigState {
        self.state.read().unwrap().clone()
    }
}
