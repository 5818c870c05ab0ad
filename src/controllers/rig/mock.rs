use std::sync::{Arc, Mutex};

use crate::config::config::{RigCommand, RigState};
use crate::controllers::RigController;
use crate::sequence::MovementStep;

/// In-process stand-in for the rig: applies commands to local state
/// synchronously and records them so tests can assert on dispatch.
/// Clones share the same state and command log.
#[derive(Clone)]
pub struct MockRig {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<RigState>,
    commands: Mutex<Vec<RigCommand>>,
}

impl MockRig {
    pub fn new() -> Self {
        let state = RigState {
            connected: true,
            ..RigState::default()
        };
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                commands: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Every command received, in dispatch order.
    pub fn commands(&self) -> Vec<RigCommand> {
        self.inner.commands.lock().unwrap().clone()
    }

    fn record(&self, command: RigCommand) {
        self.inner.commands.lock().unwrap().push(command);
    }
}

impl Default for MockRig {
    fn default() -> Self {
        Self::new()
    }
}

impl RigController for MockRig {
    fn take_photo(&self) {
        self.record(RigCommand::TakePhoto);
    }

    fn jog_stepper(&self, distance_mm: f32, speed_pct: u8) {
        self.record(RigCommand::JogStepper {
            distance_mm,
            speed_pct,
        });
    }

    fn jog_servo(&self, angle_deg: i32, speed_pct: u8) {
        self.record(RigCommand::JogServo {
            angle_deg,
            speed_pct,
        });
    }

    fn zero_stepper(&self) {
        self.record(RigCommand::ZeroStepper);
    }

    fn enable_stepper(&self, on: bool) {
        self.record(RigCommand::EnableStepper(on));
        self.inner.state.lock().unwrap().stepper_enabled = on;
    }

    fn run_sequence(&self, name: String, steps: Vec<MovementStep>) {
        self.record(RigCommand::RunSequence { name, steps });
    }

    fn pause_sequence(&self) {
        self.record(RigCommand::PauseSequence);
    }

    fn resume_sequence(&self) {
        self.record(RigCommand::ResumeSequence);
    }

    fn stop_sequence(&self) {
        self.record(RigCommand::StopSequence);
    }

    fn state(&self) -> RigState {
        self.inner.state.lock().unwrap().clone()
    }
}
