use std::time::Duration;

use crate::sequence::MovementStep;

// The rig boots as a WiFi access point and serves its API on the softAP
// default address.
pub const DEFAULT_RIG_URL: &str = "http://192.168.4.1";

pub const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

// LAN device; a stuck request must not hang the driver loop for long.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub const COMMAND_CHANNEL_DEPTH: usize = 64;

// The firmware keeps sequences only until the next run, so every execute
// recreates one under a throwaway name.
pub const DEFAULT_SEQUENCE_NAME: &str = "TempSequence";

// Row cap for CSV sequence imports.
pub const MAX_SEQUENCE_ROWS: usize = 512;

#[derive(Clone, Debug, PartialEq)]
pub enum RigCommand {
    TakePhoto,
    JogStepper { distance_mm: f32, speed_pct: u8 },
    JogServo { angle_deg: i32, speed_pct: u8 },
    ZeroStepper,
    EnableStepper(bool),
    RunSequence { name: String, steps: Vec<MovementStep> },
    PauseSequence,
    ResumeSequence,
    StopSequence,
}

// Cached state struct used by controllers/clients.
// Keep simple and cloneable for fast UI reads.
#[derive(Clone, Debug)]
pub struct RigState {
    pub connected: bool,
    // Reported by /status only when the rig has an endstop driver fitted.
    pub endstop_min: Option<bool>,
    pub endstop_max: Option<bool>,
    pub stepper_enabled: bool,
    /// A sequence upload/run handoff is in flight.
    pub busy: bool,
    pub last_error: Option<String>,
}

impl Default for RigState {
    fn default() -> Self {
        Self {
            connected: false,
            endstop_min: None,
            endstop_max: None,
            // the firmware enables the stepper driver at boot
            stepper_enabled: true,
            busy: false,
            last_error: None,
        }
    }
}
