pub mod rig;

// Trait interface for non-blocking UI calls.
// Command methods enqueue work; the query method returns cached state.
use crate::config::config::RigState;
use crate::sequence::MovementStep;

pub trait RigController: Send + Sync {
    // Fire-and-forget: enqueue a device command; returns immediately.
    fn take_photo(&self);
    fn jog_stepper(&self, distance_mm: f32, speed_pct: u8);
    fn jog_servo(&self, angle_deg: i32, speed_pct: u8);
    fn zero_stepper(&self);
    fn enable_stepper(&self, on: bool);
    fn run_sequence(&self, name: String, steps: Vec<MovementStep>);
    fn pause_sequence(&self);
    fn resume_sequence(&self);
    fn stop_sequence(&self);
    // Snapshot of cached rig state.
    fn state(&self) -> RigState;
}
