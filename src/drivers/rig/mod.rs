pub mod facade;
pub mod task;

pub use facade::{CallOutcome, RigApi, RigStatus};
pub use task::rig_control;
