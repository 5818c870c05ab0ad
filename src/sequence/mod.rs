pub mod builder;
pub mod model;
pub mod parse;

pub use builder::SequenceBuilder;
pub use model::{MovementStep, StepFields, StepParseError};
pub use parse::load_sequence_from_csv_path;
