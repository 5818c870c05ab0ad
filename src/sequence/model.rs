use thiserror::Error;

/// One unit of motion within a sequence: linear travel plus an angular
/// target, an optional pause afterwards, and whether both axes move at once.
/// Immutable once queued.
#[derive(Clone, Debug, PartialEq)]
pub struct MovementStep {
    /// Signed millimeters of rail travel.
    pub distance_mm: f32,
    /// Linear speed, percent of maximum [0, 100].
    pub speed: u8,
    /// Absolute tilt target in degrees (the rig clamps to 0-180).
    pub angle: i32,
    /// Rotational speed, percent of maximum [0, 100].
    pub angle_speed: u8,
    /// Delay after the step, milliseconds.
    pub pause_ms: u32,
    /// Run rail and tilt motion concurrently instead of one after the other.
    pub simultaneous: bool,
}

/// Raw entry-field contents as typed by the operator. Nothing reaches the
/// step list until `parse` accepts every field.
#[derive(Clone, Debug)]
pub struct StepFields {
    pub distance: String,
    pub speed: String,
    pub angle: String,
    pub angle_speed: String,
    pub pause: String,
    pub simultaneous: bool,
}

impl Default for StepFields {
    fn default() -> Self {
        // same starting values the manual-control sliders use
        Self {
            distance: "0".into(),
            speed: "50".into(),
            angle: "90".into(),
            angle_speed: "50".into(),
            pause: "0".into(),
            simultaneous: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum StepParseError {
    #[error("'{value}' is not a valid number for {field}")]
    BadNumber { field: &'static str, value: String },
    #[error("{field} must be between 0 and 100, got {value}")]
    SpeedOutOfRange { field: &'static str, value: i64 },
}

impl StepFields {
    /// Validate every field and produce a step, or reject without side
    /// effects. Distances accept fractions; the rest are integers.
    pub fn parse(&self) -> Result<MovementStep, StepParseError> {
        let distance_mm = parse_distance("distance", &self.distance)?;
        let speed = parse_percent("speed", &self.speed)?;
        let angle = parse_int("angle", &self.angle)? as i32;
        let angle_speed = parse_percent("angle speed", &self.angle_speed)?;
        let pause_raw = parse_int("pause", &self.pause)?;
        if !(0..=i64::from(u32::MAX)).contains(&pause_raw) {
            return Err(StepParseError::BadNumber {
                field: "pause",
                value: self.pause.trim().to_string(),
            });
        }

        Ok(MovementStep {
            distance_mm,
            speed,
            angle,
            angle_speed,
            pause_ms: pause_raw as u32,
            simultaneous: self.simultaneous,
        })
    }
}

fn parse_distance(field: &'static str, value: &str) -> Result<f32, StepParseError> {
    let trimmed = value.trim();
    match trimmed.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(StepParseError::BadNumber {
            field,
            value: trimmed.to_string(),
        }),
    }
}

fn parse_int(field: &'static str, value: &str) -> Result<i64, StepParseError> {
    let trimmed = value.trim();
    trimmed.parse::<i64>().map_err(|_| StepParseError::BadNumber {
        field,
        value: trimmed.to_string(),
    })
}

fn parse_percent(field: &'static str, value: &str) -> Result<u8, StepParseError> {
    let v = parse_int(field, value)?;
    if !(0..=100).contains(&v) {
        return Err(StepParseError::SpeedOutOfRange { field, value: v });
    }
    Ok(v as u8)
}
