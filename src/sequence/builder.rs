use super::model::MovementStep;

pub const EMPTY_LIST_LINE: &str = "No movements queued";

/// Ordered list of movement steps assembled locally before a run.
/// Insertion order is execution order.
#[derive(Debug, Default)]
pub struct SequenceBuilder {
    steps: Vec<MovementStep>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a validated step; returns the new count.
    pub fn push(&mut self, step: MovementStep) -> usize {
        self.steps.push(step);
        self.steps.len()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[MovementStep] {
        &self.steps
    }

    /// Empty the list. Clearing an empty list is a no-op; the interactive
    /// confirm guard lives with the caller.
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Display lines, one per step, or the empty-state line.
    /// Purely presentational; execution never reads these.
    pub fn describe(&self) -> Vec<String> {
        if self.steps.is_empty() {
            return vec![EMPTY_LIST_LINE.to_string()];
        }
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| describe_step(i, step))
            .collect()
    }
}

fn describe_step(index: usize, step: &MovementStep) -> String {
    let mut line = format!(
        "#{} {}mm @ {}% | {}\u{b0} @ {}%",
        index + 1,
        step.distance_mm,
        step.speed,
        step.angle,
        step.angle_speed
    );
    if step.simultaneous {
        line.push_str(" [simul]");
    }
    if step.pause_ms > 0 {
        line.push_str(&format!(" [pause {}ms]", step.pause_ms));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(distance_mm: f32) -> MovementStep {
        MovementStep {
            distance_mm,
            speed: 50,
            angle: 90,
            angle_speed: 30,
            pause_ms: 0,
            simultaneous: false,
        }
    }

    #[test]
    fn push_appends_in_order_and_counts() {
        let mut b = SequenceBuilder::new();
        assert_eq!(b.push(step(10.0)), 1);
        assert_eq!(b.push(step(-5.0)), 2);
        assert_eq!(b.len(), 2);
        assert_eq!(b.steps()[0].distance_mm, 10.0);
        assert_eq!(b.steps()[1].distance_mm, -5.0);
    }

    #[test]
    fn clear_empties_the_list() {
        let mut b = SequenceBuilder::new();
        b.push(step(1.0));
        b.push(step(2.0));
        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.len(), 0);
    }

    #[test]
    fn clear_on_empty_is_a_noop() {
        let mut b = SequenceBuilder::new();
        b.clear();
        assert!(b.is_empty());
    }

    #[test]
    fn describe_empty_shows_empty_state() {
        let b = SequenceBuilder::new();
        assert_eq!(b.describe(), vec![EMPTY_LIST_LINE.to_string()]);
    }

    #[test]
    fn describe_formats_positions_and_rates() {
        let mut b = SequenceBuilder::new();
        b.push(step(10.0));
        let lines = b.describe();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "#1 10mm @ 50% | 90\u{b0} @ 30%");
    }

    #[test]
    fn describe_annotates_pause_and_simultaneous() {
        let mut b = SequenceBuilder::new();
        b.push(MovementStep {
            distance_mm: -5.0,
            speed: 20,
            angle: 45,
            angle_speed: 40,
            pause_ms: 500,
            simultaneous: true,
        });
        b.push(step(3.0));
        let lines = b.describe();
        assert_eq!(lines[0], "#1 -5mm @ 20% | 45\u{b0} @ 40% [simul] [pause 500ms]");
        assert_eq!(lines[1], "#2 3mm @ 50% | 90\u{b0} @ 30%");
    }
}
