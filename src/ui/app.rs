/************** UI Module ********************/

// Single-window egui panel: connectivity indicator, photo trigger, manual
// jog controls, and the sequence composer. All device work is enqueued on
// the controller; this thread only reads snapshots.

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use eframe::egui::{Color32, RichText};

use crate::config::config::DEFAULT_SEQUENCE_NAME;
use crate::controllers::RigController;
use crate::sequence::{MovementStep, SequenceBuilder, StepFields};
use crate::ui::notify::{NoticeKind, Notifier};

#[cfg(feature = "mock")]
use crate::controllers::rig::MockRig;
#[cfg(not(feature = "mock"))]
use crate::config::config::{RigState, COMMAND_CHANNEL_DEPTH};
#[cfg(not(feature = "mock"))]
use crate::controllers::rig::RigClient;
#[cfg(not(feature = "mock"))]
use crate::drivers::rig::{rig_control, RigApi};
#[cfg(not(feature = "mock"))]
use std::sync::RwLock;
#[cfg(not(feature = "mock"))]
use tokio::sync::mpsc;

const CONNECTED_COLOR: Color32 = Color32::from_rgb(0x2e, 0xa0, 0x43);
const DISCONNECTED_COLOR: Color32 = Color32::from_rgb(0xc9, 0x3c, 0x37);

pub struct AppUI {
    rig: Box<dyn RigController>,
    notifier: Arc<Notifier>,

    // manual control values; used only for the next jog call
    stepper_distance: f32,
    stepper_speed: u8,
    servo_angle: i32,
    servo_speed: u8,

    step_fields: StepFields,
    builder: SequenceBuilder,
    // two-phase clear guard: first click arms, second clears
    pending_clear: bool,
}

impl AppUI {
    pub fn new(base_url: &str, poll_interval: Duration, preloaded: Vec<MovementStep>) -> Self {
        let notifier = Arc::new(Notifier::new());
        let rig = Self::spawn_controller(base_url, poll_interval, &notifier);
        let mut app = Self::with_controller(rig, notifier);
        for step in preloaded {
            app.builder.push(step);
        }
        app
    }

    /// Wire up an existing controller; the entry point for tests.
    pub fn with_controller(rig: Box<dyn RigController>, notifier: Arc<Notifier>) -> Self {
        Self {
            rig,
            notifier,
            stepper_distance: 0.0,
            stepper_speed: 50,
            servo_angle: 90,
            servo_speed: 50,
            step_fields: StepFields::default(),
            builder: SequenceBuilder::new(),
            pending_clear: false,
        }
    }

    #[cfg(feature = "mock")]
    fn spawn_controller(
        _base_url: &str,
        _poll_interval: Duration,
        _notifier: &Arc<Notifier>,
    ) -> Box<dyn RigController> {
        Box::new(MockRig::new())
    }

    #[cfg(not(feature = "mock"))]
    fn spawn_controller(
        base_url: &str,
        poll_interval: Duration,
        notifier: &Arc<Notifier>,
    ) -> Box<dyn RigController> {
        let state = Arc::new(RwLock::new(RigState::default()));
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CHANNEL_DEPTH);
        let api = RigApi::new(base_url);
        tokio::spawn(rig_control(
            api,
            cmd_rx,
            Arc::clone(&state),
            Arc::clone(notifier),
            poll_interval,
        ));
        Box::new(RigClient::new(cmd_tx, state))
    }

    fn add_step(&mut self) {
        match self.step_fields.parse() {
            Ok(step) => {
                let count = self.builder.push(step);
                self.notifier
                    .show(format!("Movement added ({count} queued)"), NoticeKind::Success);
            }
            Err(e) => {
                self.notifier.show(format!("Error: {e}"), NoticeKind::Error);
            }
        }
    }

    fn request_clear(&mut self) {
        if !self.builder.is_empty() {
            self.pending_clear = true;
        }
    }

    fn confirm_clear(&mut self) {
        self.builder.clear();
        self.pending_clear = false;
        self.notifier.show("Sequence cleared", NoticeKind::Info);
    }

    fn cancel_clear(&mut self) {
        self.pending_clear = false;
    }

    fn execute_sequence(&mut self) {
        if self.builder.is_empty() {
            self.notifier
                .show("No movements to execute", NoticeKind::Error);
            return;
        }
        self.rig.run_sequence(
            DEFAULT_SEQUENCE_NAME.to_string(),
            self.builder.steps().to_vec(),
        );
    }
}

impl eframe::App for AppUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let rig_state = self.rig.state();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.with_layout(
                egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                |ui| {
                    ui.heading("Camera Slider Control Panel");
                },
            );
        });

        egui::TopBottomPanel::bottom("message_area").show(ctx, |ui| {
            if let Some(notice) = self.notifier.current() {
                let (bg, fg) = notice.kind.colors();
                egui::Frame::none()
                    .fill(bg)
                    .inner_margin(egui::Margin::same(6.0))
                    .show(ui, |ui| {
                        ui.colored_label(fg, &notice.text);
                    });
            } else {
                ui.label("");
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if rig_state.connected {
                    ui.label(RichText::new("\u{25cf} Connected").color(CONNECTED_COLOR));
                } else {
                    ui.label(RichText::new("\u{25cf} Disconnected").color(DISCONNECTED_COLOR));
                }
                if rig_state.endstop_min == Some(true) {
                    ui.label("[min endstop]");
                }
                if rig_state.endstop_max == Some(true) {
                    ui.label("[max endstop]");
                }
                if let Some(err) = &rig_state.last_error {
                    ui.label(RichText::new(err).color(DISCONNECTED_COLOR));
                }
            });

            // capture only while the rig reports its camera link up
            if ui
                .add_enabled(rig_state.connected, egui::Button::new("Take photo"))
                .clicked()
            {
                self.rig.take_photo();
            }

            ui.separator();
            ui.heading("Manual control");

            ui.add(
                egui::Slider::new(&mut self.stepper_distance, -100.0..=100.0)
                    .suffix(" mm")
                    .text("rail distance"),
            );
            ui.add(
                egui::Slider::new(&mut self.stepper_speed, 0..=100)
                    .suffix("%")
                    .text("rail speed"),
            );
            ui.horizontal(|ui| {
                if ui.button("Move stepper").clicked() {
                    self.rig
                        .jog_stepper(self.stepper_distance, self.stepper_speed);
                }
                if ui.button("Zero position").clicked() {
                    self.rig.zero_stepper();
                }
                let mut enabled = rig_state.stepper_enabled;
                if ui.checkbox(&mut enabled, "driver enabled").changed() {
                    self.rig.enable_stepper(enabled);
                }
            });

            ui.add(
                egui::Slider::new(&mut self.servo_angle, 0..=180)
                    .suffix("\u{b0}")
                    .text("tilt angle"),
            );
            ui.add(
                egui::Slider::new(&mut self.servo_speed, 0..=100)
                    .suffix("%")
                    .text("tilt speed"),
            );
            if ui.button("Move servo").clicked() {
                self.rig.jog_servo(self.servo_angle, self.servo_speed);
            }

            ui.separator();
            ui.heading("Sequence");

            egui::Grid::new("step_fields").num_columns(2).show(ui, |ui| {
                ui.label("distance (mm)");
                ui.text_edit_singleline(&mut self.step_fields.distance);
                ui.end_row();
                ui.label("speed (%)");
                ui.text_edit_singleline(&mut self.step_fields.speed);
                ui.end_row();
                ui.label("angle (\u{b0})");
                ui.text_edit_singleline(&mut self.step_fields.angle);
                ui.end_row();
                ui.label("angle speed (%)");
                ui.text_edit_singleline(&mut self.step_fields.angle_speed);
                ui.end_row();
                ui.label("pause (ms)");
                ui.text_edit_singleline(&mut self.step_fields.pause);
                ui.end_row();
            });
            ui.checkbox(&mut self.step_fields.simultaneous, "simultaneous");

            ui.horizontal(|ui| {
                if ui.button("Add movement").clicked() {
                    self.add_step();
                }
                if self.pending_clear {
                    if ui.button("Confirm clear").clicked() {
                        self.confirm_clear();
                    }
                    if ui.button("Cancel").clicked() {
                        self.cancel_clear();
                    }
                } else if ui
                    .add_enabled(!self.builder.is_empty(), egui::Button::new("Clear"))
                    .clicked()
                {
                    self.request_clear();
                }
                if ui
                    .add_enabled(!rig_state.busy, egui::Button::new("Execute"))
                    .clicked()
                {
                    self.execute_sequence();
                }
            });

            ui.label(format!("{} movement(s)", self.builder.len()));
            for line in self.builder.describe() {
                ui.label(line);
            }

            ui.horizontal(|ui| {
                if ui.button("Pause").clicked() {
                    self.rig.pause_sequence();
                }
                if ui.button("Resume").clicked() {
                    self.rig.resume_sequence();
                }
                if ui.button("Stop").clicked() {
                    self.rig.stop_sequence();
                }
            });
        });

        // keep poll results and message expiry rendering without input events
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}
