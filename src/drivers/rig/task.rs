/**
 * Rig control task.
 *
 * Task owns all device I/O. Commands arrive via an mpsc channel and state
 * updates write into `Arc<RwLock<RigState>>` for fast snapshots; the UI
 * must never block. Connectivity is polled on a fixed cadence in the same
 * select loop, with the first poll fired immediately at startup.
 *
 * The loop is serialized: a slow device call delays the next poll tick
 * instead of overlapping it. There is no cancellation for an in-flight
 * call; the task runs until the session ends.
 */
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::config::config::{RigCommand, RigState};
use crate::drivers::rig::facade::{CallOutcome, RigApi};
use crate::ui::notify::{NoticeKind, Notifier};

pub async fn rig_control(
    api: RigApi,
    mut rig_rx: mpsc::Receiver<RigCommand>,
    state: Arc<RwLock<RigState>>,
    notifier: Arc<Notifier>,
    poll_interval: Duration,
) {
    let mut poll = interval(poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            Some(command) = rig_rx.recv() => {
                handle_command(&api, command, &state, &notifier).await;
            }

            _ = poll.tick() => {
                let status = api.status().await;
                debug!(connected = status.connected, "status poll");
                let mut s = state.write().unwrap();
                s.connected = status.connected;
                s.endstop_min = status.endstop_min;
                s.endstop_max = status.endstop_max;
            }
        }
    }
}

async fn handle_command(
    api: &RigApi,
    command: RigCommand,
    state: &Arc<RwLock<RigState>>,
    notifier: &Arc<Notifier>,
) {
    match command {
        RigCommand::TakePhoto => {
            notifier.show("Taking photo...", NoticeKind::Info);
            report(api.take_photo().await, "Photo captured", state, notifier);
        }
        RigCommand::JogStepper {
            distance_mm,
            speed_pct,
        } => {
            notifier.show("Moving stepper...", NoticeKind::Info);
            report(
                api.jog_stepper(distance_mm, speed_pct).await,
                "Stepper move complete",
                state,
                notifier,
            );
        }
        RigCommand::JogServo {
            angle_deg,
            speed_pct,
        } => {
            notifier.show("Moving servo...", NoticeKind::Info);
            report(
                api.jog_servo(angle_deg, speed_pct).await,
                "Servo move complete",
                state,
                notifier,
            );
        }
        RigCommand::ZeroStepper => {
            notifier.show("Zeroing rail position...", NoticeKind::Info);
            report(api.zero_stepper().await, "Rail position zeroed", state, notifier);
        }
        RigCommand::EnableStepper(on) => {
            let outcome = api.enable_stepper(on).await;
            if outcome.ok {
                state.write().unwrap().stepper_enabled = on;
            }
            let done = if on { "Stepper enabled" } else { "Stepper disabled" };
            report(outcome, done, state, notifier);
        }
        RigCommand::RunSequence { name, steps } => {
            notifier.show(
                format!("Uploading sequence ({} steps)...", steps.len()),
                NoticeKind::Info,
            );
            state.write().unwrap().busy = true;
            let outcome = api.run_sequence(&name, &steps).await;
            state.write().unwrap().busy = false;
            report(outcome, "Sequence running", state, notifier);
        }
        RigCommand::PauseSequence => {
            report(api.pause_sequence().await, "Sequence paused", state, notifier);
        }
        RigCommand::ResumeSequence => {
            report(api.resume_sequence().await, "Sequence resumed", state, notifier);
        }
        RigCommand::StopSequence => {
            report(api.stop_sequence().await, "Sequence stopped", state, notifier);
        }
    }
}

fn report(
    outcome: CallOutcome,
    success_text: &str,
    state: &Arc<RwLock<RigState>>,
    notifier: &Arc<Notifier>,
) {
    if outcome.ok {
        state.write().unwrap().last_error = None;
        notifier.show(success_text, NoticeKind::Success);
    } else {
        let detail = outcome
            .message
            .unwrap_or_else(|| "device reported an error".into());
        state.write().unwrap().last_error = Some(detail.clone());
        notifier.show(format!("Error: {detail}"), NoticeKind::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn spawn_task(server_uri: &str) -> (mpsc::Sender<RigCommand>, Arc<RwLock<RigState>>, Arc<Notifier>) {
        let api = RigApi::new(server_uri);
        let state = Arc::new(RwLock::new(RigState::default()));
        let notifier = Arc::new(Notifier::new());
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(rig_control(
            api,
            rx,
            Arc::clone(&state),
            Arc::clone(&notifier),
            Duration::from_millis(50),
        ));
        (tx, state, notifier)
    }

    async fn wait_for<F: Fn() -> bool>(cond: F) {
        for _ in 0..100 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn poll_marks_connected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"connected": true})))
            .mount(&server)
            .await;

        let (_tx, state, _notifier) = spawn_task(&server.uri()).await;
        wait_for(|| state.read().unwrap().connected).await;
    }

    #[tokio::test]
    async fn poll_failure_marks_disconnected() {
        let (_tx, state, _notifier) = spawn_task("http://127.0.0.1:1").await;
        // give the first poll a chance to land
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!state.read().unwrap().connected);
    }

    #[tokio::test]
    async fn photo_command_reports_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"connected": true})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/photo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let (tx, _state, notifier) = spawn_task(&server.uri()).await;
        tx.send(RigCommand::TakePhoto).await.unwrap();
        wait_for(|| {
            notifier
                .current()
                .is_some_and(|n| n.kind == NoticeKind::Success)
        })
        .await;
    }

    #[tokio::test]
    async fn device_failure_surfaces_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"connected": true})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/photo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Bluetooth not connected"
            })))
            .mount(&server)
            .await;

        let (tx, state, notifier) = spawn_task(&server.uri()).await;
        tx.send(RigCommand::TakePhoto).await.unwrap();
        wait_for(|| {
            notifier
                .current()
                .is_some_and(|n| n.kind == NoticeKind::Error && n.text.contains("Bluetooth"))
        })
        .await;
        assert_eq!(
            state.read().unwrap().last_error.as_deref(),
            Some("Bluetooth not connected")
        );
    }
}
