/**
 * HTTP facade for the slider rig.
 *
 * One method per firmware endpoint. Every outcome is normalized into
 * `CallOutcome` so callers never see transport details: a network-level
 * failure (unreachable, timeout, malformed body) becomes a failure with a
 * generic connection-error message, and a device-reported failure carries
 * whatever `message` the firmware attached. No retries anywhere.
 */
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::config::{CONNECT_TIMEOUT, REQUEST_TIMEOUT};
use crate::sequence::MovementStep;

pub const CONNECTION_ERROR_MSG: &str = "connection error";

/// Uniform result of one device call.
#[derive(Clone, Debug, PartialEq)]
pub struct CallOutcome {
    pub ok: bool,
    pub message: Option<String>,
}

impl CallOutcome {
    fn success() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }

    fn device_failure(message: Option<String>) -> Self {
        Self {
            ok: false,
            message,
        }
    }
}

/// Latest connectivity snapshot from `/status`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RigStatus {
    pub connected: bool,
    pub endstop_min: Option<bool>,
    pub endstop_max: Option<bool>,
}

#[derive(Deserialize)]
struct StatusResponse {
    #[serde(default)]
    connected: bool,
    endstop_min: Option<bool>,
    endstop_max: Option<bool>,
}

// A missing `success` field counts as failure.
#[derive(Deserialize)]
struct AckResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

#[derive(Deserialize)]
struct CreateResponse {
    #[serde(default)]
    success: bool,
    index: Option<u32>,
}

#[derive(Serialize)]
struct JogStepperQuery {
    distance: f32,
    speed: u8,
}

#[derive(Serialize)]
struct JogServoQuery {
    angle: i32,
    speed: u8,
}

#[derive(Serialize)]
struct EnableQuery {
    value: bool,
}

#[derive(Serialize)]
struct ExecuteQuery {
    index: u32,
}

#[derive(Serialize)]
struct CreateForm<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct AddMovementForm {
    seq: u32,
    distance: f32,
    speed: u8,
    angle: i32,
    #[serde(rename = "angleSpeed")]
    angle_speed: u8,
    simultaneous: bool,
    pause: u32,
}

pub struct RigApi {
    base: String,
    http: reqwest::Client,
}

impl RigApi {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Poll connectivity. Fails closed: any transport or parse error is
    /// reported as disconnected, never as an error to the caller.
    pub async fn status(&self) -> RigStatus {
        let resp = match self.http.get(self.url("/status")).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("status poll failed: {e}");
                return RigStatus::default();
            }
        };
        match resp.json::<StatusResponse>().await {
            Ok(s) => RigStatus {
                connected: s.connected,
                endstop_min: s.endstop_min,
                endstop_max: s.endstop_max,
            },
            Err(e) => {
                warn!("malformed status response: {e}");
                RigStatus::default()
            }
        }
    }

    pub async fn take_photo(&self) -> CallOutcome {
        self.ack(self.http.get(self.url("/photo"))).await
    }

    /// Jog the rail. Distance is signed (direction), speed is a percent.
    pub async fn jog_stepper(&self, distance_mm: f32, speed_pct: u8) -> CallOutcome {
        let query = JogStepperQuery {
            distance: distance_mm,
            speed: speed_pct,
        };
        self.ack(self.http.get(self.url("/stepper")).query(&query)).await
    }

    /// Move the tilt head to an absolute angle.
    pub async fn jog_servo(&self, angle_deg: i32, speed_pct: u8) -> CallOutcome {
        let query = JogServoQuery {
            angle: angle_deg,
            speed: speed_pct,
        };
        self.ack(self.http.get(self.url("/servo")).query(&query)).await
    }

    /// Recalibrate the rail origin to the current position.
    pub async fn zero_stepper(&self) -> CallOutcome {
        self.ack(self.http.get(self.url("/stepper/zero"))).await
    }

    pub async fn enable_stepper(&self, on: bool) -> CallOutcome {
        let query = EnableQuery { value: on };
        self.ack(self.http.get(self.url("/stepper/enable")).query(&query))
            .await
    }

    /// Create a device-side sequence; the returned index is the opaque
    /// handle for the add/execute calls of this one run.
    pub async fn create_sequence(&self, name: &str) -> Result<u32, CallOutcome> {
        let req = self
            .http
            .post(self.url("/sequence/create"))
            .form(&CreateForm { name });
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("sequence create failed: {e}");
                return Err(CallOutcome::failure(CONNECTION_ERROR_MSG));
            }
        };
        match resp.json::<CreateResponse>().await {
            Ok(CreateResponse {
                success: true,
                index: Some(index),
            }) => Ok(index),
            Ok(_) => Err(CallOutcome::failure("could not create sequence")),
            Err(e) => {
                warn!("malformed create response: {e}");
                Err(CallOutcome::failure(CONNECTION_ERROR_MSG))
            }
        }
    }

    pub async fn add_movement(&self, seq: u32, step: &MovementStep) -> CallOutcome {
        let form = AddMovementForm {
            seq,
            distance: step.distance_mm,
            speed: step.speed,
            angle: step.angle,
            angle_speed: step.angle_speed,
            simultaneous: step.simultaneous,
            pause: step.pause_ms,
        };
        self.ack(self.http.post(self.url("/sequence/add")).form(&form))
            .await
    }

    /// Start device-side playback. Returns as soon as the firmware
    /// acknowledges; playback progress is not observed.
    pub async fn execute_sequence(&self, index: u32) -> CallOutcome {
        let query = ExecuteQuery { index };
        self.ack(self.http.get(self.url("/sequence/execute")).query(&query))
            .await
    }

    pub async fn pause_sequence(&self) -> CallOutcome {
        self.ack(self.http.get(self.url("/sequence/pause"))).await
    }

    pub async fn resume_sequence(&self) -> CallOutcome {
        self.ack(self.http.get(self.url("/sequence/resume"))).await
    }

    pub async fn stop_sequence(&self) -> CallOutcome {
        self.ack(self.http.get(self.url("/sequence/stop"))).await
    }

    /// Drive the whole run protocol: create, then one add per step in list
    /// order, then execute. Steps are dispatched strictly sequentially --
    /// the firmware appends movements in arrival order and its tolerance
    /// for unordered arrival is unverified. A failed add aborts the run at
    /// that step; movements already uploaded are not rolled back.
    pub async fn run_sequence(&self, name: &str, steps: &[MovementStep]) -> CallOutcome {
        let index = match self.create_sequence(name).await {
            Ok(index) => index,
            Err(outcome) => return outcome,
        };

        for (pos, step) in steps.iter().enumerate() {
            let outcome = self.add_movement(index, step).await;
            if !outcome.ok {
                let detail = outcome
                    .message
                    .unwrap_or_else(|| "device rejected the movement".into());
                return CallOutcome::failure(format!(
                    "upload failed at step {}: {}",
                    pos + 1,
                    detail
                ));
            }
        }

        self.execute_sequence(index).await
    }

    async fn ack(&self, req: reqwest::RequestBuilder) -> CallOutcome {
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("rig request failed: {e}");
                return CallOutcome::failure(CONNECTION_ERROR_MSG);
            }
        };
        match resp.json::<AckResponse>().await {
            Ok(AckResponse { success: true, .. }) => CallOutcome::success(),
            Ok(AckResponse { message, .. }) => CallOutcome::device_failure(message),
            Err(e) => {
                warn!("malformed rig response: {e}");
                CallOutcome::failure(CONNECTION_ERROR_MSG)
            }
        }
    }
}
