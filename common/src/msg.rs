//! Messages exchanged with the remote session.
//!
//! Inbound payloads are parsed leniently: a snapshot never fails to parse,
//! missing or wrongly typed numbers read as 0 and unknown fields are ignored.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use vek::*;

/// Robot id the session understands as "every robot".
pub const BROADCAST_ID: &str = "all";

/// Joint rotations smaller than this (in wire units, on every axis) are
/// treated as "no rotation".
pub const BODY_PART_EPSILON: f32 = 0.1;

/// Unit of angles on the wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    pub fn to_radians(self, v: Vec3<f32>) -> Vec3<f32> {
        match self {
            AngleUnit::Degrees => v.map(f32::to_radians),
            AngleUnit::Radians => v,
        }
    }
}

/// A single robot's state as pushed by the session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub robot_id: Option<String>,
    pub position: Option<Vec3<f32>>,
    /// Radians, converted from the wire unit on parse.
    pub rotation: Option<Vec3<f32>>,
    pub color: Option<Rgb<u8>>,
    pub current_action: Option<String>,
    pub action_progress: Option<f32>,
    /// Joint rotations in radians, keyed by wire joint name. Only joints with a
    /// noticeable rotation are kept; `Some` whenever the snapshot carries the
    /// field, so an empty list means every joint is back at neutral.
    pub body_parts: Option<Vec<(String, Vec3<f32>)>>,
}

impl Snapshot {
    pub fn from_value(value: &Value, unit: AngleUnit) -> Self {
        let Some(obj) = value.as_object() else {
            debug!(?value, "Snapshot is not an object, ignoring its contents");
            return Self::default();
        };

        let body_parts = obj
            .get("body_parts")
            .and_then(Value::as_object)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|(name, rot)| {
                        let rot = parse_vec3(rot)?;
                        (rot.map(f32::abs).reduce_partial_max() > BODY_PART_EPSILON)
                            .then(|| (name.clone(), unit.to_radians(rot)))
                    })
                    .collect()
            });

        Self {
            robot_id: obj.get("robot_id").and_then(Value::as_str).map(str::to_owned),
            position: field_vec3(obj, "position"),
            rotation: field_vec3(obj, "rotation").map(|r| unit.to_radians(r)),
            color: obj.get("color").and_then(Value::as_str).and_then(parse_color),
            current_action: obj
                .get("current_action")
                .and_then(Value::as_str)
                .map(str::to_owned),
            action_progress: obj.get("action_progress").map(number),
            body_parts,
        }
    }
}

/// Absent and `null` fields are `None`; anything else present reads as a
/// vector, with non-numeric components as 0.
fn field_vec3(obj: &Map<String, Value>, key: &str) -> Option<Vec3<f32>> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => Some(parse_vec3(v).unwrap_or_else(|| {
            debug!(?key, ?v, "Malformed vector in snapshot, using zero");
            Vec3::zero()
        })),
    }
}

/// Accepts `[x, y, z]` or `{"x": .., "y": .., "z": ..}`.
pub fn parse_vec3(value: &Value) -> Option<Vec3<f32>> {
    match value {
        Value::Array(a) => Some(Vec3::new(
            a.first().map_or(0.0, number),
            a.get(1).map_or(0.0, number),
            a.get(2).map_or(0.0, number),
        )),
        Value::Object(o) => Some(Vec3::new(
            o.get("x").map_or(0.0, number),
            o.get("y").map_or(0.0, number),
            o.get("z").map_or(0.0, number),
        )),
        _ => None,
    }
}

fn number(value: &Value) -> f32 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0) as f32,
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Parses `#rrggbb`.
pub fn parse_color(s: &str) -> Option<Rgb<u8>> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionResult {
    pub status: String,
    pub robot_id: Option<String>,
    pub action: Option<String>,
    pub message: Option<String>,
}

impl ActionResult {
    pub fn is_success(&self) -> bool { self.status.eq_ignore_ascii_case("success") }
}

/// Messages sent from the session to this client.
#[derive(Clone, Debug, PartialEq)]
pub enum ServerMsg {
    RobotStates(HashMap<String, Snapshot>),
    ActionResult(ActionResult),
    RobotAdded(Snapshot),
    RobotRemoved(String),
    RobotsReset(HashMap<String, Snapshot>),
}

impl ServerMsg {
    /// Decodes every recognised envelope key of a JSON object. Unknown keys are
    /// skipped.
    pub fn from_value(value: &Value, unit: AngleUnit) -> Vec<Self> {
        let Some(obj) = value.as_object() else {
            debug!(?value, "Ignoring non-object server message");
            return Vec::new();
        };
        obj.iter()
            .filter_map(|(key, body)| Self::from_envelope(key, body, unit))
            .collect()
    }

    pub fn parse(text: &str, unit: AngleUnit) -> Result<Vec<Self>, serde_json::Error> {
        let value = serde_json::from_str::<Value>(text)?;
        Ok(Self::from_value(&value, unit))
    }

    fn from_envelope(key: &str, body: &Value, unit: AngleUnit) -> Option<Self> {
        let states = |body: &Value| -> HashMap<String, Snapshot> {
            body.as_object()
                .map(|robots| {
                    robots
                        .iter()
                        .map(|(id, snap)| (id.clone(), Snapshot::from_value(snap, unit)))
                        .collect()
                })
                .unwrap_or_default()
        };
        Some(match key {
            "robot_states" => ServerMsg::RobotStates(states(body)),
            "robots_reset" => ServerMsg::RobotsReset(states(body)),
            "robot_added" => ServerMsg::RobotAdded(Snapshot::from_value(body, unit)),
            "robot_removed" => ServerMsg::RobotRemoved(match body {
                Value::String(id) => id.clone(),
                other => other.get("robot_id")?.as_str()?.to_owned(),
            }),
            "action_result" => ServerMsg::ActionResult(
                serde_json::from_value(body.clone()).unwrap_or_else(|error| {
                    debug!(?error, "Malformed action result");
                    ActionResult::default()
                }),
            ),
            other => {
                debug!(?other, "Unknown server message");
                return None;
            },
        })
    }
}

/// Requests sent from this client to the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientMsg {
    RunAction {
        session_key: String,
        robot_id: String,
        action: String,
    },
    ResetSession {
        session_key: String,
    },
}

impl ClientMsg {
    pub fn to_json(&self) -> Result<String, serde_json::Error> { serde_json::to_string(self) }
}
