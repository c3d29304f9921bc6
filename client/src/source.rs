//! The session the fleet plays for.

use crate::{avatar::AvatarDescriptor, error::Error};
use common::msg::{AngleUnit, ClientMsg, ServerMsg, BROADCAST_ID};
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Delivers the session's messages and takes the client's requests.
pub trait ActionSource {
    /// Messages that arrived since the last poll, oldest first.
    fn poll(&mut self) -> Vec<ServerMsg>;

    fn send(&mut self, msg: ClientMsg) -> Result<(), Error>;
}

/// In-process stand-in for a remote session: acknowledges every request and
/// reports the requested action back in a state update, the way a session
/// echoes actions to every client watching it.
///
/// Replies go through the JSON wire format, so they parse exactly like
/// messages from a remote session.
pub struct Loopback {
    robots: Vec<AvatarDescriptor>,
    unit: AngleUnit,
    inbox: VecDeque<ServerMsg>,
    sent: Vec<ClientMsg>,
}

impl Loopback {
    pub fn new(robots: Vec<AvatarDescriptor>, unit: AngleUnit) -> Self {
        Self {
            robots,
            unit,
            inbox: VecDeque::new(),
            sent: Vec::new(),
        }
    }

    /// Every request sent so far.
    pub fn sent(&self) -> &[ClientMsg] { &self.sent }

    /// Queues a raw message as if the session had sent it.
    pub fn push_json(&mut self, text: &str) -> Result<(), Error> {
        let msgs = ServerMsg::parse(text, self.unit)?;
        self.inbox.extend(msgs);
        Ok(())
    }

    fn push_value(&mut self, value: &Value) {
        self.inbox.extend(ServerMsg::from_value(value, self.unit));
    }

    fn snapshot(&self, robot: &AvatarDescriptor) -> Value {
        let yaw = match self.unit {
            AngleUnit::Degrees => robot.yaw.to_degrees(),
            AngleUnit::Radians => robot.yaw,
        };
        json!({
            "robot_id": robot.id,
            "position": [robot.position.x, robot.position.y, robot.position.z],
            "rotation": [0.0, yaw, 0.0],
            "color": format!("#{:02X}{:02X}{:02X}", robot.color.r, robot.color.g, robot.color.b),
            "current_action": "idle",
        })
    }

    fn targets(&self, robot_id: &str) -> Vec<String> {
        self.robots
            .iter()
            .filter(|robot| robot_id == BROADCAST_ID || robot.id == robot_id)
            .map(|robot| robot.id.clone())
            .collect()
    }
}

impl ActionSource for Loopback {
    fn poll(&mut self) -> Vec<ServerMsg> { self.inbox.drain(..).collect() }

    fn send(&mut self, msg: ClientMsg) -> Result<(), Error> {
        let json = msg.to_json()?;
        trace!(%json, "Loopback received");
        match &msg {
            ClientMsg::RunAction {
                robot_id, action, ..
            } => {
                let targets = self.targets(robot_id);
                if targets.is_empty() {
                    debug!(%robot_id, "Loopback has no such robot");
                    self.push_value(&json!({"action_result": {
                        "status": "error",
                        "robot_id": robot_id,
                        "action": action,
                        "message": "unknown robot",
                    }}));
                } else {
                    self.push_value(&json!({"action_result": {
                        "status": "success",
                        "robot_id": robot_id,
                        "action": action,
                    }}));
                    let states = targets
                        .into_iter()
                        .map(|id| (id, json!({"current_action": action})))
                        .collect::<Map<_, _>>();
                    self.push_value(&json!({ "robot_states": states }));
                }
            },
            ClientMsg::ResetSession { .. } => {
                let states = self
                    .robots
                    .iter()
                    .map(|robot| (robot.id.clone(), self.snapshot(robot)))
                    .collect::<Map<_, _>>();
                self.push_value(&json!({ "robots_reset": states }));
            },
        }
        self.sent.push(msg);
        Ok(())
    }
}
