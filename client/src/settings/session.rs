use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Sent with every request so the session can tell clients apart.
    pub session_key: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            session_key: "local".to_owned(),
        }
    }
}
