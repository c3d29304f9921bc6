use common::{msg::AngleUnit, Category};
use serde::{Deserialize, Serialize};

/// Milliseconds between a run finishing and its joints settling back to the
/// rest pose, per category. Movement never settles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleDelays {
    pub dance: u32,
    pub combat: u32,
    pub exercise: u32,
    pub basic: u32,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            dance: 1000,
            combat: 200,
            exercise: 500,
            basic: 300,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Snapshots moving an avatar less than this on the ground plane are
    /// ignored.
    pub position_threshold: f32,
    /// Snapshots turning an avatar less than this many radians are ignored.
    pub rotation_threshold: f32,
    pub settle_delays: SettleDelays,
    /// Unit of the angles the session sends.
    pub wire_angles: AngleUnit,
    pub avatar_scale: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            position_threshold: 5.0,
            rotation_threshold: 0.1,
            settle_delays: SettleDelays::default(),
            wire_angles: AngleUnit::Degrees,
            avatar_scale: 1.0,
        }
    }
}

impl AnimationSettings {
    /// Delay in milliseconds before a finished run of `category` settles, or
    /// `None` if the run's end pose is kept.
    pub fn settle_delay(&self, category: Category) -> Option<u32> {
        let delays = &self.settle_delays;
        match category {
            Category::Dance => Some(delays.dance),
            Category::Combat => Some(delays.combat),
            Category::Exercise => Some(delays.exercise),
            Category::Basic => Some(delays.basic),
            Category::Movement => None,
        }
    }
}
