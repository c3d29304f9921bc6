//! The catalog of actions an avatar can play.
//!
//! Every action has exactly one [`ActionDescriptor`] holding its duration and
//! its [`Category`]. The category is fixed here, when the table is written,
//! and is never re-derived from the action name afterwards.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Duration used for any action id that is not in the catalog.
pub const DEFAULT_DURATION_MS: u32 = 2000;

/// The id sent by the session when an avatar is not doing anything.
pub const IDLE_ID: &str = "idle";

/// Not an action: cancels whatever the avatar is playing.
pub const STOP_ID: &str = "stop";

#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    EnumString,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dance,
    Combat,
    Exercise,
    Movement,
    Basic,
}

#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    // Dances
    Dance,
    DanceTwo,
    DanceThree,
    DanceFour,
    DanceFive,
    DanceSix,
    DanceSeven,
    DanceEight,
    DanceNine,
    DanceTen,
    // Locomotion
    Stepping,
    RightMoveFast,
    LeftMoveFast,
    BackFast,
    GoForward,
    GoBackward,
    TurnRight,
    TurnLeft,
    // Combat
    RightKick,
    LeftKick,
    RightUppercut,
    LeftUppercut,
    WingChun,
    RightShotFast,
    LeftShotFast,
    KungFu,
    Kick,
    Punch,
    // Exercise
    Chest,
    SquatUp,
    Squat,
    PushUps,
    SitUps,
    Weightlifting,
    JumpingJacks,
    // Basic gestures
    Twist,
    StandUpBack,
    StandUpFront,
    Bow,
    Wave,
    Jump,
    Celebrate,
    Think,
    Idle,
}

/// Immutable catalog entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// `None` only for the fallback descriptor.
    pub kind: Option<ActionKind>,
    pub id: &'static str,
    pub duration_ms: u32,
    pub category: Category,
}

impl ActionDescriptor {
    pub const DEFAULT: Self = Self {
        kind: None,
        id: "default",
        duration_ms: DEFAULT_DURATION_MS,
        category: Category::Basic,
    };

    pub fn duration_secs(&self) -> f64 { f64::from(self.duration_ms) / 1000.0 }
}

fn entry(kind: ActionKind, id: &'static str, secs: f32, category: Category) -> ActionDescriptor {
    ActionDescriptor {
        kind: Some(kind),
        id,
        duration_ms: (secs * 1000.0) as u32,
        category,
    }
}

impl ActionKind {
    /// Case-insensitive lookup of a catalog id such as `"dance_two"`.
    pub fn from_id(id: &str) -> Option<Self> { Self::from_str(id.trim()).ok() }

    pub fn id(self) -> &'static str { self.into() }

    pub fn iter_all() -> impl Iterator<Item = Self> { Self::iter() }

    pub fn descriptor(self) -> ActionDescriptor {
        use ActionKind::*;
        use Category as C;
        match self {
            Dance => entry(self, "dance", 2.0, C::Dance),
            DanceTwo => entry(self, "dance_two", 52.0, C::Dance),
            DanceThree => entry(self, "dance_three", 70.0, C::Dance),
            DanceFour => entry(self, "dance_four", 83.0, C::Dance),
            DanceFive => entry(self, "dance_five", 59.0, C::Dance),
            DanceSix => entry(self, "dance_six", 69.0, C::Dance),
            DanceSeven => entry(self, "dance_seven", 67.0, C::Dance),
            DanceEight => entry(self, "dance_eight", 85.0, C::Dance),
            DanceNine => entry(self, "dance_nine", 84.0, C::Dance),
            DanceTen => entry(self, "dance_ten", 85.0, C::Dance),

            Stepping => entry(self, "stepping", 3.0, C::Movement),
            RightMoveFast => entry(self, "right_move_fast", 3.0, C::Movement),
            LeftMoveFast => entry(self, "left_move_fast", 3.0, C::Movement),
            BackFast => entry(self, "back_fast", 4.5, C::Movement),
            GoForward => entry(self, "go_forward", 3.5, C::Movement),
            GoBackward => entry(self, "go_backward", 3.5, C::Movement),
            TurnRight => entry(self, "turn_right", 4.0, C::Movement),
            TurnLeft => entry(self, "turn_left", 4.0, C::Movement),

            RightKick => entry(self, "right_kick", 2.0, C::Combat),
            LeftKick => entry(self, "left_kick", 2.0, C::Combat),
            RightUppercut => entry(self, "right_uppercut", 2.0, C::Combat),
            LeftUppercut => entry(self, "left_uppercut", 2.0, C::Combat),
            WingChun => entry(self, "wing_chun", 2.0, C::Combat),
            RightShotFast => entry(self, "right_shot_fast", 4.0, C::Combat),
            LeftShotFast => entry(self, "left_shot_fast", 4.0, C::Combat),
            KungFu => entry(self, "kung_fu", 2.0, C::Combat),
            Kick => entry(self, "kick", 2.0, C::Combat),
            Punch => entry(self, "punch", 2.0, C::Combat),

            Chest => entry(self, "chest", 9.0, C::Exercise),
            SquatUp => entry(self, "squat_up", 6.0, C::Exercise),
            Squat => entry(self, "squat", 1.0, C::Exercise),
            PushUps => entry(self, "push_ups", 9.0, C::Exercise),
            SitUps => entry(self, "sit_ups", 12.0, C::Exercise),
            Weightlifting => entry(self, "weightlifting", 9.0, C::Exercise),
            JumpingJacks => entry(self, "jumping_jacks", 3.0, C::Exercise),

            Twist => entry(self, "twist", 4.0, C::Basic),
            StandUpBack => entry(self, "stand_up_back", 5.0, C::Basic),
            StandUpFront => entry(self, "stand_up_front", 5.0, C::Basic),
            Bow => entry(self, "bow", 4.0, C::Basic),
            Wave => entry(self, "wave", 3.5, C::Basic),
            Jump => entry(self, "jump", 2.0, C::Basic),
            Celebrate => entry(self, "celebrate", 3.0, C::Basic),
            Think => entry(self, "think", 2.0, C::Basic),
            Idle => entry(self, "idle", 1.0, C::Basic),
        }
    }

    pub fn category(self) -> Category { self.descriptor().category }

    pub fn is_movement(self) -> bool { self.category() == Category::Movement }

    /// Actions whose natural end state is not standing. The finish step keeps
    /// their terminal pose instead of restoring the rest pose.
    pub fn keeps_terminal_pose(self) -> bool { matches!(self, ActionKind::SitUps) }
}

/// Look up the descriptor for `id`, falling back to
/// [`ActionDescriptor::DEFAULT`].
pub fn descriptor(id: &str) -> ActionDescriptor {
    ActionKind::from_id(id).map_or(ActionDescriptor::DEFAULT, ActionKind::descriptor)
}

pub fn duration_of(id: &str) -> u32 { descriptor(id).duration_ms }

pub fn category_of(id: &str) -> Category { descriptor(id).category }

/// Whether `id` is the session's "nothing to do" marker.
pub fn is_idle_id(id: &str) -> bool { id.trim().is_empty() || id.trim().eq_ignore_ascii_case(IDLE_ID) }

pub fn is_stop_id(id: &str) -> bool { id.trim().eq_ignore_ascii_case(STOP_ID) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_actions_fall_back() {
        for id in ["", "moonwalk", "dance_eleven", "stop", "stand"] {
            assert_eq!(duration_of(id), DEFAULT_DURATION_MS);
            assert_eq!(category_of(id), Category::Basic);
            assert_eq!(descriptor(id).kind, None);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(ActionKind::from_id("Dance_Two"), Some(ActionKind::DanceTwo));
        assert_eq!(ActionKind::from_id(" KUNG_FU "), Some(ActionKind::KungFu));
        assert_eq!(duration_of("GO_FORWARD"), 3500);
        assert_eq!(duration_of("back_fast"), 4500);
    }

    #[test]
    fn every_action_round_trips_its_id() {
        for kind in ActionKind::iter_all() {
            let desc = kind.descriptor();
            assert_eq!(desc.kind, Some(kind));
            assert_eq!(desc.id, kind.id());
            assert_eq!(ActionKind::from_id(desc.id), Some(kind));
            assert!(desc.duration_ms > 0);
        }
        assert_eq!(ActionKind::iter_all().count(), 44);
    }

    #[test]
    fn movement_category() {
        let movement = ActionKind::iter_all()
            .filter(|k| k.is_movement())
            .map(ActionKind::id)
            .collect::<Vec<_>>();
        assert_eq!(movement, [
            "stepping",
            "right_move_fast",
            "left_move_fast",
            "back_fast",
            "go_forward",
            "go_backward",
            "turn_right",
            "turn_left",
        ]);
        assert_eq!(category_of("dance_ten"), Category::Dance);
        assert_eq!(category_of("wing_chun"), Category::Combat);
        assert_eq!(category_of("sit_ups"), Category::Exercise);
    }

    #[test]
    fn idle_marker() {
        assert!(is_idle_id("idle"));
        assert!(is_idle_id("IDLE"));
        assert!(is_idle_id(""));
        assert!(!is_idle_id("wave"));
        assert!(is_stop_id(" Stop"));
        assert!(!is_stop_id("stepping"));
    }
}
