use common::{action, ActionKind};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum::{Display, EnumIter, EnumString};

/// Predefined runs of actions.
#[derive(
    Copy, Clone, Debug, Display, EnumIter, EnumString, PartialEq, Eq, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Sequence {
    /// Every dance, shortest routine first.
    Dance,
    Combat,
    /// A workout ending with getting up off the floor.
    Exercise,
    /// Walks a lap and turns back to the starting facing.
    Movement,
    /// One action of each category, from the shortest to the longest.
    Demo,
}

impl Sequence {
    pub fn actions(self) -> &'static [ActionKind] {
        use ActionKind::*;
        match self {
            Sequence::Dance => &[
                Dance, DanceTwo, DanceFive, DanceSeven, DanceSix, DanceThree, DanceFour,
                DanceNine, DanceEight, DanceTen,
            ],
            Sequence::Combat => &[
                Punch,
                Kick,
                RightUppercut,
                LeftUppercut,
                RightKick,
                LeftKick,
                WingChun,
                KungFu,
                RightShotFast,
                LeftShotFast,
            ],
            Sequence::Exercise => &[
                JumpingJacks,
                Squat,
                SquatUp,
                Chest,
                Weightlifting,
                PushUps,
                SitUps,
                StandUpBack,
            ],
            Sequence::Movement => &[
                Stepping,
                GoForward,
                TurnRight,
                GoForward,
                TurnRight,
                GoBackward,
                RightMoveFast,
                LeftMoveFast,
                BackFast,
                TurnLeft,
                TurnLeft,
            ],
            Sequence::Demo => &[Squat, Punch, Celebrate, GoForward, Chest, DanceTwo],
        }
    }

    /// Milliseconds the whole sequence plays for.
    pub fn duration_ms(self) -> u32 {
        self.actions()
            .iter()
            .map(|kind| kind.descriptor().duration_ms)
            .sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueStatus {
    /// Actions waiting, not counting the one playing.
    pub len: usize,
    pub processing: Option<String>,
    pub next: Option<String>,
    /// Catalog time left in the waiting actions.
    pub remaining_ms: u32,
}

/// Plays actions one after the other on a single avatar. An action is handed
/// out once the previous one completed.
#[derive(Clone, Debug, Default)]
pub struct ActionQueue {
    pending: VecDeque<String>,
    processing: Option<String>,
}

impl ActionQueue {
    pub fn push(&mut self, action: impl Into<String>) { self.pending.push_back(action.into()); }

    /// Queues every action of `sequence` and returns how long it plays for, in
    /// milliseconds.
    pub fn push_sequence(&mut self, sequence: Sequence) -> u32 {
        self.pending
            .extend(sequence.actions().iter().map(|kind| kind.id().to_owned()));
        sequence.duration_ms()
    }

    /// Hands out the next action unless one is still playing.
    pub fn next_ready(&mut self) -> Option<String> {
        if self.processing.is_some() {
            return None;
        }
        let next = self.pending.pop_front()?;
        self.processing = Some(next.clone());
        Some(next)
    }

    /// Marks the playing action as done, returning it.
    pub fn complete(&mut self) -> Option<String> { self.processing.take() }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing = None;
    }

    pub fn is_idle(&self) -> bool { self.processing.is_none() && self.pending.is_empty() }

    pub fn status(&self) -> QueueStatus {
        QueueStatus {
            len: self.pending.len(),
            processing: self.processing.clone(),
            next: self.pending.front().cloned(),
            remaining_ms: self.pending.iter().map(|id| action::duration_of(id)).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn sequence_durations() {
        assert_eq!(Sequence::Combat.duration_ms(), 24_000);
        assert_eq!(Sequence::Demo.duration_ms(), 1000 + 2000 + 3000 + 3500 + 9000 + 52_000);
        assert!(Sequence::Dance.duration_ms() > 10 * 60 * 1000);
        assert_eq!(Sequence::from_str("Movement"), Ok(Sequence::Movement));
    }

    #[test]
    fn movement_lap_faces_forward_again() {
        let arc = Sequence::Movement.actions().iter().fold(0.0_f32, |arc, kind| {
            arc + anim::humanoid::movement::turn_arc(*kind).unwrap_or(0.0)
        });
        assert!(arc.abs() < 1e-6);
    }

    #[test]
    fn one_at_a_time() {
        let mut queue = ActionQueue::default();
        assert_eq!(queue.push_sequence(Sequence::Demo), 70_500);
        assert_eq!(queue.next_ready().as_deref(), Some("squat"));
        assert_eq!(queue.next_ready(), None);

        let status = queue.status();
        assert_eq!(status.len, 5);
        assert_eq!(status.processing.as_deref(), Some("squat"));
        assert_eq!(status.next.as_deref(), Some("punch"));
        assert_eq!(status.remaining_ms, 69_500);

        assert_eq!(queue.complete().as_deref(), Some("squat"));
        assert_eq!(queue.next_ready().as_deref(), Some("punch"));
        queue.clear();
        assert!(queue.is_idle());
        assert_eq!(queue.next_ready(), None);
    }

    #[test]
    fn every_sequence_uses_known_actions() {
        for sequence in Sequence::iter() {
            assert!(!sequence.actions().is_empty());
            assert!(sequence.duration_ms() > 0);
        }
    }
}
