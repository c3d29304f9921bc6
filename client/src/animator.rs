//! Plays one action at a time on one avatar's pose.
//!
//! The animator is idle until [`ActionAnimator::start`] begins a run. Every
//! [`ActionAnimator::tick`] poses the skeleton for the run's progress at the
//! given time, and the tick that reaches the end finishes the run:
//!
//! - locomotion keeps where it went, the displayed root becomes the persistent
//!   root;
//! - everything else settles back to the rest pose on the persistent root once
//!   the category's settle delay has passed. Sit-ups keep their seated pose.
//!
//! The completion callback fires once for every run that reaches its end. A
//! run replaced by another start, or cancelled by [`ActionAnimator::stop`],
//! never completes.

use crate::{pose::PoseState, settings::AnimationSettings};
use anim::humanoid::{self, RunContext, SkeletonAttr};
use common::{
    action, current_phase, resources::Time, ActionDescriptor, ActionKind, Category, PhaseInfo,
    PhaseTemplate,
};
use std::rc::Rc;
use tracing::{debug, trace};

/// A run that reached its end.
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    pub avatar: String,
    /// The id the run was started with.
    pub action: String,
    pub kind: Option<ActionKind>,
    pub finished_at: Time,
}

pub type CompletionCallback = Rc<dyn Fn(&Completion)>;

#[derive(Clone, Debug)]
struct AnimationRun {
    action: String,
    descriptor: ActionDescriptor,
    start: Time,
    template: PhaseTemplate,
    phase_index: usize,
    start_ori: f32,
    base: anim::Bone,
}

impl AnimationRun {
    fn progress(&self, now: Time) -> f32 {
        let progress = now.since(self.start) / self.descriptor.duration_secs();
        if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0) as f32
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct PendingSettle {
    due: Time,
    keep_terminal_pose: bool,
}

pub struct ActionAnimator {
    avatar: String,
    pose: PoseState,
    s_a: SkeletonAttr,
    settings: AnimationSettings,
    run: Option<AnimationRun>,
    settle: Option<PendingSettle>,
    on_complete: Option<CompletionCallback>,
}

impl ActionAnimator {
    pub fn new(
        avatar: impl Into<String>,
        pose: PoseState,
        s_a: SkeletonAttr,
        settings: AnimationSettings,
    ) -> Self {
        Self {
            avatar: avatar.into(),
            pose,
            s_a,
            settings,
            run: None,
            settle: None,
            on_complete: None,
        }
    }

    pub fn set_completion_callback(&mut self, callback: Option<CompletionCallback>) {
        self.on_complete = callback;
    }

    pub fn pose(&self) -> &PoseState { &self.pose }

    /// Direct access to the pose. Changes to the displayed skeleton are
    /// overwritten by the next tick of a running action.
    pub fn pose_mut(&mut self) -> &mut PoseState { &mut self.pose }

    pub fn skeleton_attr(&self) -> &SkeletonAttr { &self.s_a }

    pub fn is_animating(&self) -> bool { self.run.is_some() }

    /// Whether a finished run is still waiting to settle.
    pub fn is_settling(&self) -> bool { self.settle.is_some() }

    /// Id of the running action.
    pub fn current_action(&self) -> Option<&str> { self.run.as_ref().map(|run| run.action.as_str()) }

    pub fn current_kind(&self) -> Option<ActionKind> {
        self.run.as_ref().and_then(|run| run.descriptor.kind)
    }

    /// Progress of the running action at `now`, in `[0, 1]`.
    pub fn progress(&self, now: Time) -> Option<f32> { self.run.as_ref().map(|run| run.progress(now)) }

    pub fn phase(&self, now: Time) -> Option<PhaseInfo> {
        self.run
            .as_ref()
            .map(|run| current_phase(&run.template, run.progress(now)))
    }

    /// Starts playing `action` from its beginning, replacing whatever was
    /// playing. Unknown actions breathe in place for the default duration.
    pub fn start(&mut self, action: &str, now: Time) {
        let descriptor = action::descriptor(action);
        if descriptor.kind.is_none() {
            debug!(avatar = %self.avatar, ?action, "Unknown action, breathing in place");
        }
        if let Some(previous) = &self.run {
            debug!(avatar = %self.avatar, previous = %previous.action, next = ?action, "Replacing running action");
        }
        // Whatever the interrupted run displayed is dropped with it
        self.settle = None;
        self.pose.snap_root();

        self.run = Some(AnimationRun {
            action: action.trim().to_owned(),
            descriptor,
            start: now,
            template: PhaseTemplate::for_action(&descriptor),
            phase_index: 0,
            start_ori: self.pose.ori.yaw(),
            base: self.pose.persistent_root(),
        });
        trace!(avatar = %self.avatar, ?action, duration_ms = descriptor.duration_ms, "Started action");
    }

    /// Advances the animator to `now`. Returns the completion of a run that
    /// reached its end on this tick.
    pub fn tick(&mut self, now: Time) -> Option<Completion> {
        if let Some(settle) = self.settle {
            if now >= settle.due {
                self.settle = None;
                self.settle_pose(settle.keep_terminal_pose);
            }
        }

        let progress = self.pose_run(now)?;
        (progress >= 1.0).then(|| self.complete(now))
    }

    /// Ends the running action at its final pose right away, as if it had run
    /// its full duration.
    pub fn finish(&mut self, now: Time) -> Option<Completion> {
        let run = self.run.as_ref()?;
        let end = run.start.add_seconds(run.descriptor.duration_secs());
        self.pose_run(end);
        Some(self.complete(now))
    }

    /// Cancels the running action and any pending settle, dropping straight
    /// back to the rest pose on the persistent root. Nothing completes.
    pub fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            debug!(avatar = %self.avatar, action = %run.action, "Stopped action");
        }
        self.settle = None;
        self.pose.reset_joints();
        self.pose.snap_root();
    }

    /// Poses the skeleton for the running action at `at`, returning the
    /// progress it was posed at.
    fn pose_run(&mut self, at: Time) -> Option<f32> {
        let run = self.run.as_mut()?;
        let progress = run.progress(at);
        let phase = current_phase(&run.template, progress);
        if phase.index != run.phase_index {
            trace!(avatar = %self.avatar, action = %run.action, phase = phase.name(), "Entering phase");
            run.phase_index = phase.index;
        }

        let ctx = RunContext {
            phase,
            base: run.base,
            start_ori: run.start_ori,
            duration: run.descriptor.duration_secs() as f32,
        };
        self.pose.skeleton =
            humanoid::animate(run.descriptor.kind, self.pose.rest(), &ctx, progress, &self.s_a);
        Some(progress)
    }

    fn complete(&mut self, now: Time) -> Completion {
        let run = self.run.take();
        let (action, descriptor) = run
            .map(|run| (run.action, run.descriptor))
            .unwrap_or_else(|| (String::new(), ActionDescriptor::DEFAULT));
        let keep_terminal_pose = descriptor.kind.is_some_and(ActionKind::keeps_terminal_pose);

        match self.settings.settle_delay(descriptor.category) {
            None => {
                debug_assert_eq!(descriptor.category, Category::Movement);
                self.pose.commit_root();
            },
            Some(0) => self.settle_pose(keep_terminal_pose),
            Some(delay) => {
                self.settle = Some(PendingSettle {
                    due: now.add_millis(f64::from(delay)),
                    keep_terminal_pose,
                });
            },
        }

        debug!(avatar = %self.avatar, %action, "Finished action");
        let completion = Completion {
            avatar: self.avatar.clone(),
            action,
            kind: descriptor.kind,
            finished_at: now,
        };
        if let Some(on_complete) = &self.on_complete {
            on_complete(&completion);
        }
        completion
    }

    fn settle_pose(&mut self, keep_terminal_pose: bool) {
        if keep_terminal_pose {
            // Stay seated where the avatar is
            let root = &mut self.pose.skeleton.root;
            root.position.x = self.pose.pos.0.x;
            root.position.z = self.pose.pos.0.z;
        } else {
            self.pose.reset_joints();
            self.pose.snap_root();
        }
        trace!(avatar = %self.avatar, "Settled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anim::vek::*;
    use approx::assert_relative_eq;
    use common::comp::{Ori, Pos};
    use std::{cell::RefCell, f32::consts::PI};

    fn animator(yaw: f32) -> ActionAnimator {
        let s_a = SkeletonAttr::default();
        ActionAnimator::new(
            "robot_1",
            PoseState::new(Pos(Vec3::new(10.0, 0.0, 20.0)), Ori::from_yaw(yaw), &s_a),
            s_a,
            AnimationSettings::default(),
        )
    }

    fn recording(anim: &mut ActionAnimator) -> Rc<RefCell<Vec<Completion>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        anim.set_completion_callback(Some(Rc::new(move |c: &Completion| {
            sink.borrow_mut().push(c.clone())
        })));
        log
    }

    #[test]
    fn progress_is_clamped() {
        let mut anim = animator(0.0);
        anim.start("wave", Time(1.0));
        assert_eq!(anim.progress(Time(0.0)), Some(0.0));
        assert_relative_eq!(anim.progress(Time(2.75)).unwrap(), 0.5);
        assert_eq!(anim.progress(Time(100.0)), Some(1.0));
        assert_eq!(anim.progress(Time(f64::NAN)), Some(0.0));
        assert_eq!(anim.phase(Time(2.75)).map(|p| p.name()), Some("hold"));
    }

    #[test]
    fn settles_after_delay() {
        let mut anim = animator(0.0);
        let log = recording(&mut anim);
        anim.start("bow", Time(0.0));
        anim.tick(Time(2.0));
        assert!(!anim.pose().is_at_rest(1e-3));

        let done = anim.tick(Time(4.0));
        assert_eq!(done.map(|c| c.action), Some("bow".to_owned()));
        assert!(!anim.is_animating());
        assert!(anim.is_settling());
        assert_eq!(log.borrow().len(), 1);

        anim.tick(Time(4.2));
        assert!(anim.is_settling());
        anim.tick(Time(4.31));
        assert!(!anim.is_settling());
        assert!(anim.pose().is_at_rest(0.0));
        assert_eq!(anim.pose().displayed_root(), &anim.pose().persistent_root());
        assert_eq!(log.borrow().len(), 1);
    }

    /// Plays `action` to its end at `finish` and checks it is still settling
    /// just before `delay` has passed, and standing at rest just after.
    fn settles_once(action: &str, finish: f64, delay: f64) -> ActionAnimator {
        let mut anim = animator(0.0);
        anim.start(action, Time(0.0));
        assert!(anim.tick(Time(finish)).is_some());
        assert!(anim.is_settling());

        anim.tick(Time(finish + delay - 0.05));
        assert!(anim.is_settling());
        anim.tick(Time(finish + delay + 0.01));
        assert!(!anim.is_settling());
        assert!(anim.pose().is_at_rest(0.0));
        assert_eq!(anim.pose().displayed_root(), &anim.pose().persistent_root());
        anim
    }

    #[test]
    fn dance_settles_after_a_second() {
        let anim = settles_once("dance", 2.0, 1.0);
        assert_eq!(anim.skeleton_attr(), &SkeletonAttr::default());
        let rest = humanoid::HumanoidSkeleton::rest(anim.skeleton_attr());
        assert!(anim.pose().skeleton.joints_eq(&rest, 0.0));
    }

    #[test]
    fn combat_settles_quickly() { settles_once("punch", 2.0, 0.2); }

    #[test]
    fn exercise_settles_after_half_a_second() { settles_once("squat", 1.0, 0.5); }

    #[test]
    fn movement_commits_its_root() {
        let mut anim = animator(PI / 2.0);
        anim.start("go_forward", Time(0.0));
        anim.tick(Time(1.0));
        // Nothing is committed mid-run
        assert_eq!(anim.pose().pos.0, Vec3::new(10.0, 0.0, 20.0));

        assert!(anim.tick(Time(3.5)).is_some());
        assert_relative_eq!(anim.pose().pos.0.x, 40.0, epsilon = 1e-4);
        assert_relative_eq!(anim.pose().pos.0.z, 20.0, epsilon = 1e-4);
        assert!(!anim.is_settling());
    }

    #[test]
    fn turn_left_from_zero() {
        let mut anim = animator(0.0);
        anim.start("turn_left", Time(0.0));
        anim.tick(Time(2.0));
        assert_relative_eq!(anim.pose().displayed_root().rotation.y, -PI / 4.0, epsilon = 1e-5);
        anim.tick(Time(4.0));
        assert_relative_eq!(anim.pose().ori.yaw(), -PI / 2.0, epsilon = 1e-5);

        // Turning again continues from the new facing
        anim.start("turn_left", Time(5.0));
        anim.tick(Time(9.0));
        assert_relative_eq!(anim.pose().ori.yaw(), -PI, epsilon = 1e-5);
    }

    #[test]
    fn sit_ups_stay_seated() {
        let mut anim = animator(0.0);
        anim.start("sit_ups", Time(0.0));
        anim.tick(Time(12.0));
        anim.tick(Time(13.0));
        let pose = anim.pose();
        assert!(!anim.is_settling());
        assert_relative_eq!(pose.displayed_root().position.y, -15.0);
        assert_relative_eq!(pose.skeleton.torso.rotation.x, PI / 6.0);
        assert_eq!(pose.displayed_root().position.x, 10.0);
        assert_eq!(pose.displayed_root().position.z, 20.0);
        // The persistent root never sat down
        assert_eq!(pose.pos.0.y, 0.0);
    }

    #[test]
    fn replacing_a_run_never_completes_it() {
        let mut anim = animator(0.0);
        let log = recording(&mut anim);
        anim.start("dance_two", Time(0.0));
        anim.tick(Time(10.0));
        anim.start("wave", Time(10.0));
        anim.tick(Time(13.5));
        anim.tick(Time(100.0));
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, "wave");
    }

    #[test]
    fn new_run_cancels_pending_settle() {
        let mut anim = animator(0.0);
        anim.start("punch", Time(0.0));
        anim.tick(Time(2.0));
        assert!(anim.is_settling());
        anim.start("go_forward", Time(2.1));
        assert!(!anim.is_settling());
        anim.tick(Time(2.5));
        assert!(anim.is_animating());
    }

    #[test]
    fn stop_drops_to_rest_without_completing() {
        let mut anim = animator(0.0);
        let log = recording(&mut anim);
        anim.start("go_backward", Time(0.0));
        anim.tick(Time(1.7));
        anim.stop();
        assert!(!anim.is_animating());
        assert!(anim.pose().is_at_rest(0.0));
        assert_eq!(anim.pose().displayed_root().position, Vec3::new(10.0, 0.0, 20.0));
        assert!(anim.tick(Time(10.0)).is_none());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn finish_jumps_to_the_end() {
        let mut anim = animator(0.0);
        anim.start("turn_right", Time(0.0));
        let done = anim.finish(Time(0.5));
        assert_eq!(done.map(|c| c.kind), Some(Some(ActionKind::TurnRight)));
        assert_relative_eq!(anim.pose().ori.yaw(), PI / 2.0, epsilon = 1e-5);
        assert!(anim.finish(Time(0.6)).is_none());
    }

    #[test]
    fn unknown_action_breathes_for_default_duration() {
        let mut anim = animator(0.0);
        anim.start("moonwalk", Time(0.0));
        assert_eq!(anim.current_kind(), None);
        assert!(anim.tick(Time(1.9)).is_none());
        let done = anim.tick(Time(2.0));
        assert_eq!(done.map(|c| c.action), Some("moonwalk".to_owned()));
    }

    #[test]
    fn ticks_are_idempotent() {
        let mut anim = animator(0.3);
        anim.start("turn_right", Time(0.0));
        anim.tick(Time(1.3));
        let first = anim.pose().clone();
        anim.tick(Time(1.3));
        assert_eq!(anim.pose(), &first);
    }
}
