use crate::{
    animator::{ActionAnimator, Completion, CompletionCallback},
    pose::PoseState,
    settings::AnimationSettings,
};
use anim::humanoid::SkeletonAttr;
use common::{
    action,
    comp::{Ori, Pos},
    msg::Snapshot,
    resources::Time,
};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use tracing::{debug, trace};
use vek::*;

/// How an avatar enters the fleet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvatarDescriptor {
    pub id: String,
    pub color: Rgb<u8>,
    pub position: Vec3<f32>,
    /// Facing in radians.
    #[serde(default)]
    pub yaw: f32,
}

impl AvatarDescriptor {
    pub const FALLBACK_COLOR: Rgb<u8> = Rgb {
        r: 0x88,
        g: 0x88,
        b: 0x88,
    };

    pub fn new(id: impl Into<String>, color: Rgb<u8>, position: Vec3<f32>) -> Self {
        Self {
            id: id.into(),
            color,
            position,
            yaw: 0.0,
        }
    }

    /// Two rows of three, facing forward.
    pub fn default_fleet() -> Vec<Self> {
        [
            ((-50.0, 50.0), (0x4a, 0x90, 0xe2)),
            ((0.0, 50.0), (0xe2, 0x4a, 0x90)),
            ((50.0, 50.0), (0x90, 0xe2, 0x4a)),
            ((-50.0, -50.0), (0xe2, 0x90, 0x4a)),
            ((0.0, -50.0), (0x90, 0x4a, 0xe2)),
            ((50.0, -50.0), (0x4a, 0xe2, 0x90)),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, ((x, z), (r, g, b)))| {
            Self::new(format!("robot_{}", i + 1), Rgb::new(r, g, b), Vec3::new(x, 0.0, z))
        })
        .collect()
    }

    pub fn from_snapshot(id: impl Into<String>, snapshot: &Snapshot) -> Self {
        Self {
            id: id.into(),
            color: snapshot.color.unwrap_or(Self::FALLBACK_COLOR),
            position: snapshot.position.unwrap_or_default(),
            yaw: snapshot.rotation.map_or(0.0, |r| r.y),
        }
    }
}

/// What a snapshot changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoteUpdate {
    pub moved: bool,
    pub turned: bool,
    /// The action the snapshot started.
    pub started: Option<String>,
    pub stopped: bool,
}

/// Smallest signed angle taking `from` to `to`.
fn angle_delta(from: f32, to: f32) -> f32 {
    let delta = (to - from).rem_euclid(TAU);
    if delta > PI { delta - TAU } else { delta }
}

/// One avatar of the fleet: its identity and the animator playing its actions.
pub struct AvatarController {
    descriptor: AvatarDescriptor,
    animator: ActionAnimator,
    /// Last action the session reported as running, so that a snapshot
    /// repeating it does not restart it.
    remote_action: Option<String>,
    /// Progress of `remote_action` as last reported by the session.
    remote_progress: Option<f32>,
    position_threshold: f32,
    rotation_threshold: f32,
}

impl AvatarController {
    pub fn new(descriptor: AvatarDescriptor, settings: &AnimationSettings) -> Self {
        let s_a = SkeletonAttr::scaled(settings.avatar_scale);
        let pose = PoseState::new(
            Pos(descriptor.position),
            Ori::from_yaw(descriptor.yaw),
            &s_a,
        );
        Self {
            animator: ActionAnimator::new(descriptor.id.clone(), pose, s_a, settings.clone()),
            descriptor,
            remote_action: None,
            remote_progress: None,
            position_threshold: settings.position_threshold,
            rotation_threshold: settings.rotation_threshold,
        }
    }

    pub fn id(&self) -> &str { &self.descriptor.id }

    pub fn color(&self) -> Rgb<u8> { self.descriptor.color }

    /// The avatar as it entered the fleet.
    pub fn descriptor(&self) -> &AvatarDescriptor { &self.descriptor }

    pub fn pose(&self) -> &PoseState { self.animator.pose() }

    pub fn animator(&self) -> &ActionAnimator { &self.animator }

    pub fn is_animating(&self) -> bool { self.animator.is_animating() }

    pub fn current_action(&self) -> Option<&str> { self.animator.current_action() }

    /// The session's own progress of the action it reports as running, in
    /// `0.0..=1.0`. `None` once it reports the avatar idle or stopped.
    pub fn remote_progress(&self) -> Option<f32> { self.remote_progress }

    pub fn set_completion_callback(&mut self, callback: Option<CompletionCallback>) {
        self.animator.set_completion_callback(callback);
    }

    /// Plays `action`, or stops the running one for `"stop"`.
    pub fn start_action(&mut self, action: &str, now: Time) {
        if action::is_stop_id(action) {
            self.stop();
        } else {
            self.animator.start(action, now);
        }
    }

    pub fn stop(&mut self) { self.animator.stop(); }

    pub fn tick(&mut self, now: Time) -> Option<Completion> { self.animator.tick(now) }

    /// Back to where and how the avatar entered the fleet.
    pub fn reset(&mut self) {
        self.animator.stop();
        self.remote_action = None;
        self.remote_progress = None;
        let pose = self.animator.pose_mut();
        pose.pos = Pos(self.descriptor.position);
        pose.ori = Ori::from_yaw(self.descriptor.yaw);
        pose.snap_root();
    }

    /// Reconciles the avatar with a snapshot from the session.
    ///
    /// Position and rotation only apply when they moved the avatar noticeably.
    /// While an action runs, the animator keeps the displayed root; otherwise
    /// the displayed root follows the persistent root. Joint rotations only
    /// apply to an avatar that is neither animating nor settling, and replace
    /// every joint rotation: joints the snapshot leaves out go back to rest.
    pub fn apply_remote_update(&mut self, snapshot: &Snapshot, now: Time) -> RemoteUpdate {
        let mut update = RemoteUpdate::default();
        let animating = self.animator.is_animating();
        let idle = !animating && !self.animator.is_settling();
        let pose = self.animator.pose_mut();
        let (old_pos, old_ori) = (pose.pos.0, pose.ori.0);

        if let Some(position) = snapshot.position {
            if pose.pos.planar_distance(position) > self.position_threshold {
                pose.pos = Pos(position);
                update.moved = true;
            }
        }
        if let Some(rotation) = snapshot.rotation {
            if angle_delta(pose.ori.yaw(), rotation.y).abs() > self.rotation_threshold {
                pose.ori = Ori(rotation);
                update.turned = true;
            }
        }
        if !animating {
            // Carry whatever offset the displayed root has, e.g. a seated
            // avatar stays seated
            let (new_pos, new_ori) = (pose.pos.0, pose.ori.0);
            let root = &mut pose.skeleton.root;
            root.position += new_pos - old_pos;
            root.rotation += new_ori - old_ori;
        }

        if let (true, Some(parts)) = (idle, &snapshot.body_parts) {
            pose.reset_joint_rotations();
            for (name, rotation) in parts {
                match pose.skeleton.joint_mut(name) {
                    Some(bone) => bone.rotation = *rotation,
                    None => trace!(avatar = %self.descriptor.id, ?name, "Ignoring unknown joint"),
                }
            }
        }

        match snapshot.current_action.as_deref().map(str::trim) {
            Some(remote) if action::is_stop_id(remote) => {
                if self.animator.is_animating() {
                    self.animator.stop();
                    update.stopped = true;
                }
                self.remote_action = None;
                self.remote_progress = None;
            },
            Some(remote) if !action::is_idle_id(remote) => {
                let seen = self
                    .remote_action
                    .as_deref()
                    .is_some_and(|last| last.eq_ignore_ascii_case(remote));
                let running = self
                    .animator
                    .current_action()
                    .is_some_and(|current| current.eq_ignore_ascii_case(remote));
                if !seen && !running {
                    debug!(avatar = %self.descriptor.id, action = %remote, "Session started action");
                    self.animator.start(remote, now);
                    update.started = Some(remote.to_owned());
                }
                self.remote_action = Some(remote.to_owned());
                if let Some(progress) = snapshot.action_progress {
                    self.remote_progress = Some(progress.clamp(0.0, 1.0));
                }
            },
            Some(_) => {
                self.remote_action = None;
                self.remote_progress = None;
            },
            None => {
                if let (Some(_), Some(progress)) = (&self.remote_action, snapshot.action_progress) {
                    self.remote_progress = Some(progress.clamp(0.0, 1.0));
                }
            },
        }

        update
    }
}
