//! The avatars on stage and everything that drives them.
//!
//! Actions started here play locally right away and are forwarded to the
//! session, which stays authoritative: its snapshots are reconciled into the
//! avatars on every [`Fleet::tick`].

use crate::{
    animator::{Completion, CompletionCallback},
    avatar::{AvatarController, AvatarDescriptor},
    error::Error,
    pose::PoseState,
    queue::{ActionQueue, QueueStatus, Sequence},
    scene::{Scene, SceneHandle},
    settings::{AnimationSettings, Settings},
    source::ActionSource,
};
use common::{
    action,
    msg::{ActionResult, ClientMsg, ServerMsg, Snapshot, BROADCAST_ID},
    resources::Time,
};
use hashbrown::HashMap;
use tracing::{debug, info, trace, warn};

/// Most avatars a fleet holds.
pub const MAX_AVATARS: usize = 6;

/// Which avatars a request is for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    All,
    Avatar(String),
}

impl Target {
    /// Parses a session robot id, where `"all"` means every avatar.
    pub fn from_id(id: &str) -> Self {
        if id.trim().eq_ignore_ascii_case(BROADCAST_ID) {
            Target::All
        } else {
            Target::Avatar(id.trim().to_owned())
        }
    }

    /// The robot id the session knows this target by.
    pub fn wire_id(&self) -> &str {
        match self {
            Target::All => BROADCAST_ID,
            Target::Avatar(id) => id,
        }
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self { Self::from_id(id) }
}

pub struct Fleet {
    avatars: Vec<AvatarController>,
    handles: HashMap<String, SceneHandle>,
    queues: HashMap<String, ActionQueue>,
    scene: Option<Box<dyn Scene>>,
    source: Option<Box<dyn ActionSource>>,
    settings: AnimationSettings,
    session_key: String,
    /// Restored on a session reset.
    initial: Vec<AvatarDescriptor>,
    on_complete: Option<CompletionCallback>,
    last_result: Option<ActionResult>,
}

impl Fleet {
    pub fn new(settings: &Settings) -> Self {
        let mut fleet = Self {
            avatars: Vec::new(),
            handles: HashMap::new(),
            queues: HashMap::new(),
            scene: None,
            source: None,
            settings: settings.animation.clone(),
            session_key: settings.session.session_key.clone(),
            initial: settings.avatars.clone(),
            on_complete: None,
            last_result: None,
        };
        for avatar in &settings.avatars {
            if let Err(e) = fleet.add_avatar(avatar.clone()) {
                warn!(?e, id = %avatar.id, "Skipping configured avatar");
            }
        }
        fleet
    }

    /// The six robots of a fresh session, with default settings.
    pub fn with_default_avatars() -> Self { Self::new(&Settings::default()) }

    /// Starts drawing the fleet into `scene`, replacing any previous scene.
    pub fn attach_scene(&mut self, mut scene: Box<dyn Scene>) {
        self.handles = self
            .avatars
            .iter()
            .map(|avatar| (avatar.id().to_owned(), scene.create_avatar(avatar.descriptor())))
            .collect();
        self.scene = Some(scene);
    }

    pub fn detach_scene(&mut self) -> Option<Box<dyn Scene>> {
        self.handles.clear();
        self.scene.take()
    }

    pub fn attach_source(&mut self, source: Box<dyn ActionSource>) { self.source = Some(source); }

    pub fn session_key(&self) -> &str { &self.session_key }

    pub fn len(&self) -> usize { self.avatars.len() }

    pub fn is_empty(&self) -> bool { self.avatars.is_empty() }

    pub fn avatars(&self) -> impl Iterator<Item = &AvatarController> { self.avatars.iter() }

    pub fn avatar(&self, id: &str) -> Option<&AvatarController> {
        self.avatars.iter().find(|avatar| avatar.id() == id)
    }

    fn avatar_mut(&mut self, id: &str) -> Option<&mut AvatarController> {
        self.avatars.iter_mut().find(|avatar| avatar.id() == id)
    }

    pub fn pose(&self, id: &str) -> Option<&PoseState> { self.avatar(id).map(AvatarController::pose) }

    /// The session's answer to the most recent request.
    pub fn last_action_result(&self) -> Option<&ActionResult> { self.last_result.as_ref() }

    pub fn add_avatar(&mut self, descriptor: AvatarDescriptor) -> Result<(), Error> {
        if self.avatar(&descriptor.id).is_some() {
            return Err(Error::DuplicateAvatar(descriptor.id));
        }
        if self.avatars.len() >= MAX_AVATARS {
            return Err(Error::FleetFull);
        }

        let mut avatar = AvatarController::new(descriptor, &self.settings);
        avatar.set_completion_callback(self.on_complete.clone());
        if let Some(scene) = &mut self.scene {
            let handle = scene.create_avatar(avatar.descriptor());
            self.handles.insert(avatar.id().to_owned(), handle);
        }
        debug!(id = %avatar.id(), "Added avatar");
        self.avatars.push(avatar);
        Ok(())
    }

    pub fn remove_avatar(&mut self, id: &str) -> Result<(), Error> {
        let index = self
            .avatars
            .iter()
            .position(|avatar| avatar.id() == id)
            .ok_or_else(|| Error::UnknownAvatar(id.to_owned()))?;
        self.avatars.remove(index);
        self.queues.remove(id);
        if let (Some(scene), Some(handle)) = (&mut self.scene, self.handles.remove(id)) {
            scene.remove_avatar(handle);
        }
        debug!(%id, "Removed avatar");
        Ok(())
    }

    /// Called with every run that completes on any avatar, now and later
    /// added.
    pub fn register_completion_callback(&mut self, callback: CompletionCallback) {
        for avatar in &mut self.avatars {
            avatar.set_completion_callback(Some(callback.clone()));
        }
        self.on_complete = Some(callback);
    }

    /// Plays `action` on `target` and asks the session to do the same.
    /// `"stop"` stops the target instead.
    pub fn start_action(
        &mut self,
        target: impl Into<Target>,
        action: &str,
        now: Time,
    ) -> Result<(), Error> {
        let target = target.into();
        if action::is_stop_id(action) {
            return self.stop_target(&target);
        }
        self.play_locally(&target, action, now)?;
        self.forward(&target, action);
        Ok(())
    }

    /// Stops `id` right away and drops whatever was queued for it.
    pub fn stop_avatar(&mut self, id: &str) -> Result<(), Error> {
        self.stop_target(&Target::Avatar(id.to_owned()))
    }

    fn stop_target(&mut self, target: &Target) -> Result<(), Error> {
        let ids = self.resolve(target)?;
        for id in &ids {
            self.clear_queue(id);
            if let Some(avatar) = self.avatar_mut(id) {
                avatar.stop();
            }
        }
        self.forward(target, action::STOP_ID);
        Ok(())
    }

    fn resolve(&self, target: &Target) -> Result<Vec<String>, Error> {
        match target {
            Target::All => Ok(self.avatars.iter().map(|a| a.id().to_owned()).collect()),
            Target::Avatar(id) => match self.avatar(id) {
                Some(avatar) => Ok(vec![avatar.id().to_owned()]),
                None => Err(Error::UnknownAvatar(id.clone())),
            },
        }
    }

    fn play_locally(&mut self, target: &Target, action: &str, now: Time) -> Result<(), Error> {
        for id in self.resolve(target)? {
            if let Some(avatar) = self.avatar_mut(&id) {
                avatar.start_action(action, now);
            }
        }
        info!(target = %target.wire_id(), %action, "Playing action");
        Ok(())
    }

    fn forward(&mut self, target: &Target, action: &str) {
        self.send(ClientMsg::RunAction {
            session_key: self.session_key.clone(),
            robot_id: target.wire_id().to_owned(),
            action: action.to_owned(),
        });
    }

    fn send(&mut self, msg: ClientMsg) {
        match &mut self.source {
            Some(source) => {
                if let Err(e) = source.send(msg) {
                    warn!(?e, "Failed to reach the session");
                }
            },
            None => trace!(?msg, "No session attached, not forwarding"),
        }
    }

    /// Puts every avatar back where it started and asks the session to reset.
    pub fn reset_session(&mut self) {
        info!("Resetting session");
        for queue in self.queues.values_mut() {
            queue.clear();
        }
        for avatar in &mut self.avatars {
            avatar.reset();
        }
        let missing = self
            .initial
            .iter()
            .filter(|initial| self.avatar(&initial.id).is_none())
            .cloned()
            .collect::<Vec<_>>();
        for descriptor in missing {
            if let Err(e) = self.add_avatar(descriptor) {
                warn!(?e, "Could not restore avatar");
            }
        }
        self.send(ClientMsg::ResetSession {
            session_key: self.session_key.clone(),
        });
    }

    /// Queues `action` on `id`. It starts once everything queued before it
    /// completed. Queuing `"stop"` stops `id` and drops its queue.
    pub fn queue_action(&mut self, id: &str, action: &str, now: Time) -> Result<(), Error> {
        if action::is_stop_id(action) {
            return self.stop_avatar(id);
        }
        self.resolve(&Target::Avatar(id.to_owned()))?;
        self.queues.entry(id.to_owned()).or_default().push(action);
        self.advance_queue(id, now);
        Ok(())
    }

    /// Queues a whole sequence on `id`, returning how long it plays for in
    /// milliseconds.
    pub fn queue_sequence(&mut self, id: &str, sequence: Sequence, now: Time) -> Result<u32, Error> {
        self.resolve(&Target::Avatar(id.to_owned()))?;
        let total = self.queues.entry(id.to_owned()).or_default().push_sequence(sequence);
        info!(%id, %sequence, total_ms = total, "Queued sequence");
        self.advance_queue(id, now);
        Ok(total)
    }

    pub fn clear_queue(&mut self, id: &str) {
        if let Some(queue) = self.queues.get_mut(id) {
            queue.clear();
        }
    }

    pub fn queue_status(&self, id: &str) -> Option<QueueStatus> {
        self.queues.get(id).map(ActionQueue::status)
    }

    /// Whether any avatar is still playing, settling or has queued actions.
    pub fn is_busy(&self) -> bool {
        self.avatars
            .iter()
            .any(|avatar| avatar.is_animating() || avatar.animator().is_settling())
            || self.queues.values().any(|queue| !queue.is_idle())
    }

    fn advance_queue(&mut self, id: &str, now: Time) {
        let Some(next) = self.queues.get_mut(id).and_then(ActionQueue::next_ready) else {
            return;
        };
        let target = Target::Avatar(id.to_owned());
        match self.play_locally(&target, &next, now) {
            Ok(()) => self.forward(&target, &next),
            Err(e) => warn!(?e, %id, "Dropping queued action"),
        }
    }

    /// Advances the whole fleet to `now`: applies what the session sent,
    /// animates every avatar, moves queues along and draws the result.
    /// Returns the runs that completed on this tick.
    pub fn tick(&mut self, now: Time) -> Vec<Completion> {
        let msgs = self.source.as_mut().map(|source| source.poll()).unwrap_or_default();
        for msg in msgs {
            self.handle_msg(msg, now);
        }

        let completions = self
            .avatars
            .iter_mut()
            .filter_map(|avatar| avatar.tick(now))
            .collect::<Vec<_>>();
        for completion in &completions {
            if let Some(queue) = self.queues.get_mut(&completion.avatar) {
                queue.complete();
            }
            self.advance_queue(&completion.avatar, now);
        }

        self.mirror_to_scene();
        completions
    }

    fn mirror_to_scene(&mut self) {
        let Some(scene) = &mut self.scene else {
            trace!("No scene attached, skipping draw");
            return;
        };
        for avatar in &self.avatars {
            match self.handles.get(avatar.id()) {
                Some(handle) => scene.update_transform(*handle, avatar.pose()),
                None => debug!(id = %avatar.id(), "Avatar has no scene handle"),
            }
        }
        scene.render();
    }

    fn handle_msg(&mut self, msg: ServerMsg, now: Time) {
        match msg {
            ServerMsg::RobotStates(states) => {
                for (id, snapshot) in &states {
                    if !self.reconcile(id, snapshot, now) {
                        trace!(%id, "State for unknown robot");
                    }
                }
            },
            ServerMsg::RobotAdded(snapshot) => {
                let Some(id) = snapshot.robot_id.clone() else {
                    warn!("Added robot has no id");
                    return;
                };
                if self.reconcile(&id, &snapshot, now) {
                    return;
                }
                match self.add_avatar(AvatarDescriptor::from_snapshot(&id, &snapshot)) {
                    Ok(()) => info!(%id, "Robot joined"),
                    Err(e) => warn!(?e, %id, "Rejected robot"),
                }
            },
            ServerMsg::RobotRemoved(id) => match self.remove_avatar(&id) {
                Ok(()) => info!(%id, "Robot left"),
                Err(e) => debug!(?e, "Removal of unknown robot"),
            },
            ServerMsg::RobotsReset(states) => self.apply_reset(&states, now),
            ServerMsg::ActionResult(result) => {
                if result.is_success() {
                    debug!(?result.robot_id, ?result.action, "Session accepted action");
                } else {
                    warn!(?result, "Session rejected action");
                }
                self.last_result = Some(result);
            },
        }
    }

    fn apply_reset(&mut self, states: &HashMap<String, Snapshot>, now: Time) {
        for queue in self.queues.values_mut() {
            queue.clear();
        }
        for avatar in &mut self.avatars {
            avatar.reset();
        }
        for (id, snapshot) in states {
            if self.reconcile(id, snapshot, now) {
                continue;
            }
            if let Err(e) = self.add_avatar(AvatarDescriptor::from_snapshot(id, snapshot)) {
                warn!(?e, %id, "Rejected robot on reset");
            }
        }
    }

    /// Applies `snapshot` to avatar `id`, returning whether the avatar exists.
    /// A stop reported by the session drops the avatar's queue, the stopped
    /// run never completes.
    fn reconcile(&mut self, id: &str, snapshot: &Snapshot, now: Time) -> bool {
        let Some(avatar) = self.avatar_mut(id) else {
            return false;
        };
        let update = avatar.apply_remote_update(snapshot, now);
        if update.stopped {
            debug!(%id, "Session stopped robot, dropping its queue");
            self.clear_queue(id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vek::*;

    #[test]
    fn targets() {
        assert_eq!(Target::from_id("ALL"), Target::All);
        assert_eq!(Target::from("robot_3"), Target::Avatar("robot_3".to_owned()));
        assert_eq!(Target::All.wire_id(), "all");
    }

    #[test]
    fn capacity_is_enforced() {
        let mut fleet = Fleet::with_default_avatars();
        assert_eq!(fleet.len(), MAX_AVATARS);
        let extra = AvatarDescriptor::new("robot_7", Rgb::white(), Vec3::zero());
        assert!(matches!(fleet.add_avatar(extra.clone()), Err(Error::FleetFull)));
        assert!(matches!(
            fleet.add_avatar(AvatarDescriptor::new("robot_1", Rgb::white(), Vec3::zero())),
            Err(Error::DuplicateAvatar(_))
        ));

        fleet.remove_avatar("robot_2").unwrap();
        fleet.add_avatar(extra).unwrap();
        assert!(fleet.pose("robot_7").is_some());
        assert!(matches!(fleet.remove_avatar("robot_2"), Err(Error::UnknownAvatar(_))));
    }

    #[test]
    fn unknown_target_is_an_error() {
        let mut fleet = Fleet::with_default_avatars();
        assert!(matches!(
            fleet.start_action("robot_9", "wave", Time(0.0)),
            Err(Error::UnknownAvatar(id)) if id == "robot_9"
        ));
        assert!(fleet.queue_sequence("robot_9", Sequence::Demo, Time(0.0)).is_err());
    }

    #[test]
    fn broadcast_plays_everywhere() {
        let mut fleet = Fleet::with_default_avatars();
        fleet.start_action(Target::All, "bow", Time(0.0)).unwrap();
        assert!(fleet.avatars().all(|avatar| avatar.current_action() == Some("bow")));
        fleet.start_action("all", "stop", Time(1.0)).unwrap();
        assert!(fleet.avatars().all(|avatar| !avatar.is_animating()));
        assert!(!fleet.is_busy());
    }

    #[test]
    fn queued_stop_drops_the_queue() {
        let mut fleet = Fleet::with_default_avatars();
        fleet.queue_sequence("robot_1", Sequence::Combat, Time(0.0)).unwrap();
        assert!(fleet.is_busy());
        fleet.queue_action("robot_1", "STOP", Time(0.5)).unwrap();
        assert!(!fleet.avatar("robot_1").unwrap().is_animating());
        assert_eq!(fleet.queue_status("robot_1").map(|s| s.len), Some(0));
        assert!(!fleet.is_busy());
    }
}
