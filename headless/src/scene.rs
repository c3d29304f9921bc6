use client::{pose::PoseState, AvatarDescriptor, Scene, SceneHandle};
use hashbrown::HashMap;
use tracing::{debug, info, trace};

/// A [`Scene`] that only writes what it would draw to the log.
pub struct LogScene {
    names: HashMap<SceneHandle, String>,
    next_handle: u64,
    frame: u64,
    report_every: u64,
}

impl LogScene {
    pub fn new(report_every: u64) -> Self {
        Self {
            names: HashMap::new(),
            next_handle: 0,
            frame: 0,
            report_every,
        }
    }

    fn reporting(&self) -> bool { self.report_every != 0 && self.frame % self.report_every == 0 }
}

impl Scene for LogScene {
    fn create_avatar(&mut self, avatar: &AvatarDescriptor) -> SceneHandle {
        let handle = SceneHandle(self.next_handle);
        self.next_handle += 1;
        info!(id = %avatar.id, color = ?avatar.color, position = ?avatar.position, "Spawned avatar");
        self.names.insert(handle, avatar.id.clone());
        handle
    }

    fn update_transform(&mut self, handle: SceneHandle, pose: &PoseState) {
        let Some(name) = self.names.get(&handle) else {
            debug!(?handle, "Transform for unknown handle");
            return;
        };
        let root = pose.displayed_root();
        if self.reporting() {
            debug!(
                %name,
                x = root.position.x,
                y = root.position.y,
                z = root.position.z,
                yaw = pose.ori.yaw(),
                "Avatar"
            );
        } else {
            trace!(%name, position = ?root.position, "Avatar");
        }
    }

    fn remove_avatar(&mut self, handle: SceneHandle) {
        if let Some(name) = self.names.remove(&handle) {
            info!(%name, "Despawned avatar");
        }
    }

    fn render(&mut self) { self.frame += 1; }
}
