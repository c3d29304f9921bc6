use crate::{avatar::AvatarDescriptor, pose::PoseState};

/// Opaque id a [`Scene`] hands out for each avatar it draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u64);

/// Whatever draws the fleet. The fleet only ever pushes poses into it.
pub trait Scene {
    fn create_avatar(&mut self, avatar: &AvatarDescriptor) -> SceneHandle;

    fn update_transform(&mut self, handle: SceneHandle, pose: &PoseState);

    fn remove_avatar(&mut self, handle: SceneHandle);

    /// Called once per tick after every avatar was updated.
    fn render(&mut self);
}
