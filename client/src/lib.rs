#![deny(unsafe_code)]

pub mod animator;
pub mod avatar;
pub mod error;
pub mod fleet;
pub mod pose;
pub mod queue;
pub mod scene;
pub mod settings;
pub mod source;

// Reexports
pub use crate::{
    animator::{ActionAnimator, Completion, CompletionCallback},
    avatar::{AvatarController, AvatarDescriptor, RemoteUpdate},
    error::Error,
    fleet::{Fleet, Target, MAX_AVATARS},
    pose::PoseState,
    queue::{ActionQueue, QueueStatus, Sequence},
    scene::{Scene, SceneHandle},
    settings::Settings,
    source::{ActionSource, Loopback},
};
pub use common::resources::Time;
