#![allow(dead_code)]

use client::{ActionSource, AvatarDescriptor, Error, Loopback, PoseState, Scene, SceneHandle};
use common::msg::{AngleUnit, ClientMsg, ServerMsg};
use hashbrown::HashMap;
use std::{cell::RefCell, rc::Rc};
use tracing_subscriber::EnvFilter;

pub fn setup(tracing: bool) {
    if tracing {
        let filter = EnvFilter::from_default_env()
            .add_directive("client=trace".parse().unwrap())
            .add_directive("common=debug".parse().unwrap());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

#[derive(Default)]
pub struct SceneLog {
    pub created: Vec<String>,
    pub removed: Vec<SceneHandle>,
    pub frames: usize,
    pub poses: HashMap<SceneHandle, PoseState>,
    pub handles: HashMap<String, SceneHandle>,
}

/// Remembers everything the fleet drew.
pub struct RecordingScene {
    log: Rc<RefCell<SceneLog>>,
    next: u64,
}

impl RecordingScene {
    pub fn new() -> (Box<Self>, Rc<RefCell<SceneLog>>) {
        let log = Rc::new(RefCell::new(SceneLog::default()));
        (
            Box::new(Self {
                log: Rc::clone(&log),
                next: 0,
            }),
            log,
        )
    }
}

impl Scene for RecordingScene {
    fn create_avatar(&mut self, avatar: &AvatarDescriptor) -> SceneHandle {
        let handle = SceneHandle(self.next);
        self.next += 1;
        let mut log = self.log.borrow_mut();
        log.created.push(avatar.id.clone());
        log.handles.insert(avatar.id.clone(), handle);
        handle
    }

    fn update_transform(&mut self, handle: SceneHandle, pose: &PoseState) {
        self.log.borrow_mut().poses.insert(handle, pose.clone());
    }

    fn remove_avatar(&mut self, handle: SceneHandle) { self.log.borrow_mut().removed.push(handle); }

    fn render(&mut self) { self.log.borrow_mut().frames += 1; }
}

/// A loopback session the test keeps a handle on.
#[derive(Clone)]
pub struct SharedSession(pub Rc<RefCell<Loopback>>);

impl SharedSession {
    pub fn new() -> (Box<Self>, Self) {
        let session = Self(Rc::new(RefCell::new(Loopback::new(
            AvatarDescriptor::default_fleet(),
            AngleUnit::Degrees,
        ))));
        (Box::new(session.clone()), session)
    }

    pub fn push_json(&self, text: &str) { self.0.borrow_mut().push_json(text).unwrap(); }

    pub fn sent(&self) -> Vec<ClientMsg> { self.0.borrow().sent().to_vec() }
}

impl ActionSource for SharedSession {
    fn poll(&mut self) -> Vec<ServerMsg> { self.0.borrow_mut().poll() }

    fn send(&mut self, msg: ClientMsg) -> Result<(), Error> { self.0.borrow_mut().send(msg) }
}
