#![deny(unsafe_code)]

mod cli;
mod scene;

use crate::{cli::Args, scene::LogScene};
use clap::Parser;
use client::{Completion, Fleet, Loopback, Sequence, Settings, Target, Time};
use common::{action, clock::Clock};
use std::{rc::Rc, time::Duration};
use tracing::{error, info, warn};

/// Extra time granted on top of the planned actions before giving up.
const GRACE: Duration = Duration::from_secs(30);

fn main() {
    let args = Args::parse();

    let settings = Settings::load(&args.userdata);
    let logs_dir = args.userdata.join(&settings.log.logs_path);
    let _guards = common_frontend::init_stdout(
        settings
            .log
            .log_to_file
            .then_some((logs_dir.as_path(), "humanoid-headless.log")),
    );

    info!("Starting headless fleet...");

    let mut fleet = Fleet::new(&settings);
    fleet.attach_source(Box::new(Loopback::new(
        settings.avatars.clone(),
        settings.animation.wire_angles,
    )));
    fleet.attach_scene(Box::new(LogScene::new(args.report_every)));
    fleet.register_completion_callback(Rc::new(|completion: &Completion| {
        info!(
            avatar = %completion.avatar,
            action = %completion.action,
            at = completion.finished_at.0,
            "Action complete"
        );
    }));

    let mut clock = if args.real_time {
        Clock::new()
    } else {
        Clock::simulated()
    };

    let targets = match Target::from_id(&args.robot) {
        Target::All => fleet.avatars().map(|a| a.id().to_owned()).collect::<Vec<_>>(),
        Target::Avatar(id) => vec![id],
    };
    let sequence = match (args.sequence, args.actions.is_empty()) {
        (None, true) => Some(Sequence::Demo),
        (sequence, _) => sequence,
    };

    let mut planned_ms = 0_u32;
    for id in &targets {
        let mut avatar_ms = 0;
        if let Some(sequence) = sequence {
            match fleet.queue_sequence(id, sequence, clock.time()) {
                Ok(ms) => avatar_ms += ms,
                Err(e) => {
                    error!(?e, %id, "Cannot queue sequence");
                    continue;
                },
            }
        }
        for action in &args.actions {
            match fleet.queue_action(id, action, clock.time()) {
                Ok(()) => avatar_ms += action::duration_of(action),
                Err(e) => warn!(?e, %id, %action, "Cannot queue action"),
            }
        }
        planned_ms = planned_ms.max(avatar_ms);
    }
    info!(robots = targets.len(), planned_ms, "Queued actions");

    let deadline = Time::default().add_millis(f64::from(planned_ms)).add_seconds(GRACE.as_secs_f64());
    let tick = Duration::from_secs_f64(1.0 / f64::from(args.tps.max(1)));
    loop {
        fleet.tick(clock.time());
        if !fleet.is_busy() {
            break;
        }
        if clock.time().0 > deadline.0 {
            warn!(elapsed = clock.time().0, "Fleet still busy past the plan, stopping");
            fleet.reset_session();
            break;
        }
        clock.tick(tick);
    }

    info!(
        elapsed = clock.time().0,
        avg_tps = clock.get_tps(),
        "All actions played"
    );
}
