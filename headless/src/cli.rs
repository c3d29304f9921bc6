use clap::Parser;
use client::Sequence;
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
#[clap(version, about)]
pub struct Args {
    /// Directory holding `settings.ron`. Created with defaults if missing.
    #[clap(long, env = "HUMANOID_USERDATA", default_value = "userdata")]
    pub userdata: PathBuf,

    /// Robot the actions play on, or `all` for the whole fleet.
    #[clap(short, long, default_value = "all")]
    pub robot: String,

    /// Queue a predefined sequence before the listed actions.
    #[clap(short, long)]
    pub sequence: Option<Sequence>,

    /// Simulation ticks per second.
    #[clap(long, default_value_t = 30)]
    pub tps: u32,

    /// Pace ticks against the wall clock instead of running as fast as
    /// possible.
    #[clap(long)]
    pub real_time: bool,

    /// Log a summary of every avatar each this many frames. 0 disables it.
    #[clap(long, default_value_t = 30)]
    pub report_every: u64,

    /// Actions to play one after the other. The demo sequence plays when
    /// neither actions nor a sequence are given.
    pub actions: Vec<String>,
}
