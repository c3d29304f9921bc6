use crate::resources::Time;
use std::{
    thread,
    time::{Duration, Instant},
};

const CLOCK_SMOOTHING: f64 = 0.9;

#[derive(Copy, Clone, Debug)]
enum Pace {
    /// Sleeps to hold the target tick rate.
    RealTime { last_instant: Instant },
    /// Advances by exactly the target delta without sleeping.
    Simulated,
}

/// Drives the `now` passed to every `tick`.
#[derive(Copy, Clone, Debug)]
pub struct Clock {
    pace: Pace,
    last_delta: Option<Duration>,
    running_tps_average: f64,
    time: Time,
}

impl Default for Clock {
    fn default() -> Self { Self::new() }
}

impl Clock {
    pub fn new() -> Self { Self::with_pace(Pace::RealTime { last_instant: Instant::now() }) }

    pub fn simulated() -> Self { Self::with_pace(Pace::Simulated) }

    fn with_pace(pace: Pace) -> Self {
        Self {
            pace,
            last_delta: None,
            running_tps_average: 0.0,
            time: Time::default(),
        }
    }

    pub fn time(&self) -> Time { self.time }

    pub fn get_tps(&self) -> f64 {
        if self.running_tps_average > 0.0 {
            1.0 / self.running_tps_average
        } else {
            0.0
        }
    }

    pub fn get_last_delta(&self) -> Duration { self.last_delta.unwrap_or(Duration::ZERO) }

    pub fn get_avg_delta(&self) -> Duration { Duration::from_secs_f64(self.running_tps_average) }

    pub fn tick(&mut self, tgt: Duration) {
        let delta = match &mut self.pace {
            Pace::RealTime { last_instant } => {
                // Attempt to sleep to fill the gap
                if let Some(sleep_dur) = tgt.checked_sub(last_instant.elapsed()) {
                    thread::sleep(sleep_dur);
                }
                let delta = last_instant.elapsed();
                *last_instant = Instant::now();
                delta
            },
            Pace::Simulated => tgt,
        };

        self.time = self.time.add_seconds(delta.as_secs_f64());
        self.last_delta = Some(delta);
        self.running_tps_average = if self.running_tps_average == 0.0 {
            delta.as_secs_f64()
        } else {
            CLOCK_SMOOTHING * self.running_tps_average
                + (1.0 - CLOCK_SMOOTHING) * delta.as_secs_f64()
        };
    }
}
