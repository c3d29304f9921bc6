//! Phase segmentation of an action run.
//!
//! A run is split into named phases, each covering a fraction of the run's
//! duration and shaping its own local progress with an [`Easing`] curve.

use crate::action::{ActionDescriptor, Category};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Easing curves mapping linear progress in `[0, 1]` onto eased progress.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Cubic in-out. Steeper than [`Easing::EaseInOut`] around the midpoint.
    Sharp,
}

impl Easing {
    /// Input outside `[0, 1]` is clamped, NaN is treated as 0.
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(2),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            },
            Easing::Sharp => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            },
        }
    }
}

/// Free function form of [`Easing::apply`].
pub fn ease(t: f32, easing: Easing) -> f32 { easing.apply(t) }

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Phase {
    pub name: &'static str,
    /// Share of the whole run, in `(0, 1]`.
    pub fraction: f32,
    pub easing: Easing,
}

impl Phase {
    pub const fn new(name: &'static str, fraction: f32, easing: Easing) -> Self {
        Self {
            name,
            fraction,
            easing,
        }
    }
}

const DANCE_LONG: &[Phase] = &[
    Phase::new("intro", 0.1, Easing::EaseIn),
    Phase::new("groove", 0.2, Easing::Linear),
    Phase::new("build", 0.2, Easing::EaseInOut),
    Phase::new("peak", 0.2, Easing::Linear),
    Phase::new("groove_out", 0.2, Easing::EaseInOut),
    Phase::new("outro", 0.1, Easing::EaseOut),
];

const DANCE_MEDIUM: &[Phase] = &[
    Phase::new("intro", 0.15, Easing::EaseIn),
    Phase::new("groove", 0.35, Easing::Linear),
    Phase::new("peak", 0.35, Easing::EaseInOut),
    Phase::new("outro", 0.15, Easing::EaseOut),
];

const DANCE_SHORT: &[Phase] = &[
    Phase::new("intro", 0.2, Easing::EaseIn),
    Phase::new("groove", 0.6, Easing::Linear),
    Phase::new("outro", 0.2, Easing::EaseOut),
];

const COMBAT: &[Phase] = &[
    Phase::new("windup", 0.3, Easing::Sharp),
    Phase::new("strike", 0.2, Easing::Sharp),
    Phase::new("follow_through", 0.2, Easing::Sharp),
    Phase::new("recovery", 0.3, Easing::Sharp),
];

const EXERCISE_LONG: &[Phase] = &[
    Phase::new("setup", 0.2, Easing::EaseInOut),
    Phase::new("execute", 0.6, Easing::Linear),
    Phase::new("return", 0.2, Easing::EaseInOut),
];

const EXERCISE_SHORT: &[Phase] = &[
    Phase::new("execute", 0.8, Easing::Linear),
    Phase::new("return", 0.2, Easing::EaseOut),
];

const MOVEMENT: &[Phase] = &[
    Phase::new("start", 0.15, Easing::EaseIn),
    Phase::new("move", 0.7, Easing::Linear),
    Phase::new("stop", 0.15, Easing::EaseOut),
];

const BASIC: &[Phase] = &[
    Phase::new("begin", 0.25, Easing::EaseOut),
    Phase::new("hold", 0.5, Easing::Linear),
    Phase::new("end", 0.25, Easing::EaseIn),
];

/// Dances at least this long get the six phase template.
pub const LONG_DANCE_MS: u32 = 80_000;
/// Dances at least this long get the four phase template.
pub const MEDIUM_DANCE_MS: u32 = 30_000;
/// Exercises at least this long get a separate setup phase.
pub const LONG_EXERCISE_MS: u32 = 6_000;

/// Ordered, non-empty list of phases whose fractions sum to 1.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhaseTemplate {
    phases: &'static [Phase],
}

impl PhaseTemplate {
    pub fn for_action(desc: &ActionDescriptor) -> Self {
        Self::for_category(desc.category, desc.duration_ms)
    }

    pub fn for_category(category: Category, duration_ms: u32) -> Self {
        let phases = match category {
            Category::Dance if duration_ms >= LONG_DANCE_MS => DANCE_LONG,
            Category::Dance if duration_ms >= MEDIUM_DANCE_MS => DANCE_MEDIUM,
            Category::Dance => DANCE_SHORT,
            Category::Combat => COMBAT,
            Category::Exercise if duration_ms >= LONG_EXERCISE_MS => EXERCISE_LONG,
            Category::Exercise => EXERCISE_SHORT,
            Category::Movement => MOVEMENT,
            Category::Basic => BASIC,
        };
        Self { phases }
    }

    pub fn phases(&self) -> &'static [Phase] { self.phases }

    pub fn len(&self) -> usize { self.phases.len() }

    /// Templates are never empty.
    pub fn is_empty(&self) -> bool { false }

    pub fn last(&self) -> &'static Phase { &self.phases[self.phases.len() - 1] }

    /// Cumulative `(start, end)` of the phase at `index`.
    pub fn range(&self, index: usize) -> (f32, f32) {
        let start = self.phases[..index].iter().map(|p| p.fraction).sum::<f32>();
        (start, start + self.phases[index].fraction)
    }
}

/// Where a run currently is within its template.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct PhaseInfo {
    pub index: usize,
    pub phase: Phase,
    /// Progress within the phase, in `[0, 1]`.
    pub local: f32,
    /// `local` shaped by the phase's easing.
    pub eased: f32,
}

impl PhaseInfo {
    pub fn name(&self) -> &'static str { self.phase.name }

    pub fn is(&self, name: &str) -> bool { self.phase.name == name }
}

/// Locate `progress` within `template`.
///
/// Progress at or beyond 1 (including floating overshoot and NaN) resolves to
/// the last phase at local progress 1.
pub fn current_phase(template: &PhaseTemplate, progress: f32) -> PhaseInfo {
    let last = template.len() - 1;
    if progress.is_nan() || progress >= 1.0 {
        return PhaseInfo {
            index: last,
            phase: *template.last(),
            local: 1.0,
            eased: template.last().easing.apply(1.0),
        };
    }
    let progress = progress.max(0.0);

    let mut start = 0.0;
    for (index, phase) in template.phases().iter().enumerate() {
        let end = start + phase.fraction;
        if end >= progress || index == last {
            let local = ((progress - start) / phase.fraction).clamp(0.0, 1.0);
            return PhaseInfo {
                index,
                phase: *phase,
                local,
                eased: phase.easing.apply(local),
            };
        }
        start = end;
    }
    unreachable!("phase templates are never empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{descriptor, ActionKind};
    use approx::assert_relative_eq;

    const ALL_EASINGS: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::Sharp,
    ];

    fn all_templates() -> Vec<PhaseTemplate> {
        ActionKind::iter_all()
            .map(|k| PhaseTemplate::for_action(&k.descriptor()))
            .chain(std::iter::once(PhaseTemplate::for_action(&descriptor(
                "unknown",
            ))))
            .collect()
    }

    #[test]
    fn easing_endpoints() {
        for easing in ALL_EASINGS {
            assert_relative_eq!(easing.apply(0.0), 0.0);
            assert_relative_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn easing_is_monotonic() {
        for easing in ALL_EASINGS {
            let mut prev = easing.apply(0.0);
            for i in 1..=1000 {
                let v = easing.apply(i as f32 / 1000.0);
                assert!(v + 1e-6 >= prev, "{easing} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn easing_clamps_input() {
        assert_relative_eq!(ease(-3.0, Easing::EaseIn), 0.0);
        assert_relative_eq!(ease(7.0, Easing::Sharp), 1.0);
        assert_relative_eq!(ease(f32::NAN, Easing::EaseOut), 0.0);
        assert_relative_eq!(ease(0.25, Easing::EaseInOut), 0.125);
        assert_relative_eq!(ease(0.25, Easing::Sharp), 0.0625);
    }

    #[test]
    fn templates_sum_to_one() {
        for template in all_templates() {
            assert!(!template.phases().is_empty());
            let sum = template.phases().iter().map(|p| p.fraction).sum::<f32>();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-4);
            assert!(template.phases().iter().all(|p| p.fraction > 0.0 && p.fraction <= 1.0));
        }
    }

    #[test]
    fn template_selection() {
        let len = |id: &str| PhaseTemplate::for_action(&descriptor(id)).len();
        assert_eq!(len("dance_ten"), 6);
        assert_eq!(len("dance_eight"), 6);
        assert_eq!(len("dance_four"), 6);
        assert_eq!(len("dance_two"), 4);
        assert_eq!(len("dance"), 3);
        assert_eq!(len("kick"), 4);
        assert_eq!(len("push_ups"), 3);
        assert_eq!(len("squat_up"), 3);
        assert_eq!(len("squat"), 2);
        assert_eq!(len("go_forward"), 3);
        assert_eq!(len("wave"), 3);
        assert_eq!(len("moonwalk"), 3);

        let combat = PhaseTemplate::for_action(&descriptor("punch"));
        assert!(combat.phases().iter().all(|p| p.easing == Easing::Sharp));
        assert_eq!(
            combat.phases().iter().map(|p| p.name).collect::<Vec<_>>(),
            ["windup", "strike", "follow_through", "recovery"]
        );
    }

    #[test]
    fn active_phase_contains_progress() {
        for template in all_templates() {
            for i in 0..=500 {
                let p = i as f32 / 500.0;
                let info = current_phase(&template, p);
                assert!((0.0..=1.0).contains(&info.local));
                let (start, end) = template.range(info.index);
                assert!(p >= start - 1e-4 && p <= end + 1e-4, "{p} not in {start}..{end}");
            }
        }
    }

    #[test]
    fn end_of_run_is_last_phase() {
        for template in all_templates() {
            for p in [1.0, 1.0 + f32::EPSILON, 3.5, f32::INFINITY, f32::NAN] {
                let info = current_phase(&template, p);
                assert_eq!(info.index, template.len() - 1);
                assert_relative_eq!(info.local, 1.0);
                assert_relative_eq!(info.eased, 1.0);
            }
        }
    }

    #[test]
    fn phase_lookup_is_pure() {
        let template = PhaseTemplate::for_action(&descriptor("dance_ten"));
        let a = current_phase(&template, 0.62);
        let b = current_phase(&template, 0.62);
        assert_eq!(a, b);
        assert_eq!(a.name(), "peak");
        assert_relative_eq!(a.local, 0.6, epsilon = 1e-4);
    }

    #[test]
    fn negative_progress_is_first_phase() {
        let template = PhaseTemplate::for_action(&descriptor("wave"));
        let info = current_phase(&template, -0.5);
        assert_eq!(info.index, 0);
        assert_relative_eq!(info.local, 0.0);
    }
}
