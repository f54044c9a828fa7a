//! Frame-driven value interpolation.
//!
//! An [`Animator`] holds at most one in-flight [`Transition`]. The host calls
//! [`Animator::step`] once per frame; nothing runs between frames. Every
//! `start` or `cancel` bumps the animator's [`Generation`], and a
//! [`AnimationStep::Finished`] carries the generation it completed under so
//! stale completions can be told apart from current ones.

use std::f64::consts::PI;
use std::time::{Duration, Instant};

pub const ANIMATION_DURATION: Duration = Duration::from_millis(225);

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Slow at both ends, fastest in the middle.
    #[default]
    AccelerateDecelerate,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: f64,
    pub to: f64,
    pub start: Instant,
    pub delay: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    /// Value at `now` and whether the transition has run its course.
    pub fn sample(&self, now: Instant) -> (f64, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        let Some(running) = elapsed.checked_sub(self.delay) else {
            return (self.from, false);
        };
        if running >= self.duration {
            return (self.to, true);
        }
        let t = running.as_secs_f64() / self.duration.as_secs_f64();
        let eased = self.easing.apply(t);
        (self.from + eased * (self.to - self.from), false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationStep {
    Idle,
    Running(f64),
    Finished { value: f64, generation: Generation },
}

#[derive(Debug, Clone)]
pub struct Animator {
    duration: Duration,
    easing: Easing,
    current: Option<Transition>,
    generation: Generation,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(ANIMATION_DURATION, Easing::default())
    }
}

impl Animator {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            current: None,
            generation: Generation::default(),
        }
    }

    /// Replaces any in-flight transition with one from `from` to `to`.
    pub fn start(&mut self, from: f64, to: f64, delay: Duration, now: Instant) -> Generation {
        self.generation.0 += 1;
        self.current = Some(Transition {
            from,
            to,
            start: now,
            delay,
            duration: self.duration,
            easing: self.easing,
        });
        self.generation
    }

    /// Drops the in-flight transition, returning whether there was one.
    pub fn cancel(&mut self) -> bool {
        self.generation.0 += 1;
        self.current.take().is_some()
    }

    pub fn step(&mut self, now: Instant) -> AnimationStep {
        let Some(transition) = self.current else {
            return AnimationStep::Idle;
        };
        match transition.sample(now) {
            (value, true) => {
                self.current = None;
                AnimationStep::Finished {
                    value,
                    generation: self.generation,
                }
            }
            (value, false) => AnimationStep::Running(value),
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints_and_midpoint() {
        let easing = Easing::AccelerateDecelerate;
        assert!(easing.apply(0.0).abs() < 1e-12);
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        assert!((easing.apply(0.5) - 0.5).abs() < 1e-12);
        assert!(easing.apply(0.25) < 0.25);
        assert!(easing.apply(0.75) > 0.75);
    }

    #[test]
    fn test_runs_to_exact_target_after_duration() {
        let start = Instant::now();
        let mut animator = Animator::default();
        let generation = animator.start(0.0, 1.0, Duration::ZERO, start);

        match animator.step(start + ANIMATION_DURATION / 2) {
            AnimationStep::Running(value) => assert!((value - 0.5).abs() < 1e-9),
            step => panic!("unexpected {step:?}"),
        }
        assert_eq!(
            animator.step(start + ANIMATION_DURATION),
            AnimationStep::Finished {
                value: 1.0,
                generation
            }
        );
        assert_eq!(animator.step(start + ANIMATION_DURATION * 2), AnimationStep::Idle);
    }

    #[test]
    fn test_delay_holds_starting_value() {
        let start = Instant::now();
        let mut animator = Animator::default();
        animator.start(1.0, 0.0, ANIMATION_DURATION, start);

        assert_eq!(
            animator.step(start + ANIMATION_DURATION - Duration::from_millis(1)),
            AnimationStep::Running(1.0)
        );
        assert!(matches!(
            animator.step(start + ANIMATION_DURATION * 2),
            AnimationStep::Finished { value, .. } if value == 0.0
        ));
    }

    #[test]
    fn test_restart_and_cancel_bump_generation() {
        let start = Instant::now();
        let mut animator = Animator::default();
        let first = animator.start(0.0, 1.0, Duration::ZERO, start);
        let second = animator.start(0.3, 0.0, Duration::ZERO, start);
        assert!(second > first);

        assert!(animator.cancel());
        assert!(animator.generation() > second);
        assert!(!animator.is_running());
        assert!(!animator.cancel());
    }
}
