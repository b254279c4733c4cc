use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Easing curves for scalar animation. The `*Out` curves decelerate toward
/// the target, which is how every hover animation in this workspace moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    Linear,
    QuadOut,
    QuintOut,
    Smoothstep,
}

impl Ease {
    pub fn sample(self, t: f32) -> f32 {
        let clamped = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => clamped,
            Ease::QuadOut => {
                let inv = 1.0 - clamped;
                1.0 - inv * inv
            }
            Ease::QuintOut => 1.0 - (1.0 - clamped).powi(5),
            Ease::Smoothstep => clamped * clamped * (3.0 - 2.0 * clamped),
        }
    }
}

/// A scalar interpolation from one value to another, sampled against an
/// explicit `Instant` so callers (and tests) control the clock.
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration, ease: Ease, now: Instant) -> Self {
        Self {
            from,
            to,
            start: now,
            duration,
            ease,
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);
        elapsed.as_secs_f32() / self.duration.as_secs_f32().max(f32::EPSILON)
    }

    pub fn value_at(&self, now: Instant) -> f32 {
        let mix = self.ease.sample(self.progress(now));
        self.from + (self.to - self.from) * mix
    }

    pub fn finished_at(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// One sampled tween tick, as handed back by [`Timeline::advance`].
#[derive(Clone, Copy, Debug)]
pub struct Step<K> {
    pub key: K,
    pub value: f32,
    pub finished: bool,
}

/// Owns at most one tween per channel key. Starting a tween on a key that is
/// already animating replaces the running tween, so the later request always
/// wins and two writers never race on the same field.
pub struct Timeline<K> {
    tweens: HashMap<K, Tween>,
}

impl<K: Copy + Eq + Hash> Timeline<K> {
    pub fn new() -> Self {
        Self {
            tweens: HashMap::new(),
        }
    }

    pub fn start(&mut self, key: K, tween: Tween) {
        self.tweens.insert(key, tween);
    }

    pub fn cancel(&mut self, key: K) {
        self.tweens.remove(&key);
    }

    pub fn is_animating(&self, key: K) -> bool {
        self.tweens.contains_key(&key)
    }

    /// Target value of the tween currently owning `key`, if any.
    pub fn target(&self, key: K) -> Option<f32> {
        self.tweens.get(&key).map(Tween::target)
    }

    /// Samples every running tween at `now`. Finished tweens report their
    /// exact target value once and are dropped.
    pub fn advance(&mut self, now: Instant) -> Vec<Step<K>> {
        let steps: Vec<Step<K>> = self
            .tweens
            .iter()
            .map(|(key, tween)| Step {
                key: *key,
                value: tween.value_at(now),
                finished: tween.finished_at(now),
            })
            .collect();
        self.tweens.retain(|_, tween| !tween.finished_at(now));
        steps
    }
}

impl<K: Copy + Eq + Hash> Default for Timeline<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Channel {
        Alpha,
        Mix,
    }

    #[test]
    fn eases_hit_their_endpoints() {
        for ease in [Ease::Linear, Ease::QuadOut, Ease::QuintOut, Ease::Smoothstep] {
            assert!((ease.sample(0.0) - 0.0).abs() < 1e-6);
            assert!((ease.sample(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn out_curves_increase_monotonically_and_lead_linear() {
        for ease in [Ease::QuadOut, Ease::QuintOut] {
            let mut last = 0.0;
            for step in 0..=10 {
                let t = step as f32 / 10.0;
                let sample = ease.sample(t);
                assert!(sample >= last - f32::EPSILON);
                assert!(sample >= t - 1e-6);
                last = sample;
            }
        }
    }

    #[test]
    fn quint_decelerates_harder_than_quad() {
        assert!(Ease::QuintOut.sample(0.5) > Ease::QuadOut.sample(0.5));
    }

    #[test]
    fn tween_reports_midpoint_value() {
        let start = Instant::now();
        let tween = Tween::new(0.0, 2.0, Duration::from_millis(100), Ease::Linear, start);
        let mid = tween.value_at(start + Duration::from_millis(50));
        assert!((mid - 1.0).abs() < 1e-3);
        assert!(!tween.finished_at(start + Duration::from_millis(50)));
        assert!(tween.finished_at(start + Duration::from_millis(100)));
    }

    #[test]
    fn zero_duration_tween_snaps_to_target() {
        let start = Instant::now();
        let tween = Tween::new(0.0, 1.0, Duration::ZERO, Ease::QuintOut, start);
        assert!((tween.value_at(start) - 1.0).abs() < 1e-6);
        assert!(tween.finished_at(start));
    }

    #[test]
    fn starting_a_channel_replaces_the_running_tween() {
        let start = Instant::now();
        let mut timeline = Timeline::new();
        timeline.start(
            Channel::Alpha,
            Tween::new(0.0, 1.0, Duration::from_secs(1), Ease::QuintOut, start),
        );
        timeline.start(
            Channel::Alpha,
            Tween::new(1.0, 0.0, Duration::from_secs(1), Ease::QuintOut, start),
        );
        assert_eq!(timeline.target(Channel::Alpha), Some(0.0));
        let steps = timeline.advance(start + Duration::from_millis(10));
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn advance_drops_finished_tweens_after_final_step() {
        let start = Instant::now();
        let mut timeline = Timeline::new();
        timeline.start(
            Channel::Mix,
            Tween::new(0.0, 1.0, Duration::from_millis(20), Ease::Linear, start),
        );
        let steps = timeline.advance(start + Duration::from_millis(30));
        assert_eq!(steps.len(), 1);
        assert!(steps[0].finished);
        assert!((steps[0].value - 1.0).abs() < 1e-6);
        assert!(!timeline.is_animating(Channel::Mix));
        assert!(timeline.advance(start + Duration::from_millis(40)).is_empty());
    }

    #[test]
    fn channels_animate_independently() {
        let start = Instant::now();
        let mut timeline = Timeline::new();
        timeline.start(
            Channel::Alpha,
            Tween::new(0.0, 1.0, Duration::from_secs(1), Ease::QuintOut, start),
        );
        timeline.start(
            Channel::Mix,
            Tween::new(0.0, 1.0, Duration::from_millis(10), Ease::QuadOut, start),
        );
        timeline.cancel(Channel::Mix);
        assert!(timeline.is_animating(Channel::Alpha));
        assert!(!timeline.is_animating(Channel::Mix));
    }
}
