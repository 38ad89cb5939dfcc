//! Per-target speed history and weakest-target selection.
//!
//! Histories are keyed by target name in a `BTreeMap`, so iteration order is
//! the lexicographic order of the names. Weakest-target ties therefore
//! resolve to the lexicographically smallest name.

use crate::config;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// Rolling absolute-speed samples for every target currently alive
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    histories: BTreeMap<String, VecDeque<f64>>,
    window: usize,
    fallback: f64,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::with_window(config::VELOCITY_WINDOW, config::DEFAULT_AVERAGE_VELOCITY)
    }

    /// Creates a tracker averaging over `window` samples (at least one)
    /// and answering `fallback` for unknown targets
    pub fn with_window(window: usize, fallback: f64) -> Self {
        VelocityTracker {
            histories: BTreeMap::new(),
            window: window.max(1),
            fallback,
        }
    }

    /// Appends `|velocity|` as the newest sample for `name`.
    /// Non-finite samples are dropped and do not count as an observation.
    pub fn record_observation(&mut self, name: &str, velocity: f64) {
        if !velocity.is_finite() {
            log::warn!(target: "tracker", "Ignoring non-finite velocity {} for {}", velocity, name);
            return;
        }
        let window = self.window;
        let history = self
            .histories
            .entry(name.to_string())
            .or_insert_with(|| VecDeque::with_capacity(window));
        history.push_back(velocity.abs());
        // Only the averaging window is ever read back
        while history.len() > window {
            history.pop_front();
        }
        crate::debug_tracker!(
            "{}: recorded {:.2} ({} samples)",
            name,
            velocity.abs(),
            history.len()
        );
    }

    /// Mean of the most recent samples, or the fallback for unknown targets
    pub fn average_velocity(&self, name: &str) -> f64 {
        match self.histories.get(name) {
            Some(history) if !history.is_empty() => {
                let count = history.len().min(self.window);
                let sum: f64 = history.iter().rev().take(count).sum();
                sum / count as f64
            }
            _ => self.fallback,
        }
    }

    /// Forgets a target entirely. Returns true if it was tracked.
    pub fn remove_target(&mut self, name: &str) -> bool {
        let removed = self.histories.remove(name).is_some();
        if removed {
            crate::debug_tracker!("{}: eliminated, history dropped", name);
        }
        removed
    }

    /// Tracked target with the lowest average speed
    pub fn weakest_target(&self) -> Option<&str> {
        let mut weakest: Option<(&str, f64)> = None;
        for name in self.histories.keys() {
            let average = self.average_velocity(name);
            match weakest {
                Some((_, best)) if average >= best => {}
                _ => weakest = Some((name.as_str(), average)),
            }
        }
        weakest.map(|(name, _)| name)
    }

    pub fn is_tracking(&self, name: &str) -> bool {
        self.histories.contains_key(name)
    }

    /// Samples for `name`, oldest first
    pub fn samples(&self, name: &str) -> Option<&VecDeque<f64>> {
        self.histories.get(name)
    }

    /// Maximum samples kept per target
    pub fn window(&self) -> usize {
        self.window
    }

    /// Average reported for targets with no history
    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.histories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    pub fn clear(&mut self) {
        self.histories.clear();
    }
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// A tracker shared between agents (or host threads) behind one lock.
/// Every method takes the lock once for its whole read-modify-write.
#[derive(Debug, Clone, Default)]
pub struct SharedTracker {
    inner: Arc<Mutex<VelocityTracker>>,
}

impl SharedTracker {
    pub fn new(tracker: VelocityTracker) -> Self {
        SharedTracker {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Each mutation leaves the map consistent, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, VelocityTracker> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::warn!(target: "tracker", "Velocity tracker lock was poisoned; recovering");
            poisoned.into_inner()
        })
    }

    pub fn record_observation(&self, name: &str, velocity: f64) {
        self.lock().record_observation(name, velocity);
    }

    pub fn average_velocity(&self, name: &str) -> f64 {
        self.lock().average_velocity(name)
    }

    pub fn remove_target(&self, name: &str) -> bool {
        self.lock().remove_target(name)
    }

    pub fn weakest_target(&self) -> Option<String> {
        self.lock().weakest_target().map(str::to_string)
    }

    pub fn is_tracking(&self, name: &str) -> bool {
        self.lock().is_tracking(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Runs `f` with the lock held
    pub fn with<R>(&self, f: impl FnOnce(&mut VelocityTracker) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::thread;

    #[test]
    fn test_unknown_target_uses_fallback() {
        let tracker = VelocityTracker::new();
        assert_eq!(tracker.average_velocity("ghost"), 20.0);
        assert!(tracker.weakest_target().is_none());
    }

    #[test]
    fn test_window_and_fallback_settings() {
        let tracker = VelocityTracker::new();
        assert_eq!(tracker.window(), 20);
        assert_eq!(tracker.fallback(), 20.0);
        // A zero window still keeps one sample
        let tracker = VelocityTracker::with_window(0, 6.5);
        assert_eq!(tracker.window(), 1);
        assert_eq!(tracker.fallback(), 6.5);
    }

    #[test]
    fn test_average_of_absolute_speeds() {
        let mut tracker = VelocityTracker::new();
        tracker.record_observation("X", -15.0);
        tracker.record_observation("X", 5.0);
        assert_eq!(tracker.average_velocity("X"), 10.0);
    }

    #[test]
    fn test_remove_restores_fallback() {
        let mut tracker = VelocityTracker::new();
        tracker.record_observation("X", 3.0);
        assert!(tracker.remove_target("X"));
        assert!(!tracker.is_tracking("X"));
        assert_eq!(tracker.average_velocity("X"), 20.0);
        assert!(!tracker.remove_target("X"));
    }

    #[test]
    fn test_window_keeps_most_recent() {
        let mut tracker = VelocityTracker::new();
        for _ in 0..10 {
            tracker.record_observation("X", 100.0);
        }
        for _ in 0..20 {
            tracker.record_observation("X", 4.0);
        }
        assert_approx_eq!(tracker.average_velocity("X"), 4.0);
        assert_eq!(tracker.samples("X").map(|s| s.len()), Some(20));

        tracker.record_observation("X", 24.0);
        assert_approx_eq!(tracker.average_velocity("X"), 5.0);
    }

    #[test]
    fn test_short_history_averages_what_exists() {
        let mut tracker = VelocityTracker::with_window(5, 20.0);
        tracker.record_observation("X", 2.0);
        tracker.record_observation("X", 4.0);
        tracker.record_observation("X", 6.0);
        assert_approx_eq!(tracker.average_velocity("X"), 4.0);
    }

    #[test]
    fn test_non_finite_samples_ignored() {
        let mut tracker = VelocityTracker::new();
        tracker.record_observation("X", f64::NAN);
        assert!(!tracker.is_tracking("X"));
        tracker.record_observation("X", 6.0);
        tracker.record_observation("X", f64::INFINITY);
        assert_eq!(tracker.average_velocity("X"), 6.0);
    }

    #[test]
    fn test_weakest_target() {
        let mut tracker = VelocityTracker::new();
        tracker.record_observation("A", 30.0);
        tracker.record_observation("B", -10.0);
        tracker.record_observation("C", 20.0);
        assert_eq!(tracker.weakest_target(), Some("B"));

        tracker.remove_target("B");
        assert_eq!(tracker.weakest_target(), Some("C"));
    }

    #[test]
    fn test_weakest_target_tie_prefers_smallest_name() {
        let mut tracker = VelocityTracker::new();
        tracker.record_observation("zeta", 4.0);
        tracker.record_observation("alpha", 4.0);
        assert_eq!(tracker.weakest_target(), Some("alpha"));
    }

    #[test]
    fn test_shared_tracker_across_threads() {
        let shared = SharedTracker::default();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let tracker = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        tracker.record_observation(&format!("bot{}", i), i as f64);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(shared.len(), 4);
        assert_eq!(shared.weakest_target(), Some("bot0".to_string()));
        assert_eq!(shared.with(|t| t.samples("bot3").map(|s| s.len())), Some(20));
    }
}
