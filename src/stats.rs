use std::fmt;

/// Bullet outcome counters for one agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulletStats {
    hits: u64,
    misses: u64,
}

impl BulletStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn fired(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit percentage, or None before any bullet has resolved
    pub fn accuracy(&self) -> Option<f64> {
        match self.fired() {
            0 => None,
            fired => Some(self.hits as f64 / fired as f64 * 100.0),
        }
    }
}

impl fmt::Display for BulletStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accuracy() {
            Some(accuracy) => write!(
                f,
                "Fire accuracy: {:.2}% ({} hits / {} fired)",
                accuracy,
                self.hits,
                self.fired()
            ),
            None => write!(f, "Fire accuracy: no shots fired"),
        }
    }
}
