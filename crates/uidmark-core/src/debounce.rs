//! Per-key debouncing
//!
//! Leading edge: the first event for a key fires, further events for the same
//! key are dropped until the window has passed since the last accepted one.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Window used for create/open triggers
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    last_seen: HashMap<String, Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    /// Record an event for `key` at `now`; true if it should be handled
    pub fn accept(&mut self, key: &str, now: Instant) -> bool {
        if let Some(last) = self.last_seen.get(key) {
            if now.saturating_duration_since(*last) < self.window {
                return false;
            }
        }
        self.last_seen.insert(key.to_string(), now);
        self.prune(now);
        true
    }

    /// Forget keys whose window has long expired
    fn prune(&mut self, now: Instant) {
        if self.last_seen.len() < 1024 {
            return;
        }
        let window = self.window;
        self.last_seen
            .retain(|_, last| now.saturating_duration_since(*last) < window);
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_fires_repeat_dropped() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let t0 = Instant::now();

        assert!(debouncer.accept("a.md", t0));
        assert!(!debouncer.accept("a.md", t0 + Duration::from_millis(10)));
        assert!(!debouncer.accept("a.md", t0 + Duration::from_millis(499)));
        assert!(debouncer.accept("a.md", t0 + Duration::from_millis(500)));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut debouncer = Debouncer::default();
        let t0 = Instant::now();

        assert!(debouncer.accept("a.md", t0));
        assert!(debouncer.accept("b.md", t0));
        assert!(!debouncer.accept("a.md", t0));
    }

    #[test]
    fn test_prune_keeps_recent_keys() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let t0 = Instant::now();
        for i in 0..1100 {
            debouncer.accept(&format!("{}.md", i), t0);
        }
        let later = t0 + Duration::from_secs(1);
        assert!(debouncer.accept("fresh.md", later));
        assert!(debouncer.last_seen.len() < 1100);
        assert!(!debouncer.accept("fresh.md", later));
    }
}
