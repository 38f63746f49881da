use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Time-windowed deduplication cache guarding event dispatch
///
/// Maps a dedup key to the instant it last fired. An event whose key fired
/// less than one window ago is suppressed; a key at or past the window
/// boundary fires again. The cache is owned by a single tracker and touched
/// only from the synchronous portion of `track`, so no locking lives here.
///
/// Capacity policy: when an insert pushes the map above capacity, entries
/// whose window has already elapsed are swept first; if the map is still over
/// capacity the oldest entries are evicted until it is back at capacity, so
/// the cache stays bounded even when every entry is fresh. An evicted key may
/// re-fire before its window elapses; suppression is best-effort under that
/// kind of pressure.
#[derive(Debug)]
pub struct DebounceCache {
    window: Duration,
    capacity: usize,
    entries: HashMap<String, Instant>,
}

impl DebounceCache {
    /// Creates a cache with the given suppression window and entry capacity
    pub fn new(window: Duration, capacity: usize) -> Self {
        Self {
            window,
            capacity,
            entries: HashMap::new(),
        }
    }

    /// Whether an event with this key fired less than one window before `now`
    pub fn should_suppress(&self, key: &str, now: Instant) -> bool {
        match self.entries.get(key) {
            Some(&last) => now.duration_since(last) < self.window,
            None => false,
        }
    }

    /// Records a firing of `key` at `now` and runs cache maintenance
    pub fn record(&mut self, key: String, now: Instant) {
        self.entries.insert(key, now);

        if self.entries.len() > self.capacity {
            self.sweep(now);
            self.evict_oldest();
        }
    }

    /// Removes every entry strictly older than `now` minus the window
    pub fn sweep(&mut self, now: Instant) {
        if let Some(cutoff) = now.checked_sub(self.window) {
            self.entries.retain(|_, &mut fired| fired >= cutoff);
        }
    }

    /// Evicts oldest-first until the map is back at capacity
    fn evict_oldest(&mut self) {
        if self.entries.len() <= self.capacity {
            return;
        }

        let mut stamped: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|(key, &fired)| (key.clone(), fired))
            .collect();
        stamped.sort_by_key(|&(_, fired)| fired);

        let excess = self.entries.len() - self.capacity;
        for (key, _) in stamped.into_iter().take(excess) {
            self.entries.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(2000);

    fn cache() -> DebounceCache {
        DebounceCache::new(WINDOW, 100)
    }

    #[test]
    fn test_suppresses_repeat_within_window() {
        let mut cache = cache();
        let t0 = Instant::now();

        cache.record("page_view-p1--".to_string(), t0);

        assert!(cache.should_suppress("page_view-p1--", t0));
        assert!(cache.should_suppress("page_view-p1--", t0 + Duration::from_millis(1999)));
    }

    #[test]
    fn test_window_boundary_fires_again() {
        let mut cache = cache();
        let t0 = Instant::now();

        cache.record("k".to_string(), t0);

        // Exactly one window later the key is eligible again
        assert!(!cache.should_suppress("k", t0 + WINDOW));
        assert!(!cache.should_suppress("k", t0 + WINDOW + Duration::from_millis(500)));
    }

    #[test]
    fn test_distinct_keys_do_not_suppress_each_other() {
        let mut cache = cache();
        let t0 = Instant::now();

        cache.record("marker_click-p1--".to_string(), t0);

        assert!(!cache.should_suppress("marker_click-p2--", t0));
        assert!(!cache.should_suppress("direction_click-p1--", t0));
    }

    #[test]
    fn test_sweep_drops_only_entries_older_than_cutoff() {
        let mut cache = cache();
        let t0 = Instant::now();

        cache.record("old".to_string(), t0);
        cache.record("fresh".to_string(), t0 + Duration::from_millis(500));

        cache.sweep(t0 + Duration::from_millis(2100));

        assert_eq!(cache.len(), 1);
        assert!(cache.should_suppress("fresh", t0 + Duration::from_millis(2100)));
        assert!(!cache.should_suppress("old", t0 + Duration::from_millis(2100)));
    }

    #[test]
    fn test_sweep_keeps_entry_exactly_at_cutoff() {
        let mut cache = cache();
        let t0 = Instant::now();

        cache.record("boundary".to_string(), t0);

        // Cutoff is t0 itself; "older than" is strict, so the entry survives
        cache.sweep(t0 + WINDOW);
        assert_eq!(cache.len(), 1);

        cache.sweep(t0 + WINDOW + Duration::from_millis(1));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_bounds_cache_with_all_fresh_entries() {
        let mut cache = cache();
        let t0 = Instant::now();

        // 150 distinct keys in rapid succession, all inside one window
        for i in 0..150 {
            cache.record(format!("page_view-p{i}--"), t0 + Duration::from_millis(i));
        }

        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn test_eviction_removes_oldest_first() {
        let mut cache = DebounceCache::new(WINDOW, 2);
        let t0 = Instant::now();

        cache.record("first".to_string(), t0);
        cache.record("second".to_string(), t0 + Duration::from_millis(10));
        cache.record("third".to_string(), t0 + Duration::from_millis(20));

        assert_eq!(cache.len(), 2);
        let now = t0 + Duration::from_millis(30);
        assert!(!cache.should_suppress("first", now));
        assert!(cache.should_suppress("second", now));
        assert!(cache.should_suppress("third", now));
    }

    #[test]
    fn test_expired_entries_swept_before_fresh_ones_evicted() {
        let mut cache = DebounceCache::new(WINDOW, 2);
        let t0 = Instant::now();

        cache.record("stale_a".to_string(), t0);
        cache.record("stale_b".to_string(), t0 + Duration::from_millis(10));

        // Both earlier entries have expired by now; the sweep alone makes room
        let late = t0 + Duration::from_millis(3000);
        cache.record("live".to_string(), late);

        assert_eq!(cache.len(), 1);
        assert!(cache.should_suppress("live", late));
    }
}
