use std::collections::HashMap;

/// Fitness memo keyed by the canonical (pre-order) genome string.
///
/// Lives for one run and never evicts.
#[derive(Debug, Default)]
pub struct FitnessCache {
    data: HashMap<String, f64>,
    hits: usize,
    misses: usize,
}

impl FitnessCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a fitness, counting the hit or miss.
    pub fn get(&mut self, key: &str) -> Option<f64> {
        match self.data.get(key) {
            Some(fitness) => {
                self.hits += 1;
                Some(*fitness)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up without touching the counters.
    pub fn peek(&self, key: &str) -> Option<f64> {
        self.data.get(key).copied()
    }

    /// Insert if absent; an existing entry wins.
    pub fn insert(&mut self, key: String, fitness: f64) -> f64 {
        *self.data.entry(key).or_insert(fitness)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_and_misses() {
        let mut cache = FitnessCache::new();
        assert_eq!(cache.get("+12"), None);
        cache.insert("+12".to_string(), -4.0);
        assert_eq!(cache.get("+12"), Some(-4.0));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_insert_keeps_first_value() {
        let mut cache = FitnessCache::new();
        assert_eq!(cache.insert("a".to_string(), -1.0), -1.0);
        assert_eq!(cache.insert("a".to_string(), -2.0), -1.0);
        assert_eq!(cache.peek("a"), Some(-1.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_resets_entries_and_counters() {
        let mut cache = FitnessCache::new();
        cache.insert("*ab".to_string(), -1.0);
        cache.get("*ab");
        cache.get("+ab");

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!((cache.hits(), cache.misses()), (0, 0));
        assert_eq!(cache.peek("*ab"), None);
    }
}
