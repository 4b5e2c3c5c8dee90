use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Concurrency-safe set of canonical URLs reported during one crawl run
///
/// Clones share the same underlying set. The only mutating operation is
/// [`VisitedSet::insert`], which checks membership and inserts under one lock,
/// so two workers can never both claim the same URL.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set stays consistent even if a holder panicked mid-insert
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically marks a canonical URL as visited
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not visited before and is now claimed by the caller
    /// * `false` - The URL was already visited
    pub fn insert(&self, canonical: &str) -> bool {
        let mut set = self.lock();
        if set.contains(canonical) {
            return false;
        }
        set.insert(canonical.to_string())
    }

    /// Advisory membership check
    ///
    /// The answer may be stale by the time the caller acts on it; use
    /// [`VisitedSet::insert`] as the gate.
    pub fn contains(&self, canonical: &str) -> bool {
        self.lock().contains(canonical)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_once() {
        let visited = VisitedSet::new();
        assert!(visited.insert("https://a.example/"));
        assert!(!visited.insert("https://a.example/"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let visited = VisitedSet::new();
        let other = visited.clone();

        assert!(visited.insert("https://a.example/x"));
        assert!(other.contains("https://a.example/x"));
        assert!(!other.insert("https://a.example/x"));
    }

    #[test]
    fn test_concurrent_inserts_claim_once() {
        let visited = VisitedSet::new();
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let visited = visited.clone();
                std::thread::spawn(move || visited.insert("https://a.example/race"))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|claimed| *claimed)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(visited.len(), 1);
    }
}
