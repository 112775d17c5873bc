use std::sync::atomic::{AtomicU64, Ordering};

/// Per-engine call counter that keeps the Nth recorded call aligned with the
/// Nth replayed one.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    next: AtomicU64,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }

    /// Increment by one and return the value that was current, which becomes
    /// the caller's sequence number. Concurrent callers never share a value.
    pub fn advance(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.next.store(0, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::SequenceCounter;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    #[test]
    fn advance_returns_previous_value_and_reset_restarts() {
        let counter = SequenceCounter::new();
        assert_eq!(counter.current(), 0);
        assert_eq!(counter.advance(), 0);
        assert_eq!(counter.advance(), 1);
        assert_eq!(counter.current(), 2);
        counter.reset();
        assert_eq!(counter.current(), 0);
    }

    #[test]
    fn concurrent_advances_are_never_lost() {
        let counter = Arc::new(SequenceCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || (0..100).map(|_| counter.advance()).collect::<Vec<_>>())
            })
            .collect();
        let mut seen = BTreeSet::new();
        for handle in handles {
            for value in handle.join().expect("join") {
                assert!(seen.insert(value), "duplicate sequence {value}");
            }
        }
        assert_eq!(seen.len(), 800);
        assert_eq!(counter.current(), 800);
        assert_eq!(seen.iter().next_back().copied(), Some(799));
    }
}
