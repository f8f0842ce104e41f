//! Declaration-order counter.
//!
//! Every [`Middleware`](crate::Middleware) carries a sequence number drawn
//! from a [`Sequence`] at construction time. The number is only ever used as
//! a tie-breaker between entries of equal priority, so what matters is that
//! numbers from one counter are unique and strictly increasing.
//!
//! The counter is owned by whoever registers middleware (normally a
//! [`Registry`](crate::Registry)) and passed in explicitly. There is no
//! process-wide hidden counter: two registries never influence each other,
//! and tests get deterministic numbers starting from zero.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonic, thread-safe source of sequence numbers.
///
/// Share it between threads with `Arc<Sequence>`. Concurrent calls to
/// [`next`](Sequence::next) never hand out the same number twice.
#[derive(Debug, Default)]
pub struct Sequence {
    next: AtomicU64,
}

impl Sequence {
    /// A counter whose first number is `0`.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// A counter whose first number is `first`.
    ///
    /// `u64::MAX` is never handed out, so at most `u64::MAX - first` numbers
    /// are available.
    pub fn starting_at(first: u64) -> Self {
        Self { next: AtomicU64::new(first) }
    }

    /// Hands out the next number and advances the counter.
    ///
    /// The update is a single atomic read-modify-write, so every caller
    /// observes a distinct value. The counter guards no other memory.
    ///
    /// # Panics
    ///
    /// Panics once the counter reaches `u64::MAX` instead of wrapping back
    /// to zero.
    pub fn next(&self) -> u64 {
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .unwrap_or_else(|n| panic!("middleware sequence exhausted at {n}"))
    }

    /// The number the next call to [`next`](Sequence::next) will return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
