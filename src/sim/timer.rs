//! Deferred actions on a monotonic real-time clock
//!
//! Actions are plain values checked against the clock at frame boundaries,
//! never closures. Whoever owns the scheduler decides what an action means,
//! and dropping the scheduler cancels everything still pending.

/// A scheduled action and when it becomes due
#[derive(Debug, Clone)]
struct Pending<A> {
    due_ms: f64,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    action: A,
}

/// Monotonic clock plus a list of pending actions
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    now_ms: f64,
    next_seq: u64,
    pending: Vec<Pending<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Current clock reading (ms since creation)
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Move the clock forward; negative or non-finite steps are ignored
    pub fn advance(&mut self, elapsed_ms: f64) {
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.now_ms += elapsed_ms;
        }
    }

    /// Run `action` once `delay_ms` has elapsed from now
    pub fn schedule(&mut self, delay_ms: f64, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due_ms: self.now_ms + delay_ms.max(0.0),
            seq,
            action,
        });
    }

    /// Remove and return every due action, earliest first
    pub fn take_due(&mut self) -> Vec<A> {
        let now = self.now_ms;
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due_ms <= now);
        self.pending = rest;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.action).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, pred: impl Fn(&A) -> bool) -> bool {
        self.pending.iter().any(|p| pred(&p.action))
    }

    /// Drop every pending action
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timers = Scheduler::new();
        timers.schedule(100.0, "flash");

        timers.advance(99.0);
        assert!(timers.take_due().is_empty());

        timers.advance(1.0);
        assert_eq!(timers.take_due(), vec!["flash"]);
        assert_eq!(timers.pending_count(), 0);
        // Fires exactly once
        timers.advance(1000.0);
        assert!(timers.take_due().is_empty());
    }

    #[test]
    fn test_due_order_and_ties() {
        let mut timers = Scheduler::new();
        timers.schedule(50.0, 'b');
        timers.schedule(10.0, 'a');
        timers.schedule(50.0, 'c');
        timers.advance(60.0);
        assert_eq!(timers.take_due(), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut timers: Scheduler<()> = Scheduler::new();
        timers.advance(10.0);
        timers.advance(-5.0);
        timers.advance(f64::NAN);
        assert_eq!(timers.now(), 10.0);
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = Scheduler::new();
        timers.schedule(0.0, 1);
        assert!(timers.is_pending(|a| *a == 1));
        timers.cancel_all();
        timers.advance(1.0);
        assert!(timers.take_due().is_empty());
    }
}
