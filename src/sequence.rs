use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one evaluation started by a [`Sequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Drops results of evaluations that were superseded while in flight.
///
/// One sequencer belongs to one field. Call [`begin`](Self::begin) before
/// each evaluation and pass the result through [`accept`](Self::accept) when
/// it completes; only the result for the newest ticket comes back out.
/// Shareable across threads and tasks.
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: AtomicU64,
}

impl Sequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new evaluation, superseding all earlier tickets.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` is still the newest one issued.
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// `Some(result)` if `ticket` is current, `None` if it went stale.
    pub fn accept<T>(&self, ticket: Ticket, result: T) -> Option<T> {
        if self.is_current(&ticket) {
            Some(result)
        } else {
            tracing::trace!(ticket = ticket.0, "discarding stale result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn tickets_increase() {
        let seq = Sequencer::new();
        let a = seq.begin();
        let b = seq.begin();
        assert!(b > a);
        assert!(!seq.is_current(&a));
        assert!(seq.is_current(&b));
    }

    #[test]
    fn stale_result_is_dropped() {
        let seq = Sequencer::new();
        let first = seq.begin();
        let second = seq.begin();
        assert_eq!(seq.accept(first, "old"), None);
        assert_eq!(seq.accept(second, "new"), Some("new"));
    }

    #[tokio::test]
    async fn out_of_order_completion() {
        let seq = Arc::new(Sequencer::new());

        let slow = {
            let seq = Arc::clone(&seq);
            let ticket = seq.begin();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(40)).await;
                seq.accept(ticket, "slow")
            })
        };
        let fast = {
            let seq = Arc::clone(&seq);
            let ticket = seq.begin();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                seq.accept(ticket, "fast")
            })
        };

        assert_eq!(fast.await.unwrap(), Some("fast"));
        assert_eq!(slow.await.unwrap(), None);
    }
}
