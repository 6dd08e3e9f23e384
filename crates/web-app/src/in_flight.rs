use std::{cell::Cell, rc::Rc};

use log::debug;

/// Allows at most one outstanding request per user action.
///
/// Clones share the same state, so a gate can be handed to every handler of the same action.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    pending: Rc<Cell<bool>>,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Awaits the request unless another request through this gate is still pending, in which
    /// case the request is dropped without being polled and `None` is returned.
    pub async fn run<F: Future>(&self, request: F) -> Option<F::Output> {
        if self.pending.replace(true) {
            debug!("request already in flight");
            return None;
        }
        let _guard = Guard(&self.pending);
        Some(request.await)
    }
}

struct Guard<'a>(&'a Cell<bool>);

impl Drop for Guard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[cfg(test)]
mod tests {
    use std::future::pending;

    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_run() {
        let gate = InFlight::new();

        assert_eq!(gate.run(async { 42 }).await, Some(42));
        assert!(!gate.is_pending());
        assert_eq!(gate.run(async { 43 }).await, Some(43));
    }

    #[tokio::test]
    async fn test_run_while_pending() {
        let gate = InFlight::new();
        let other = gate.clone();
        let polled = Cell::new(false);

        let (first, second) = tokio::join!(
            gate.run(async {
                tokio::task::yield_now().await;
                1
            }),
            other.run(async {
                polled.set(true);
                2
            }),
        );

        assert_eq!(first, Some(1));
        assert_eq!(second, None);
        assert!(!polled.get());
        assert!(!gate.is_pending());
    }

    #[tokio::test]
    async fn test_dropped_request_clears_gate() {
        let gate = InFlight::new();

        let pending_while_running = tokio::select! {
            biased;
            _ = gate.run(pending::<()>()) => unreachable!(),
            is_pending = async { gate.is_pending() } => is_pending,
        };

        assert!(pending_while_running);
        assert!(!gate.is_pending());
        assert_eq!(gate.run(async { "sent" }).await, Some("sent"));
    }
}
