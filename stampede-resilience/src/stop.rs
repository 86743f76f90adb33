//! Cooperative stop signal
//!
//! A [`StopSource`] is held by whoever may end the run early (the CLI on
//! Ctrl-C, the orchestrator on a fatal error). Every agent task holds a
//! cloned [`StopToken`] and checks it between actions; in-flight requests are
//! never interrupted.

use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// Reason a stop was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Requested by the operator, e.g. Ctrl-C
    Requested,
    /// Requested because the run cannot continue
    Aborted,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Requested => write!(f, "requested"),
            StopReason::Aborted => write!(f, "aborted"),
        }
    }
}

/// Owning side of the stop signal
#[derive(Debug)]
pub struct StopSource {
    sender: watch::Sender<Option<StopReason>>,
}

impl Default for StopSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSource {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    /// Hand out a token observing this source
    pub fn token(&self) -> StopToken {
        StopToken {
            receiver: self.sender.subscribe(),
        }
    }

    /// Signal every token. Only the first reason is kept.
    pub fn stop(&self, reason: StopReason) {
        let changed = self.sender.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(reason);
                true
            } else {
                false
            }
        });
        if changed {
            info!("Stop signalled ({})", reason);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.sender.borrow().is_some()
    }
}

/// Observing side of the stop signal
#[derive(Debug, Clone)]
pub struct StopToken {
    receiver: watch::Receiver<Option<StopReason>>,
}

impl StopToken {
    /// A token that is never signalled
    pub fn never() -> Self {
        StopSource::new().token()
    }

    pub fn is_stopped(&self) -> bool {
        self.receiver.borrow().is_some()
    }

    pub fn reason(&self) -> Option<StopReason> {
        *self.receiver.borrow()
    }

    /// Resolve once a stop is signalled.
    ///
    /// If the source is dropped without signalling this never resolves.
    pub async fn stopped(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(Option::is_some).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Sleep for `duration` unless stopped first.
    ///
    /// Returns `true` if the full duration elapsed, `false` on stop.
    pub async fn sleep_or_stop(&self, duration: Duration) -> bool {
        if self.is_stopped() {
            return false;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.stopped() => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_reason_wins() {
        let source = StopSource::new();
        let token = source.token();
        assert!(!token.is_stopped());

        source.stop(StopReason::Requested);
        source.stop(StopReason::Aborted);

        assert!(token.is_stopped());
        assert!(source.is_stopped());
        assert_eq!(token.reason(), Some(StopReason::Requested));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_completes_without_stop() {
        let source = StopSource::new();
        let token = source.token();
        assert!(token.sleep_or_stop(Duration::from_secs(3)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_interrupted_by_stop() {
        let source = StopSource::new();
        let token = source.token();
        let started = tokio::time::Instant::now();

        let sleeper = tokio::spawn({
            let token = token.clone();
            async move { token.sleep_or_stop(Duration::from_secs(60)).await }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        source.stop(StopReason::Requested);

        assert!(!sleeper.await.unwrap());
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_source_does_not_stop() {
        let token = StopSource::new().token();
        assert!(token.sleep_or_stop(Duration::from_millis(50)).await);
        assert!(!token.is_stopped());
        assert!(StopToken::never().sleep_or_stop(Duration::from_millis(50)).await);
    }
}
