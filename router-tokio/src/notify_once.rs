use std::sync::Arc;

use tokio::sync::Semaphore;

/// Synchronization utility which sends a notification to all consumers
/// *once*, most commonly used for shutdown signals.
///
/// - Multi-producer and multi-consumer: clone to get another handle.
/// - Every clone observes a signal at-most-once, even if the signal was sent
///   before the clone existed.
/// - Safe to send a signal multiple times.
///
/// Implementation (ab)uses the fact that calling [`acquire`] on a
/// [`Semaphore`] with 0 permits only returns once the semaphore has been
/// closed.
///
/// [`acquire`]: Semaphore::acquire
#[derive(Debug)]
pub struct NotifyOnce {
    inner: Arc<Semaphore>,
    have_recved: bool,
}

impl NotifyOnce {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Semaphore::new(0)),
            have_recved: false,
        }
    }

    /// Send a signal, waking all actors currently waiting on [`recv`].
    ///
    /// [`recv`]: Self::recv
    pub fn send(&self) {
        self.inner.close();
    }

    /// Wait for a signal.
    ///
    /// If this handle has already observed a signal, this future never
    /// resolves again; clone a fresh handle to observe it a second time.
    pub async fn recv(&mut self) {
        if self.have_recved {
            std::future::pending().await
        } else {
            self.inner
                .acquire()
                .await
                .map_err(|_| ())
                .expect_err("Shouldn't've been able to acquire a permit");
            self.have_recved = true;
        }
    }

    /// Immediately returns whether a signal has been sent, without consuming
    /// it for a later call to [`recv`](Self::recv).
    #[must_use]
    pub fn try_recv(&self) -> bool {
        self.inner.is_closed()
    }
}

impl Clone for NotifyOnce {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            have_recved: false,
        }
    }
}

#[cfg(test)]
mod test {
    use tokio_test::{assert_pending, assert_ready};

    use super::*;

    #[test]
    fn multiple_sends_doesnt_panic() {
        let shutdown = NotifyOnce::new();
        shutdown.send();
        shutdown.send();
    }

    #[test]
    fn only_yields_shutdown_once() {
        let shutdown1 = NotifyOnce::new();
        let mut shutdown2 = shutdown1.clone();

        let mut recv_task = tokio_test::task::spawn(shutdown2.recv());
        assert_pending!(recv_task.poll());

        shutdown1.send();

        assert!(recv_task.is_woken());
        assert_ready!(recv_task.poll());
        drop(recv_task);

        // A second recv on the same handle never resolves again.
        let mut recv_task2 = tokio_test::task::spawn(shutdown2.recv());
        assert_pending!(recv_task2.poll());

        // But a fresh clone gets its own chance to observe the signal.
        let shutdown3 = shutdown2.clone();
        assert!(shutdown3.try_recv());
    }
}
