use std::{
    borrow::Cow,
    fmt::{self, Display},
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use futures::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn, Instrument};

use crate::notify_once::NotifyOnce;

/// Errors that can occur while joining [`RouterTask`]s.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Static task finished prematurely: {name}")]
    PrematureFinish { name: Cow<'static, str> },
    #[error("Some tasks failed to finish on time: {hung_tasks:?}")]
    Hung { hung_tasks: Vec<String> },
}

/// Waits on a set of "static" (run-forever) tasks alongside a shutdown
/// signal. If any static task finishes prematurely, shutdown is triggered so
/// the rest of the system doesn't keep running in a partially-failed state.
/// After shutdown, all tasks are given `shutdown_timeout` to wind down.
pub async fn try_join_tasks_and_shutdown(
    static_tasks: Vec<RouterTask<()>>,
    mut shutdown: NotifyOnce,
    shutdown_timeout: Duration,
) -> Result<(), Error> {
    if static_tasks.is_empty() {
        shutdown.recv().await;
        return Ok(());
    }

    let mut tasks = static_tasks
        .into_iter()
        .map(RouterTask::logged)
        .collect::<FuturesUnordered<_>>();

    let mut result = Ok(());

    loop {
        tokio::select! {
            biased;
            () = shutdown.recv() => break,
            Some(name) = tasks.next() => {
                result = Err(Error::PrematureFinish { name });
                break shutdown.send();
            }
        }
    }

    let shutdown_timeout_fut = tokio::time::sleep(shutdown_timeout);
    tokio::pin!(shutdown_timeout_fut);

    while !tasks.is_empty() {
        tokio::select! {
            Some(_name) = tasks.next() => (),
            () = &mut shutdown_timeout_fut => {
                let hung_tasks = tasks
                    .iter()
                    .map(|task| task.name().to_owned())
                    .collect::<Vec<_>>();
                return Err(Error::Hung { hung_tasks });
            }
        }
    }

    result
}

/// Shorthand to call [`try_join_tasks_and_shutdown`] and log the outcome,
/// for callsites that need a `Future<Output = ()> + Send + 'static`.
pub async fn join_tasks_and_shutdown(
    name: &str,
    static_tasks: Vec<RouterTask<()>>,
    shutdown: NotifyOnce,
    shutdown_timeout: Duration,
) {
    match try_join_tasks_and_shutdown(static_tasks, shutdown, shutdown_timeout).await {
        Ok(()) => info!("{name} tasks finished."),
        Err(e) => error!("{name} tasks errored: {e:#}"),
    }
}

/// A thin wrapper around [`tokio::task::JoinHandle`] that propagates panics
/// instead of catching them, and is `#[must_use]` so spawned tasks can't be
/// silently dropped. Use [`RouterTask::detach`] when that's intentional.
#[must_use]
pub struct RouterTask<T> {
    task: JoinHandle<T>,
    name: Cow<'static, str>,
}

/// A future wrapping [`RouterTask`] that logs its name and outcome when it
/// finishes. The inner `T` is discarded; the output is the task's name.
pub struct LoggedRouterTask<T>(RouterTask<T>);

struct TaskOutputDisplay<'a> {
    name: &'a str,
    result: Result<(), &'a tokio::task::JoinError>,
}

impl<T> RouterTask<T> {
    pub fn from_tokio(handle: JoinHandle<T>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            task: handle,
            name: name.into(),
        }
    }

    /// Spawns a named task which inherits the current tracing span.
    #[inline]
    pub fn spawn<F>(name: impl Into<Cow<'static, str>>, future: F) -> RouterTask<F::Output>
    where
        F: Future<Output = T> + Send + 'static,
        F::Output: Send + 'static,
    {
        let span = tracing::Span::current();
        let name = name.into();
        debug!("Spawning task: {name}");
        RouterTask {
            task: tokio::spawn(future.instrument(span)),
            name,
        }
    }

    /// Drops the task handle, detaching it so it keeps running in the
    /// background without a way to join it.
    #[inline]
    pub fn detach(self) {
        std::mem::drop(self)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Instruments this task so that its result is logged when it finishes.
    #[inline]
    pub fn logged(self) -> LoggedRouterTask<T> {
        LoggedRouterTask(self)
    }

    #[inline]
    pub fn abort(&self) {
        self.task.abort();
    }
}

impl<T> Future for RouterTask<T> {
    type Output = Result<T, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let result = match Pin::new(&mut self.task).poll(cx) {
            Poll::Ready(result) => result,
            Poll::Pending => return Poll::Pending,
        };

        let result = match result {
            Ok(val) => Ok(val),
            Err(join_err) => match join_err.try_into_panic() {
                Ok(panic_reason) => {
                    error!("Task '{name}' panicked!", name = self.name());
                    std::panic::resume_unwind(panic_reason)
                }
                Err(join_err) => Err(join_err),
            },
        };

        Poll::Ready(result)
    }
}

impl<T> LoggedRouterTask<T> {
    #[inline]
    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl<T> Future for LoggedRouterTask<T> {
    type Output = Cow<'static, str>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(|result| {
            let msg = TaskOutputDisplay {
                name: self.name(),
                result: result.as_ref().map(|_| ()),
            };

            match &result {
                Ok(_) => info!("{msg}"),
                Err(e) if e.is_cancelled() => warn!("{msg}"),
                Err(e) if e.is_panic() => error!("{msg}"),
                Err(_) => warn!("{msg}"),
            };

            self.0.name.clone()
        })
    }
}

impl Display for TaskOutputDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join_label = match &self.result {
            Ok(_) => "finished",
            Err(e) if e.is_cancelled() => "cancelled",
            Err(e) if e.is_panic() => "panicked",
            _ => "(unknown join error)",
        };

        let name = self.name;
        write!(f, "Task '{name}' {join_label}")?;

        if let Err(e) = self.result {
            write!(f, ": {e:#}")?;
        }

        Ok(())
    }
}
