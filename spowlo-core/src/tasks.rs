//! Background work owned by a screen.
//!
//! A [`ScreenScope`] spawns tasks on the tokio runtime and hands back
//! [`ScreenTask`] handles that the UI thread polls each frame. Dropping or
//! cancelling the scope stops every task it spawned; dropping a handle
//! aborts its task.

use std::future::Future;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of polling a [`ScreenTask`].
#[derive(Debug, PartialEq, Eq)]
pub enum TaskPoll<T> {
    Pending,
    Ready(T),
    /// The task ended without producing a result (cancelled or panicked),
    /// or its result was already taken.
    Lost,
}

/// Owns the cancellation token for one screen's tasks.
#[derive(Debug)]
pub struct ScreenScope {
    name: &'static str,
    runtime: Handle,
    token: CancellationToken,
}

impl ScreenScope {
    pub fn new(name: &'static str, runtime: Handle) -> Self {
        Self {
            name,
            runtime,
            token: CancellationToken::new(),
        }
    }

    /// Spawn `future` on the runtime, tied to this scope.
    pub fn spawn<T, F>(&self, task: &'static str, future: F) -> ScreenTask<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let token = self.token.clone();
        let scope = self.name;

        let handle = self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(scope, task, "Task cancelled");
                }
                output = future => {
                    // The receiver is gone if the screen was left.
                    let _ = tx.send(output);
                }
            }
        });

        debug!(scope, task, "Task spawned");
        ScreenTask {
            name: task,
            rx: Some(rx),
            handle,
        }
    }

    /// A token cancelled together with this scope, for work that checks it
    /// directly (e.g. streaming downloads).
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            debug!(scope = self.name, "Cancelling screen scope");
            self.token.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Handle to one background task's eventual result.
#[derive(Debug)]
pub struct ScreenTask<T> {
    name: &'static str,
    rx: Option<oneshot::Receiver<T>>,
    handle: JoinHandle<()>,
}

impl<T> ScreenTask<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Non-blocking check for the result. `Ready` is returned at most once.
    pub fn poll(&mut self) -> TaskPoll<T> {
        let Some(rx) = self.rx.as_mut() else {
            return TaskPoll::Lost;
        };
        match rx.try_recv() {
            Ok(value) => {
                self.rx = None;
                TaskPoll::Ready(value)
            }
            Err(oneshot::error::TryRecvError::Empty) => TaskPoll::Pending,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.rx = None;
                TaskPoll::Lost
            }
        }
    }

    /// Wait for the result. `None` if the task was cancelled.
    pub async fn join(mut self) -> Option<T> {
        let rx = self.rx.take()?;
        rx.await.ok()
    }
}

impl<T> Drop for ScreenTask<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
