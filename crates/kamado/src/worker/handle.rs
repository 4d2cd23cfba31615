//! Module for managing the worker's background task.

use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use tokio::{task::JoinHandle, sync::Notify};

/// A handle for managing the background task a worker runs in.
///
/// This struct provides a convenient way to spawn, manage, and gracefully
/// shut down the long-running worker task in the Tokio runtime. The task is
/// handed a running flag to poll and a notifier that wakes it when the flag
/// changes.
///
/// # Example
///
/// ```ignore
/// use std::sync::atomic::Ordering;
///
/// async fn example() {
///     let worker = WorkerHandle::new(|running, notifier| {
///         tokio::spawn(async move {
///             while running.load(Ordering::SeqCst) {
///                 // Serve one request, or wait to be woken
///                 notifier.notified().await;
///             }
///             println!("Worker stopped");
///         })
///     });
///
///     // Worker will be automatically shut down when dropped
/// }
/// ```
pub struct WorkerHandle {
    /// Flag indicating whether the background task should continue running
    running: Arc<AtomicBool>,

    /// Handle to the spawned task, becomes `None` after shutdown is initiated
    handle: Option<JoinHandle<()>>,

    /// Notification mechanism to wake up the background task
    notifier: Arc<Notify>,
}

impl WorkerHandle {
    /// Creates a new `WorkerHandle` by spawning a background task.
    ///
    /// # Parameters
    ///
    /// * `task` - A function that takes a running flag and a notifier, and
    ///   returns a `JoinHandle`. This function is responsible for creating
    ///   and spawning the actual background task.
    ///
    /// # Returns
    ///
    /// A new `WorkerHandle` instance with the task running.
    pub fn new<F>(task: F) -> Self
    where
        F: FnOnce(Arc<AtomicBool>, Arc<Notify>) -> JoinHandle<()> + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let notifier = Arc::new(Notify::new());
        let handle = task(running.clone(), notifier.clone());

        Self {
            running,
            handle: Some(handle),
            notifier,
        }
    }

    #[allow(dead_code)]
    /// Returns a clone of the atomic boolean that indicates whether the task
    /// should continue running.
    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Initiates a graceful shutdown of the background task.
    ///
    /// This method:
    /// 1. Sets the running flag to `false`
    /// 2. Notifies the task to wake up (so it can observe that it should stop)
    /// 3. Takes ownership of the task handle and spawns a separate task to
    ///    await its completion
    ///
    /// The worker finishes the invocation it is currently executing, if any,
    /// before it observes the flag.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.notifier.notify_one();

        if let Some(handle) = self.handle.take() {
            tokio::spawn(async move {
                let _ = handle.await;
            });
        }
    }
}

impl Drop for WorkerHandle {
    /// Ensures the background task is properly terminated when the handle is
    /// dropped.
    fn drop(&mut self) {
        self.shutdown();
    }
}
