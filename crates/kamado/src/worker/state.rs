/// Lifecycle of a worker execution context.
///
/// Published through a watch channel so a controller can observe the worker
/// without sharing memory with it. `Busy` is entered for the duration of one
/// engine invocation and always returns to `Ready` before the next request
/// is taken.
///
/// `Terminated` is terminal: it is reached by explicit shutdown, by dropping
/// the context, or by a fatal module load failure. A worker that failed to
/// load never passes through `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Created, module loading not yet started
    Uninitialized,

    /// Fetching and compiling the binary module
    Loading,

    /// Engine constructed, waiting for the next request
    Ready,

    /// One invocation in flight
    Busy,

    /// Worker is gone; no further messages are processed
    Terminated,
}

impl LifecycleState {
    /// Whether the worker has an engine and is serving requests.
    pub fn is_serving(&self) -> bool {
        matches!(self, Self::Ready | Self::Busy)
    }
}
