use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use crate::communication::{Request, ResponseStream};
use crate::engine::{EngineInput, EngineOutput, InferenceModule};
use crate::error::Terminated;
use crate::source::ModuleSource;
use crate::worker::handle::WorkerHandle;
use crate::worker::run::worker_loop;
use crate::worker::state::LifecycleState;

/// The controller-facing handle to one isolated worker.
///
/// Spawning a context starts a background task that exclusively owns one
/// engine: it fetches the binary module from the given source, loads it,
/// and then serves requests strictly one at a time in arrival order. All
/// data crosses the task boundary by value; the controller never shares
/// memory with the worker.
///
/// Submitting is non-blocking. Requests submitted while the module is still
/// loading are buffered and replayed in order once the worker is ready.
/// Exactly one [`Response`](crate::Response) is emitted per accepted
/// request, on the stream returned by [`spawn`](WorkerContext::spawn), in
/// the same order the requests were submitted.
///
/// Dropping the context shuts the worker down; the worker finishes the
/// invocation it is currently executing before it stops.
///
/// # Example
///
/// ```ignore
/// use kamado::{StaticModuleSource, WorkerContext};
///
/// let source = StaticModuleSource::new(model_bytes);
/// let (context, mut responses) = WorkerContext::<MyModule>::spawn(source);
///
/// let id = context.submit(input)?;
///
/// while let Some(response) = responses.recv().await {
///     assert_eq!(response.id(), id);
///     println!("{:?}", response.into_result());
/// }
/// ```
pub struct WorkerContext<M: InferenceModule> {
    inbox: mpsc::UnboundedSender<Request<EngineInput<M>>>,
    state: watch::Receiver<LifecycleState>,
    handle: WorkerHandle,
}

impl<M: InferenceModule> WorkerContext<M> {
    /// Spawns a worker that loads its module from `source`, returning the
    /// context and the stream its responses arrive on.
    ///
    /// Module loading starts immediately; the context is usable right away,
    /// and anything submitted before loading finishes is buffered.
    pub fn spawn<S>(source: S) -> (Self, ResponseStream<EngineOutput<M>>)
    where
        S: ModuleSource,
    {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(LifecycleState::Uninitialized);

        let handle = WorkerHandle::new(move |running, notifier| {
            tokio::spawn(worker_loop::<M, S>(
                source,
                running,
                notifier,
                inbox_rx,
                outbound_tx,
                state_tx,
            ))
        });

        (
            Self {
                inbox: inbox_tx,
                state: state_rx,
                handle,
            },
            ResponseStream::new(outbound_rx),
        )
    }

    /// Submits one inference request without blocking.
    ///
    /// Returns the id that the matching response will echo. Fails only when
    /// the worker has already terminated and can accept no further requests.
    pub fn submit(&self, input: EngineInput<M>) -> Result<Uuid, Terminated> {
        let request = Request::new(input);
        let id = request.id();
        self.inbox.send(request).map_err(|_| Terminated)?;
        Ok(id)
    }

    /// A snapshot of the worker's lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Waits until the worker is serving requests.
    ///
    /// Fails if the worker terminates first, which is how a fatal module
    /// load failure surfaces here. Waiting is never required before
    /// [`submit`](WorkerContext::submit); it only offers a synchronization
    /// point to controllers that want one.
    pub async fn wait_ready(&self) -> Result<(), Terminated> {
        let mut state = self.state.clone();
        loop {
            let current = *state.borrow_and_update();
            if current.is_serving() {
                return Ok(());
            }
            if current == LifecycleState::Terminated {
                return Err(Terminated);
            }
            if state.changed().await.is_err() {
                return Err(Terminated);
            }
        }
    }

    /// Initiates a graceful shutdown of the worker.
    ///
    /// The worker finishes the invocation it is currently executing, then
    /// stops; the response stream closes once it is gone. Also runs on drop.
    pub fn shutdown(&mut self) {
        self.handle.shutdown();
    }
}
