use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, watch, Notify};
use tracing::{debug, error, warn};

use crate::communication::{Request, Response};
use crate::engine::{EngineInput, EngineOutput, InferenceEngine, InferenceModule};
use crate::error::InferenceError;
use crate::source::ModuleSource;
use crate::worker::state::LifecycleState;

/// The worker task body: initialize the engine, then serve requests strictly
/// one at a time in arrival order until shut down.
///
/// Requests that arrive before initialization finishes simply sit in the
/// inbound channel, which makes the channel itself the startup buffer: they
/// are replayed in arrival order the moment the loop starts receiving. If
/// initialization fails, every buffered request is answered with a
/// not-ready error and the worker terminates without ever becoming ready.
pub(crate) async fn worker_loop<M, S>(
    source: S,
    running: Arc<AtomicBool>,
    notifier: Arc<Notify>,
    mut inbox: mpsc::UnboundedReceiver<Request<EngineInput<M>>>,
    outbound: mpsc::UnboundedSender<Response<EngineOutput<M>>>,
    state: watch::Sender<LifecycleState>,
) where
    M: InferenceModule,
    S: ModuleSource,
{
    let mut engine = match initialize::<M, S>(&source, &state).await {
        Ok(engine) => engine,
        Err(cause) => {
            error!(error = %cause, "module load failed, terminating worker");
            fail_buffered(&mut inbox, &outbound, &cause);
            let _ = state.send(LifecycleState::Terminated);
            return;
        }
    };

    let _ = state.send(LifecycleState::Ready);
    debug!("engine ready, accepting requests");

    while running.load(Ordering::SeqCst) {
        let request = tokio::select! {
            request = inbox.recv() => match request {
                Some(request) => request,
                // Every sender is gone; nothing further can arrive
                None => break,
            },
            // Woken by shutdown; loop back and re-check the running flag
            _ = notifier.notified() => continue,
        };

        let (id, input) = request.into_parts();
        let _ = state.send(LifecycleState::Busy);
        let result = engine.execute(input);
        let _ = state.send(LifecycleState::Ready);

        if let Err(err) = &result {
            warn!(request = %id, kind = err.kind(), error = %err, "request failed");
        }
        if outbound.send(Response::new(id, result)).is_err() {
            warn!(request = %id, "response receiver dropped, discarding result");
        }
    }

    let _ = state.send(LifecycleState::Terminated);
    debug!("worker terminated");
}

/// Fetch, load, construct. The expensive part of a worker's life, done once.
async fn initialize<M, S>(
    source: &S,
    state: &watch::Sender<LifecycleState>,
) -> Result<M::Engine, InferenceError>
where
    M: InferenceModule,
    S: ModuleSource,
{
    let _ = state.send(LifecycleState::Loading);

    let bytes = source.fetch().await?;
    debug!(bytes = bytes.len(), "module bytes fetched");

    let module = M::load(&bytes)?;
    module.construct()
}

/// Answers every request buffered during a failed startup with a not-ready
/// error, in arrival order. Closing the inbox first means no new request can
/// slip in behind the drain.
fn fail_buffered<I, O>(
    inbox: &mut mpsc::UnboundedReceiver<Request<I>>,
    outbound: &mpsc::UnboundedSender<Response<O>>,
    cause: &InferenceError,
) {
    inbox.close();
    while let Ok(request) = inbox.try_recv() {
        let (id, _) = request.into_parts();
        let err = InferenceError::NotReady(format!("engine never became ready: {cause}"));
        warn!(request = %id, "failing buffered request after load failure");
        let _ = outbound.send(Response::new(id, Err(err)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_fail_buffered_answers_every_request_in_order() {
        let (req_tx, mut req_rx) = mpsc::unbounded_channel::<Request<Vec<i64>>>();
        let (res_tx, mut res_rx) = mpsc::unbounded_channel::<Response<i64>>();

        let mut ids: Vec<Uuid> = Vec::new();
        for n in 0..3 {
            let request = Request::new(vec![n]);
            ids.push(request.id());
            req_tx.send(request).unwrap();
        }

        let cause = InferenceError::ModuleLoad("corrupt graph".to_string());
        fail_buffered(&mut req_rx, &res_tx, &cause);

        for expected in ids {
            let response = res_rx.recv().await.unwrap();
            assert_eq!(response.id(), expected);
            match response.into_result() {
                Err(InferenceError::NotReady(detail)) => {
                    assert!(detail.contains("corrupt graph"));
                }
                other => panic!("expected NotReady, got {:?}", other),
            }
        }

        // The inbox is closed; late submits fail at the sender
        assert!(req_tx.send(Request::new(vec![9])).is_err());
    }
}
