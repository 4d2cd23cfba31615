use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::Response;

/// # ResponseStream
///
/// The controller's end of a worker's outbound channel.
///
/// `ResponseStream` implements the `Stream` trait from the `futures` crate,
/// so it works with stream combinators and async iteration, and it also
/// offers a plain [`recv`](ResponseStream::recv) method for callers that
/// prefer the channel style.
///
/// ## Ordering
///
/// Responses arrive in the exact order their requests were accepted by the
/// worker; the stream never reorders them.
///
/// ## Termination
///
/// The stream yields `None` once the worker has terminated and every
/// already-emitted response has been consumed. A `None` is the channel-closed
/// signal: after it, no request submitted to that worker will ever be
/// answered.
pub struct ResponseStream<O> {
    /// The underlying channel receiver
    receiver: mpsc::UnboundedReceiver<Response<O>>,
}

impl<O> ResponseStream<O> {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<Response<O>>) -> Self {
        Self { receiver }
    }

    /// Receives the next response, or `None` once the worker has terminated.
    pub async fn recv(&mut self) -> Option<Response<O>> {
        self.receiver.recv().await
    }
}

impl<O> Stream for ResponseStream<O> {
    type Item = Response<O>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().receiver).poll_recv(cx)
    }
}
