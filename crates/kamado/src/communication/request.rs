use uuid::Uuid;

/// # Request
///
/// The inbound message type: one inference input tagged with a unique id.
///
/// `Request` is the only thing that travels from a controller to its worker.
/// The id is minted when the request is created and echoed back verbatim on
/// the corresponding [`Response`](super::Response), which is how a controller
/// pairs results to inputs without any shared state.
///
/// ## Type Parameters
///
/// * `I` - The engine input payload carried by this request
#[derive(Debug)]
pub(crate) struct Request<I> {
    /// Unique identifier for this request
    id: Uuid,

    /// The input value to run through the engine
    input: I,
}

impl<I> Request<I> {
    /// Wraps an input payload with a freshly minted id.
    pub fn new(input: I) -> Self {
        Self {
            id: Uuid::new_v4(),
            input,
        }
    }

    /// Returns the id that will be echoed on the response.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Consumes the request, yielding its id and payload.
    pub fn into_parts(self) -> (Uuid, I) {
        (self.id, self.input)
    }
}
