use uuid::Uuid;

use crate::error::InferenceError;

/// # Response
///
/// The outbound message type: the outcome of exactly one request.
///
/// Workers emit exactly one `Response` per accepted request, in the order the
/// requests arrived. The id matches the one returned by
/// [`WorkerContext::submit`](crate::worker::WorkerContext::submit), and the
/// payload is either the engine output or the typed error that failed this
/// particular request.
///
/// ## Type Parameters
///
/// * `O` - The engine output type carried on success
#[derive(Debug)]
pub struct Response<O> {
    /// Id of the request this response answers
    id: Uuid,

    /// The inference outcome for that request
    result: Result<O, InferenceError>,
}

impl<O> Response<O> {
    pub(crate) fn new(id: Uuid, result: Result<O, InferenceError>) -> Self {
        Self { id, result }
    }

    /// Id of the request this response answers.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Borrows the inference outcome.
    pub fn result(&self) -> &Result<O, InferenceError> {
        &self.result
    }

    /// Consumes the response, yielding the inference outcome.
    pub fn into_result(self) -> Result<O, InferenceError> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let id = Uuid::new_v4();
        let response = Response::new(id, Ok(7i64));

        assert_eq!(response.id(), id);
        assert_eq!(response.result().as_ref().unwrap(), &7);
        assert_eq!(response.into_result().unwrap(), 7);
    }

    #[test]
    fn test_error_response_carries_kind() {
        let response: Response<i64> = Response::new(
            Uuid::new_v4(),
            Err(InferenceError::InvalidInput("empty".to_string())),
        );

        match response.into_result() {
            Err(err) => assert_eq!(err.kind(), "invalid_input"),
            Ok(_) => panic!("expected an error response"),
        }
    }
}
