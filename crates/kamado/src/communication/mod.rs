mod request;
mod response;
mod response_stream;

pub(crate) use request::Request;
pub use response::Response;
pub use response_stream::ResponseStream;
