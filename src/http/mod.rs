mod error;
mod models;
mod transport;

pub use error::TransportError;
pub use models::{
    Credentials, HttpMethod, RequestBody, RequestSpec, ResponseCapture, JSON_CONTENT_TYPE,
};
pub use transport::{ReqwestTransport, Transport, DEFAULT_TIMEOUT};
