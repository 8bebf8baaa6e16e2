//! HTTP transport: plain request/response data, a reqwest-backed client and the
//! split between HTTP failures and network failures.

mod client;
mod error;
mod method;

#[cfg(test)]
pub use client::MockTransport;
pub use client::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use error::{EXPIRED_TOKEN_MESSAGE, TransportError};
pub use method::Method;
