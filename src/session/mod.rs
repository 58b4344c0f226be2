//! Platform sessions
//!
//! A [`SessionClient`] is created per wallet per batch. It signs in once,
//! keeps the session cookie current and exposes the platform's endpoints as
//! typed calls. Everything network-facing goes through [`HttpTransport`].

pub mod client;
pub mod cookie;
pub mod headers;
pub mod message;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{interpret_response, RequestSpec, Session, SessionClient};
pub use message::{generate_nonce, SignInMessage};
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, ReqwestTransportFactory,
    RequestBody, TransportFactory,
};
pub use types::{
    AccountAsset, BorrowPosition, EarnInfo, SessionInfo, SuppliedAsset, TokenDescriptor,
};
