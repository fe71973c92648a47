// sirs-api: async REST client for the appliance retail/service backend.
//
// Bearer-token sessions live in an injected `SessionContext`; list endpoints
// are normalised from either wire shape into plain vectors.

pub mod client;
mod endpoints;
pub mod envelope;
pub mod error;
pub mod models;
pub mod session;
pub mod transport;

pub use client::ApiClient;
pub use envelope::{ListEnvelope, PagedList};
pub use error::Error;
pub use session::{Session, SessionContext, TokenStatus};
pub use transport::{TlsMode, TransportConfig};
