//! External collaborators: identity, remote sink, local store, connectivity

mod client;
mod connectivity;
mod identity;
mod store;
mod traits;

pub use client::HttpSink;
pub use connectivity::{TcpProbe, DEFAULT_PROBE_TIMEOUT};
pub use identity::LocalIdentityService;
pub use store::FileStore;
pub use traits::{Ack, ConnectivityOracle, IdentityService, LocalStore, SubmissionSink};

#[cfg(test)]
pub use traits::{MockConnectivityOracle, MockIdentityService, MockLocalStore, MockSubmissionSink};
