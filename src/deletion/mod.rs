//! Account deletion — self-service removal of a user's data and identity.
//!
//! A single HTTP invocation runs a fixed two-phase protocol: authenticate
//! the caller with a request-scoped credential, then delete the profile
//! row and the identity record in that order with the privileged
//! credential. The ordering means a failure before the identity delete
//! always leaves the identity intact and the caller able to retry.

pub mod routes;
pub mod service;

pub use routes::{DeletionRouteState, deletion_routes};
pub use service::DeletionService;
