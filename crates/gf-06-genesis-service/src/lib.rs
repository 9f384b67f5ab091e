//! # Genesis Service Client (GF-06)
//!
//! Optional round trip with the external genesis-parameter service.
//!
//! | Call | Request | Failure |
//! |------|---------|---------|
//! | [`GenesisServiceClient::ping`] | `GET /` | [`ServiceError::Unavailable`] |
//! | [`GenesisServiceClient::submit`] | `POST /genesis` | [`ServiceError::Rejected`] with the body verbatim |

pub mod client;
pub mod errors;

pub use client::GenesisServiceClient;
pub use errors::ServiceError;
