//! Shared building blocks for the event-ticketing platform services.
//!
//! Every service crate uses the same error taxonomy ([`Error`] /
//! [`ErrorKind`]), the same pagination normalization and the same health
//! endpoint, so cross-service behavior stays uniform without sharing any
//! domain types.

pub mod error;
pub mod health;
pub mod http;
pub mod pagination;

pub use error::{Error, ErrorKind, Result};
pub use pagination::PageRequest;
