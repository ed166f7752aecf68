//! Event catalog and ticket-stock service.
//!
//! Owns event records and their integer ticket-stock counters. Stock is
//! decremented exclusively through the store's atomic conditional update, so
//! two concurrent purchasers can never both succeed in over-drawing the same
//! event's stock.
//!
//! # Layout
//!
//! - [`domain`]: the `Event` entity and its identifier
//! - [`store`]: the `EventStore` contract with Postgres and in-memory
//!   implementations
//! - [`rpc`]: the service API contract ([`rpc::EventApi`]) and its wire types
//! - [`service`]: validation and business rules in front of the store
//! - [`api`]: axum gateway projecting the API over HTTP/JSON
//! - [`client`]: HTTP client implementing [`rpc::EventApi`] against a remote
//!   instance

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod rpc;
pub mod service;
pub mod store;
