//! Per-user notification log service.
//!
//! Notifications are append-only: created on send, read back by user,
//! never mutated or deleted. The ticket service talks to this service
//! best-effort; a failure here never fails a purchase.

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod rpc;
pub mod service;
pub mod store;
