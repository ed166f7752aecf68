//! Ticket purchase orchestration service.
//!
//! Owns ticket documents and runs the cross-service purchase saga: check
//! availability on the event service, atomically reserve stock, create the
//! ticket record, and fire a best-effort notification. The orchestrator
//! holds no persistent state of its own; it coordinates one request's
//! calls and compensates (releases stock) when the ticket write fails
//! after the reservation.

pub mod api;
pub mod config;
pub mod domain;
pub mod notifier;
pub mod rpc;
pub mod service;
pub mod store;
