//!
//! # taskbridge
//!
//! A two-tier task-management backend: a public-facing gateway that
//! authenticates HTTP clients and forwards requests as named commands, and
//! an internal administrator service that owns the data and business rules
//! for tasks and users. Failures cross the process boundary as plain error
//! envelope values, converted at the dispatch boundary on the way out and
//! at the forwarding boundary on the way back.
//!
//! The `gateway` and `administrator` binaries wire these modules together.

pub mod auth;
pub mod config;
pub mod crypto;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod models;
pub mod routes;
pub mod rpc;
pub mod services;
pub mod store;
