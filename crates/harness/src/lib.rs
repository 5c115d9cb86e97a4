//! Test orchestration harness for the OrderEase shop-management API.
//!
//! The backend under test is an external HTTP+JSON service; this crate
//! supplies everything a suite needs to exercise it deterministically:
//!
//! - [`retry`] - a rate-limit aware HTTP call wrapper with bounded
//!   multiplicative backoff on `429` responses.
//! - [`api`] - a typed client for the backend's admin, shop-owner and
//!   frontend endpoint groups.
//! - [`fixtures`] - a dependency graph of named, scope-cached resource
//!   providers (tokens and record ids) that create real backend records
//!   on demand and tear them down in reverse order.
//! - [`sequencer`] - a deterministic cross-file test ordering policy
//!   driven by a static priority table.
//! - [`check`] - response/status assertions with diagnostic payloads.
//! - [`runner`] - the sequential executor tying the above together.
//!
//! The backend is stateful across a run (shared admin account, shared
//! rate limits), so execution is strictly sequential: one test at a
//! time, in sequencer order, with session-scoped fixture state behind
//! an explicit lock.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod check;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod retry;
pub mod runner;
pub mod sequencer;

pub use check::expect_status;
pub use config::SuiteConfig;
pub use error::TestError;
pub use retry::{RetryPolicy, RetryingClient};
pub use runner::{CaseFuture, Module, Runner, RunSummary, TestCase, TestCtx, TestResult};
