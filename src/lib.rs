//! Bloom Core - On-device decision engines for a personal wellness tracker
//!
//! Two independent, stateless-per-call components:
//!
//! - **Cycle**: derive phase, fertile window, ovulation day and next-period
//!   date from a history of logged periods
//! - **Chat**: map free-text input plus a snapshot of daily metrics to canned,
//!   context-aware wellness replies
//!
//! Persistence, sync and UI belong to the host app; it hands the core fully
//! materialized snapshots.

pub mod chat;
pub mod cycle;
pub mod error;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use chat::{ChatContext, ChatMemory, ChatSession, Intent, ReplyEngine};
pub use cycle::{CycleEntry, CycleHistory, CyclePhase, CyclePrediction, CyclePredictor, CycleState};
pub use error::CycleError;

/// Library version
pub const BLOOM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI
pub const PRODUCER_NAME: &str = "bloom-core";
