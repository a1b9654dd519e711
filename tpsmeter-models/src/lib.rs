//! Provider/model catalog and simulated streaming for tpsmeter.
//!
//! This crate provides:
//! - A static registry of provider/model pairs and their API identifiers
//! - Per-provider credential requirements and validation
//! - A simulated token stream that measures tokens per second
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   ModelRegistry                      │
//! │   (Provider, Model) ──────────────▶ API identifier   │
//! └─────────────────────────────────────────────────────┘
//!                          │ ResolvedModel
//!                          ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                 StreamingSession                     │
//! │  CredentialSet + message ─▶ validate ─▶ SessionStream│
//! │      Thinking, Snapshot × N, Completed | Cancelled   │
//! └─────────────────────────────────────────────────────┘
//! ```

mod error;
mod types;

pub mod credentials;
pub mod registry;
pub mod session;

pub use error::{Error, Problem, Rejection, Result};
pub use registry::ModelRegistry;
pub use types::{Model, Provider, RegistryEntry, ResolvedModel};
