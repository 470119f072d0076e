//! Client state subsystem.
//!
//! # Data Flow
//! ```text
//! orchestrator / session
//!     → store.rs (AggregateStateStore: one snapshot, one mutation path)
//!         → watch::Receiver<AggregateState> (presentation layer)
//!     → notices.rs (Notifier)
//!         → broadcast::Receiver<Notice> (presentation layer)
//! ```
//!
//! # Design Decisions
//! - The store makes no remote calls
//! - Snapshots are published whole; there are no per-field setters
//! - `loading` is both the UI affordance and the single-flight lock

pub mod notices;
pub mod store;

pub use notices::{Notice, Notifier};
pub use store::{AggregateState, AggregateStateStore, AvailableAction, Refreshed};
