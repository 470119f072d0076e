//! Network subsystem.
//!
//! # Data Flow
//! ```text
//! WalletConnector::connect()
//!     → resolver.rs (Disconnected → Connected handshake)
//!     → guard.rs (chain ID check, before any contract call)
//!     → ResolvedHandle::{Read, Signing}
//! ```

pub mod guard;
pub mod resolver;

pub use guard::NetworkGuard;
pub use resolver::{ConnectionState, ProviderResolver, ResolvedHandle};
