//! Domain layer - pure business logic with no external dependencies.
//!
//! This layer contains the core concepts and invariants of the system:
//! - Client fingerprint computation
//! - Request windows (sliding-window timestamp sequences)
//! - The bounded rejection audit log
//! - Zodiac compatibility types
//! - The local fallback generator
//!
//! All types in this layer are pure and easily testable.

pub mod compat;
pub mod fallback;
pub mod fingerprint;
pub mod rejection;
pub mod window;
