//! # Core Module
//!
//! Fundamental concurrency primitives shared across the crate.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking,
//!   used to share the world and individual chunks between the simulation thread
//!   and background workers.

/// Shared-resource wrapper around `Arc<RwLock<T>>`.
pub mod mt_resource;

pub use mt_resource::MtResource;
