//! # Core Module
//!
//! Shared resource-management primitives used throughout the crate.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write
//!   locking, used as the shared chunk handle

pub mod mt_resource;

pub use mt_resource::MtResource;
