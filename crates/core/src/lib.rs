//! Lezzet Core - Shared types library.
//!
//! This crate provides common types used across all Lezzet components:
//! - `server` - The restaurant-information web backend
//! - `integration-tests` - Library-level integration tests
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients,
//! no database access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and day keys

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
