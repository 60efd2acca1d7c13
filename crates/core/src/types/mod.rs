//! Core types for Lezzet.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod day;
pub mod email;
pub mod id;
pub mod role;

pub use day::DayKey;
pub use email::{Email, EmailError};
pub use id::*;
pub use role::{Role, RoleParseError};
