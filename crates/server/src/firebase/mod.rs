//! Firebase Auth integration - the identity gateway.

mod client;
mod error;

pub use client::{AuthUser, IdentityClient};
pub use error::{ApiError, ApiErrorResponse, IdentityError};
