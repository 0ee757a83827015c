//! Infrastructure layer providing external service integrations.
//!
//! This module contains implementations for external concerns: draft
//! persistence, the username directory, and the submission endpoint.

pub mod persistence;
pub mod username;
pub mod submission;

pub use persistence::*;
pub use username::*;
pub use submission::*;
