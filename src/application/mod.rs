//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer,
//! managing wizard state, navigation gating, and draft bookkeeping.

pub mod state;

pub use state::*;
