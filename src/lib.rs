//! jobform - Terminal Job Application Wizard
//!
//! A five-step job application form for the terminal: personal details,
//! professional background, document uploads, additional questions, and a
//! final review. Steps gate forward movement on validation, and the
//! in-progress application is kept as a JSON draft on disk.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
