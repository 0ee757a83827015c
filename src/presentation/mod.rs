//! Presentation layer: terminal rendering and keyboard handling.
//!
//! `fields` maps each step to typed accessors over the record, `ui`
//! renders the wizard with ratatui, and `input` turns key events into
//! controller calls.

pub mod fields;
pub mod input;
pub mod ui;

pub use fields::*;
pub use input::*;
pub use ui::*;
