//! Core geometry types and layout helpers.

pub mod layout;
pub mod types;

pub use layout::*;
pub use types::*;
