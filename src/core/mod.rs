//! Core types and constants for GPS-assisted map making

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
