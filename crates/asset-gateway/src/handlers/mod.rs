//! API request handlers

pub mod assets;

pub use assets::*;
