//! Shared helpers for the sunburst demo binaries.

pub mod assets;
pub mod input;
