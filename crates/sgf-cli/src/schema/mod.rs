//! On-disk table formats
//!
//! Column layouts of the CSV files written by the SGF tracker and of the
//! tables this tool writes back.

pub mod state;
pub mod survival;
