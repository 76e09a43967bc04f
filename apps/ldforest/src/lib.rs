//! # ldforest
//!
//! Library half of the ldforest binary: argument parsing, configuration and
//! command implementations. Exposed so the commands can be tested without
//! spawning a process.

pub mod cli;
pub mod config;
