//! netclock Test Harness - deterministic clocks and fake time authorities
//!
//! This crate provides:
//! - A manually driven local clock
//! - Scripted time sources (fixed answer, failure, delay, hang)
//! - An in-process world-time HTTP server
//! - Clock page lifecycle scenarios and end-to-end network tests

pub mod clock;
pub mod source;
pub mod time_server;

#[cfg(test)]
mod scenarios;

pub use clock::*;
pub use source::*;
pub use time_server::*;
