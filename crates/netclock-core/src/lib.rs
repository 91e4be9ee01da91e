//! netclock Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every netclock crate:
//! - Wall-clock primitives (EpochMillis, ClockOffset)
//! - Error taxonomy for time sources and configuration

pub mod error;
pub mod time;

pub use error::*;
pub use time::*;
