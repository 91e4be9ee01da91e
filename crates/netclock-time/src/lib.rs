//! netclock Time - clocks, sources and formatting
//!
//! This crate implements the time side of the network clock:
//! - Local clock abstraction and the offset-corrected clock
//! - Authoritative time sources (HTTP world-time API)
//! - One-shot offset synchronization with local fallback
//! - Timezone and locale aware wall-clock formatting

pub mod clock;
pub mod format;
pub mod source;
pub mod sync;

pub use clock::*;
pub use format::*;
pub use source::*;
pub use sync::*;
