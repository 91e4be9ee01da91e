//! netclock Site - pages and the host that serves them
//!
//! This crate composes the site:
//! - Page layout wrapper and immutable style records
//! - Feature showcase rendered on the homepage
//! - Network clock page: mount, one-shot sync, periodic refresh, unmount
//! - Configuration, logging setup and the HTTP server

pub mod clock_page;
pub mod config;
pub mod layout;
pub mod server;
pub mod showcase;
pub mod telemetry;

pub use clock_page::*;
pub use config::*;
pub use layout::*;
pub use server::*;
pub use showcase::*;
