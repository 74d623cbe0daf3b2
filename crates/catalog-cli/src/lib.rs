//! Library side of the `catalog-sync` binary.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
pub mod watch;
