//! edrouter CLI library.
//!
//! Logging setup and output rendering shared by the `edrouter` subcommands.

pub mod logging;
pub mod output;
