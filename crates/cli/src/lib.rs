//! gymrs HTTP service: environment-kind routers over the session runtime,
//! plus configuration, logging and the command line.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
