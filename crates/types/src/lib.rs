//! Configuration and output types shared by the backend and the CLI.

pub mod config;
pub mod output;
