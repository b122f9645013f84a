pub mod commands;
pub mod config;
pub mod logging;
pub mod rchain;
