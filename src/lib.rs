pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod reference;
pub mod table;
pub mod types;

// Ports to the outside world and their production adapters
pub mod app;
pub mod infra;
