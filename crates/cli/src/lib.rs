//! Public library modules for the CLI crate
pub mod engine;
pub mod server;
