//! MoviesKyy - movie browsing back end over the TMDB catalog
//!
//! This library crate exposes the core functionality for integration testing.

pub mod catalog;
pub mod config;
pub mod orchestrator;
pub mod server;
pub mod setup;
