//! Carton - prebuilt Swift package dependencies
//!
//! Resolves Swift Package Manager dependencies inside a scratch workspace,
//! builds them into xcframeworks and commits the result to the project's
//! dependencies cache.

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod interactor;
pub mod manifest;
pub mod paths;
pub mod platform;
pub mod swift;
pub mod ui;
pub mod workspace;

pub use error::{CartonError, CartonResult};
