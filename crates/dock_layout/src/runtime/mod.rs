//! Shared runtime services.

pub mod config;
pub mod context;
pub mod defaults;
pub mod env;
pub mod error;
pub mod process;
pub mod workflow;
