//! # Adapters
//!
//! - [`file`]: template loading and atomic genesis writing

pub mod file;
