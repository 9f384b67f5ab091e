//! # Adapters

pub mod json_file;
