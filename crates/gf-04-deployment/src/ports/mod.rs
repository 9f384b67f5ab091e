//! # Ports

pub mod environment;
