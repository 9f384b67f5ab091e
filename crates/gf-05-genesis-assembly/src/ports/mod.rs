//! # Ports

pub mod clock;
