//! # Domain Layer

pub mod dump;
pub mod errors;
pub mod relocation;
