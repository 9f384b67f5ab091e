//! # Domain Layer
//!
//! The genesis document, its built-in template and the merge rules.

pub mod assembler;
pub mod document;
pub mod errors;
