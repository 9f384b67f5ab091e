//! # Domain Layer

pub mod errors;
pub mod param;
pub mod validated;
pub mod validator;
