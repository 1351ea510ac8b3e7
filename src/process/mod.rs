//! Random processes
pub mod gaussian;
