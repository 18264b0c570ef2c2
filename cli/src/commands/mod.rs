//! Command implementations

pub mod after_compile;
pub mod resolve;
pub mod version;
