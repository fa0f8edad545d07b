//! Database connection helpers

pub mod init;

pub use init::*;
