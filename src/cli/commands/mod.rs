//! CLI command implementations
//!
//! This module contains all CLI command implementations. Commands return the
//! process exit code: 0 success, 1 export failed, 2 configuration error,
//! 5 fatal error.

pub mod export;
pub mod init;
pub mod validate;
