//! Logger setup.
//!
//! Centralizes `env_logger` initialization behind the `log` facade so that
//! binaries get consistent diagnostics with one call in `main`.

mod init;

pub use init::{LoggingConfig, init_logging};
