//! Logging setup.
//!
//! The codec itself only emits through the `log` facade (record sizes and
//! tags at `debug`, registry changes at `debug`). Binaries call
//! [`init_logging`] to route that output through `env_logger`.

mod init;

pub use init::{LoggingConfig, init_logging};
