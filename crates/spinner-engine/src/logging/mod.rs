//! Logger setup over the `log` facade.

mod init;

pub use init::{LoggingConfig, init_logging};
