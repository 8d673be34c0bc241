//! LogProxy core library: message relay to the remote messages API, config loading,
//! and the local HTTP gateway used by the CLI.

pub mod config;
pub mod gateway;
pub mod messages;
