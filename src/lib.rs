pub mod command;
pub mod common;
pub mod exec;
pub mod invocation;
pub mod logging;
pub mod snapshot;
