//! Process supervision: spawn a child with piped stdout/stderr, wire each
//! stream to its own line reassembler, wait for the child to exit, and
//! flush whatever the streams still hold.

pub mod builder;
pub mod error;
pub mod supervisor;


pub use builder::ProcessCommandBuilder;
pub use error::{AsyncProcessError, ProcessError};
pub use supervisor::{
    ExitStatus, ProcessCommand, ProcessState, RunOutcome, StreamSource, Supervisor,
};
