use thiserror::Error;

/// Fatal supervisor errors. Any of these aborts the run with a nonzero
/// parent exit status.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The child process could not be created at all.
    #[error("Error starting program: '{program}' with args: {args}: {source}")]
    StartFailure {
        program: String,
        args: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting for the child to finish failed. Distinct from the child
    /// exiting nonzero, which is not an error at this layer.
    #[error("error waiting for '{command}' to finish: {source}")]
    WaitFailure {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A piped stream was not available on the spawned child.
    #[error("failed to capture child {0}")]
    StreamCapture(&'static str),

    /// A stream pump task panicked or was cancelled.
    #[error("stream task failed: {0}")]
    StreamTask(#[from] tokio::task::JoinError),
}

/// Asynchronous process errors: diagnostics written to the parent's stderr
/// while the child runs, formatted as `Kind(code): description`. They are
/// observational only and never terminate the wait.
#[derive(Debug, Error)]
pub enum AsyncProcessError {
    /// The child was terminated by a signal instead of exiting.
    #[error("Crashed(1): child terminated by signal {0}")]
    Crashed(i32),

    /// Reading one of the child's output streams failed.
    #[error("ReadError(3): reading child {stream}: {source}")]
    Read {
        stream: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Writing a prefixed line to the parent stream failed.
    #[error("WriteError(4): writing prefixed {stream} output: {source}")]
    Write {
        stream: &'static str,
        #[source]
        source: std::io::Error,
    },
}
