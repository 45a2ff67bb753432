//! Child process lifecycle and stream wiring.

use std::fmt;
use std::io::Write;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, trace};

use super::error::{AsyncProcessError, ProcessError};
use crate::prefix::LineReassembler;

/// The program to run and its arguments.
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Lifecycle of the supervised child. One supervisor handles exactly one
/// child; there are no transitions back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    NotStarted,
    Starting,
    Running,
    Exited,
}

/// How the child finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Success => Some(0),
            ExitStatus::Error(code) => Some(*code),
            ExitStatus::Signal(_) => None,
        }
    }

    fn from_std(status: std::process::ExitStatus) -> Self {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::from_signal(status)
        }
    }

    #[cfg(unix)]
    fn from_signal(status: std::process::ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;
        match status.signal() {
            Some(signal) => ExitStatus::Signal(signal),
            None => ExitStatus::Error(1),
        }
    }

    #[cfg(not(unix))]
    fn from_signal(_status: std::process::ExitStatus) -> Self {
        ExitStatus::Error(1)
    }
}

/// Which child stream a pump serves. Used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource {
    Stdout,
    Stderr,
}

impl StreamSource {
    fn name(self) -> &'static str {
        match self {
            StreamSource::Stdout => "stdout",
            StreamSource::Stderr => "stderr",
        }
    }
}

/// What a completed run produced: the child's exit status and the two
/// sinks, handed back for callers that buffered the output.
#[derive(Debug)]
pub struct RunOutcome<O, E> {
    pub status: ExitStatus,
    pub stdout: O,
    pub stderr: E,
}

/// Owns the child process lifecycle: spawns the child, drives one
/// [`LineReassembler`] per output stream from a dedicated task, waits for
/// completion, and joins the pumps so both streams are fully flushed before
/// the run reports back.
pub struct Supervisor<O, E>
where
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    command: ProcessCommand,
    stdout: LineReassembler<O>,
    stderr: LineReassembler<E>,
}

impl<O, E> Supervisor<O, E>
where
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    pub fn new(
        command: ProcessCommand,
        stdout: LineReassembler<O>,
        stderr: LineReassembler<E>,
    ) -> Self {
        Self {
            command,
            stdout,
            stderr,
        }
    }

    /// Launch the child, pump both streams until they close, and wait for
    /// the child to exit. The final flush of each stream happens at that
    /// stream's EOF, strictly after the last data event for it.
    pub async fn run(self) -> Result<RunOutcome<O, E>, ProcessError> {
        let Self {
            command,
            stdout,
            stderr,
        } = self;

        let mut state = ProcessState::NotStarted;
        trace!(?state, %command, "supervisor created");

        state = ProcessState::Starting;
        debug!(?state, program = %command.program, args = ?command.args, "starting child process");
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::StartFailure {
                program: command.program.clone(),
                args: command.args.join(" "),
                source,
            })?;
        state = ProcessState::Running;
        trace!(?state, pid = ?child.id(), "child process running");

        let child_stdout = child
            .stdout
            .take()
            .ok_or(ProcessError::StreamCapture("stdout"))?;
        let child_stderr = child
            .stderr
            .take()
            .ok_or(ProcessError::StreamCapture("stderr"))?;

        let stdout_pump = tokio::spawn(pump(child_stdout, stdout, StreamSource::Stdout));
        let stderr_pump = tokio::spawn(pump(child_stderr, stderr, StreamSource::Stderr));

        let status = child
            .wait()
            .await
            .map_err(|source| ProcessError::WaitFailure {
                command: command.to_string(),
                source,
            })?;
        state = ProcessState::Exited;

        // The pipes close when the child exits; joining here guarantees the
        // final flush has run for both streams before the outcome is built.
        let (stdout, stderr) = tokio::join!(stdout_pump, stderr_pump);
        let stdout = stdout?.into_inner();
        let stderr = stderr?.into_inner();

        let status = ExitStatus::from_std(status);
        if let ExitStatus::Signal(signal) = status {
            eprintln!("{}", AsyncProcessError::Crashed(signal));
        }
        debug!(?state, ?status, "child process exited");

        Ok(RunOutcome {
            status,
            stdout,
            stderr,
        })
    }
}

/// Read raw chunks from one child stream and feed them to that stream's
/// reassembler, flushing the trailing partial line at EOF. Read and write
/// failures are reported to the parent's stderr and end this pump; they do
/// not abort the run.
async fn pump<R, W>(
    mut reader: R,
    mut lines: LineReassembler<W>,
    source: StreamSource,
) -> LineReassembler<W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: Write + Send + 'static,
{
    let mut chunk = [0u8; 4096];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                trace!(stream = source.name(), bytes = n, "child output chunk");
                if let Err(err) = lines.on_data(&chunk[..n]) {
                    eprintln!(
                        "{}",
                        AsyncProcessError::Write {
                            stream: source.name(),
                            source: err,
                        }
                    );
                    break;
                }
            }
            Err(err) => {
                eprintln!(
                    "{}",
                    AsyncProcessError::Read {
                        stream: source.name(),
                        source: err,
                    }
                );
                break;
            }
        }
    }
    if let Err(err) = lines.on_end() {
        eprintln!(
            "{}",
            AsyncProcessError::Write {
                stream: source.name(),
                source: err,
            }
        );
    }
    lines
}
