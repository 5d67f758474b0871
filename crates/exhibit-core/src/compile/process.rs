//! External process execution with output capture and a bounded wait.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a running child is polled while a timeout is in effect.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Which streams make up the captured diagnostic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// stdout followed by stderr.
    Combined,
    /// stderr only; stdout is kept separately.
    StderrOnly,
}

/// Outcome of a finished (or killed) process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,

    /// Whether the process exited with status 0.
    pub success: bool,

    /// Whether the process was killed after exceeding its timeout.
    pub timed_out: bool,

    /// Captured text according to the [`Capture`] mode.
    pub captured: String,

    /// Full stdout, regardless of capture mode.
    pub stdout: String,
}

/// Run a command to completion, killing it if `timeout` elapses.
///
/// Both pipes are drained on background threads so a chatty child can
/// never block on a full pipe buffer.
///
/// # Errors
/// Returns the spawn error if the process cannot be started at all.
pub fn run_process(
    cmd: &mut Command,
    capture: Capture,
    timeout: Option<Duration>,
) -> io::Result<ProcessOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    let stdout_reader = child.stdout.take().map(drain);
    let stderr_reader = child.stderr.take().map(drain);

    let status = wait_bounded(&mut child, timeout)?;

    let stdout = collect(stdout_reader);
    let stderr = collect(stderr_reader);

    let captured = match capture {
        Capture::Combined => combine(&stdout, &stderr),
        Capture::StderrOnly => stderr,
    };

    Ok(ProcessOutput {
        exit_code: status.and_then(|s| s.code()),
        success: status.is_some_and(|s| s.success()),
        timed_out: status.is_none(),
        captured,
        stdout,
    })
}

/// Wait for the child; `None` means it was killed on timeout.
fn wait_bounded(child: &mut Child, timeout: Option<Duration>) -> io::Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        if Instant::now() >= deadline {
            tracing::warn!(
                "Process {} exceeded {:.1}s timeout, killing it",
                child.id(),
                timeout.as_secs_f64()
            );
            if let Err(e) = child.kill() {
                tracing::warn!("Failed to kill process {}: {}", child.id(), e);
            }
            // Reap the zombie
            let _ = child.wait();
            return Ok(None);
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut bytes) {
            tracing::debug!("Failed to read child output: {}", e);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn combine(stdout: &str, stderr: &str) -> String {
    let mut combined = String::with_capacity(stdout.len() + stderr.len() + 1);
    combined.push_str(stdout);
    if !stdout.is_empty() && !stderr.is_empty() && !stdout.ends_with('\n') {
        combined.push('\n');
    }
    combined.push_str(stderr);
    combined
}
