//! Conversion engine - asynchronous ffmpeg executions
//!
//! Each call to [`ConversionEngine::execute_async`] spawns one engine process
//! and returns an opaque [`ExecutionId`]. A worker thread polls the process
//! and invokes the completion callback exactly once. Cancellation kills the
//! process and reports [`ReturnCode::CANCEL`]; it is best effort and nothing
//! waits for the process to actually exit.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// How often the worker checks whether the process has exited
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Opaque handle for one engine execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionId(u64);

impl ExecutionId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Exit status reported to the completion callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnCode(pub i32);

impl ReturnCode {
    pub const SUCCESS: Self = Self(0);
    /// Reported only for executions cancelled through the engine
    pub const CANCEL: Self = Self(255);
    /// Used when the process could not be started, was killed externally,
    /// or exited with a status that collides with `CANCEL`
    pub const FAILURE: Self = Self(1);

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    pub fn is_cancel(self) -> bool {
        self == Self::CANCEL
    }

    /// Map a process exit status that was not caused by `cancel`
    fn from_exit(status: ExitStatus) -> Self {
        match status.code().map(ReturnCode) {
            Some(code) if code.is_cancel() => Self::FAILURE,
            Some(code) => code,
            None => Self::FAILURE,
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion notice delivered to the UI thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    Finished {
        id: ExecutionId,
        return_code: ReturnCode,
    },
}

/// Shared bookkeeping for running executions
struct EngineState {
    next_id: AtomicU64,
    /// Unreaped engine processes, by execution
    running: Mutex<HashMap<ExecutionId, Child>>,
    /// Executions cancelled before their process exited
    cancelled: Mutex<HashSet<ExecutionId>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            running: Mutex::new(HashMap::new()),
            cancelled: Mutex::new(HashSet::new()),
        }
    }

    fn allocate_id(&self) -> ExecutionId {
        ExecutionId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Check once whether the process has exited
    ///
    /// The child is reaped and unregistered under the same lock `cancel`
    /// takes, so a kill can never reach a reaped (and possibly reused) PID.
    fn try_reap(&self, id: ExecutionId) -> Option<io::Result<ExitStatus>> {
        let mut running = self.running.lock().unwrap();
        let Some(child) = running.get_mut(&id) else {
            return Some(Err(io::Error::other("execution is no longer registered")));
        };
        match child.try_wait() {
            Ok(None) => None,
            Ok(Some(status)) => {
                running.remove(&id);
                Some(Ok(status))
            }
            Err(e) => {
                running.remove(&id);
                Some(Err(e))
            }
        }
    }

    fn wait(&self, id: ExecutionId) -> io::Result<ExitStatus> {
        loop {
            if let Some(result) = self.try_reap(id) {
                return result;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// True if the finished execution had been cancelled
    fn take_cancelled(&self, id: ExecutionId) -> bool {
        self.cancelled.lock().unwrap().remove(&id)
    }
}

/// Runs the external transcoder
#[derive(Clone)]
pub struct ConversionEngine {
    program: PathBuf,
    state: Arc<EngineState>,
}

impl ConversionEngine {
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            state: Arc::new(EngineState::new()),
        }
    }

    /// Start an execution with positional `args`
    ///
    /// `callback` runs on a worker thread once the process has exited (or
    /// failed to start) with the execution's return code.
    pub fn execute_async<F>(&self, args: Vec<String>, callback: F) -> ExecutionId
    where
        F: FnOnce(ExecutionId, ReturnCode) + Send + 'static,
    {
        let id = self.state.allocate_id();

        log::info!(
            "Engine {}: {} {}",
            id,
            self.program.display(),
            args.join(" ")
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                log::error!("Engine {}: failed to spawn {:?}: {}", id, self.program, e);
                thread::spawn(move || callback(id, ReturnCode::FAILURE));
                return id;
            }
        };

        // Drained on its own thread so a chatty ffmpeg never blocks on a full pipe
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut text = String::new();
                let _ = stderr.read_to_string(&mut text);
                text
            })
        });

        // Registered before returning so `cancel(id)` always finds the process
        self.state.running.lock().unwrap().insert(id, child);

        let state = self.state.clone();
        thread::spawn(move || {
            let result = state.wait(id);
            let stderr = stderr_reader
                .and_then(|reader| reader.join().ok())
                .unwrap_or_default();

            let return_code = if state.take_cancelled(id) {
                ReturnCode::CANCEL
            } else {
                match result {
                    Ok(status) => {
                        let code = ReturnCode::from_exit(status);
                        if !code.is_success() {
                            log::warn!(
                                "Engine {}: exited with {}: {}",
                                id,
                                status,
                                stderr.lines().last().unwrap_or("Unknown error")
                            );
                        }
                        code
                    }
                    Err(e) => {
                        log::error!("Engine {}: failed to wait for process: {}", id, e);
                        ReturnCode::FAILURE
                    }
                }
            };

            log::info!("Engine {}: finished with return code {}", id, return_code);
            callback(id, return_code);
        });

        id
    }

    /// Request cancellation of an execution
    ///
    /// Returns false if the execution is unknown or already finished.
    pub fn cancel(&self, id: ExecutionId) -> bool {
        let mut running = self.state.running.lock().unwrap();
        let Some(child) = running.get_mut(&id) else {
            log::debug!("Engine {}: cancel requested but not running", id);
            return false;
        };

        self.state.cancelled.lock().unwrap().insert(id);
        log::info!("Engine {}: cancelling (pid {})", id, child.id());
        if let Err(e) = child.kill() {
            log::warn!("Engine {}: kill failed: {}", id, e);
        }
        true
    }

    #[allow(dead_code)]
    pub fn is_running(&self, id: ExecutionId) -> bool {
        self.state.running.lock().unwrap().contains_key(&id)
    }
}
