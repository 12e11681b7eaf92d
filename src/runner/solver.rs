//! Solver invocation and wall-clock timing.

use crate::utils::config::{DEFAULT_GMON_FILE, GMON_OUT_PREFIX_VAR};
use crate::utils::error::RunnerError;
use log::{debug, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;

/// Result of one solver invocation
#[derive(Debug, Clone)]
pub struct SolverRun {
    /// Wall-clock time from spawn to exit
    pub elapsed_seconds: f64,

    /// Process id, used to locate a per-run gmon file
    pub pid: u32,

    pub status: ExitStatus,
}

/// Runs the solver binary on corpus items
#[derive(Debug, Clone)]
pub struct SolverRunner {
    solver: PathBuf,
    threads: usize,
    gmon_file: PathBuf,
    gmon_prefix: Option<PathBuf>,
}

impl SolverRunner {
    pub fn new(solver: impl Into<PathBuf>) -> Self {
        Self {
            solver: solver.into(),
            threads: 0,
            gmon_file: PathBuf::from(DEFAULT_GMON_FILE),
            gmon_prefix: None,
        }
    }

    /// Pass `--nThreads=<n>` to the solver (0 omits the flag)
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Profile data file shared by every run when not isolated
    pub fn with_gmon_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.gmon_file = path.into();
        self
    }

    /// Isolate profile data per run through `GMON_OUT_PREFIX`
    pub fn with_gmon_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.gmon_prefix = Some(prefix.into());
        self
    }

    pub fn solver(&self) -> &Path {
        &self.solver
    }

    /// Command-line arguments for one corpus item
    pub fn args_for(&self, input: &Path) -> Vec<OsString> {
        let mut args = vec![input.as_os_str().to_os_string()];
        if self.threads > 0 {
            args.push(format!("--nThreads={}", self.threads).into());
        }
        args
    }

    /// Run the solver to completion and time it
    ///
    /// A non-zero exit status is logged but still yields a timed run.
    ///
    /// # Errors
    /// * `RunnerError::SpawnFailed` - the solver could not be started
    /// * `RunnerError::WaitFailed` - the process could not be waited on
    pub fn run(&self, input: &Path) -> Result<SolverRun, RunnerError> {
        let mut command = Command::new(&self.solver);
        command.args(self.args_for(input)).stdout(Stdio::null());

        if let Some(prefix) = &self.gmon_prefix {
            command.env(GMON_OUT_PREFIX_VAR, prefix);
        }

        debug!("Running {:?}", command);

        let start = Instant::now();
        let mut child = command.spawn().map_err(|source| RunnerError::SpawnFailed {
            path: self.solver.clone(),
            source,
        })?;
        let pid = child.id();
        let status = child.wait().map_err(RunnerError::WaitFailed)?;
        let elapsed_seconds = start.elapsed().as_secs_f64();

        if !status.success() {
            warn!("Solver exited with {} on {}", status, input.display());
        }

        Ok(SolverRun {
            elapsed_seconds,
            pid,
            status,
        })
    }

    /// Profile data file written by a run
    ///
    /// glibc appends `.<pid>` to `GMON_OUT_PREFIX`; without a prefix every
    /// run writes the shared file (`gmon.out` in the working directory).
    pub fn gmon_file(&self, run: &SolverRun) -> PathBuf {
        match &self.gmon_prefix {
            Some(prefix) => {
                let mut name = prefix.clone().into_os_string();
                name.push(format!(".{}", run.pid));
                PathBuf::from(name)
            }
            None => self.gmon_file.clone(),
        }
    }

    /// Remove a shared profile data file left behind by an earlier run
    ///
    /// Without this, a run that writes no profile data would be profiled
    /// with the previous run's file. No-op under per-run isolation.
    pub fn clear_shared_profile(&self) -> std::io::Result<()> {
        if self.is_isolated() {
            return Ok(());
        }
        match std::fs::remove_file(&self.gmon_file) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Whether profile data is isolated per run
    pub fn is_isolated(&self) -> bool {
        self.gmon_prefix.is_some()
    }
}
