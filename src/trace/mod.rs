//! Execution report produced by the build tracer
//!
//! The tracer records every process the build started. Each [`Execution`]
//! carries the command that was run and the identity of the process that ran
//! it. The report is fully loaded into memory before recognition starts.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Process identifier as reported by the tracer
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Pid {
    fn from(value: u32) -> Self {
        Pid(value)
    }
}

/// A single program invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Resolved path of the executed program
    pub program: PathBuf,
    /// Full argument vector, `arguments[0]` is the program as invoked
    pub arguments: Vec<String>,
    /// Working directory of the process
    pub working_dir: PathBuf,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

impl Command {
    pub fn new<P, W, I, S>(program: P, arguments: I, working_dir: W) -> Self
    where
        P: Into<PathBuf>,
        W: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            working_dir: working_dir.into(),
            environment: BTreeMap::new(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] in {}",
            self.program.display(),
            self.arguments.join(", "),
            self.working_dir.display()
        )
    }
}

/// Lifecycle event of a traced process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub at: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
}

/// Process identity and lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub pid: Pid,
    /// Parent process, `0` when the tracer did not report one
    #[serde(default, skip_serializing_if = "is_unknown_pid")]
    pub ppid: Pid,
    #[serde(default)]
    pub events: Vec<Event>,
}

fn is_unknown_pid(pid: &Pid) -> bool {
    pid.0 == 0
}

/// One traced process: what it ran and who started it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub command: Command,
    pub run: Run,
}

impl Execution {
    pub fn new(pid: u32, ppid: u32, command: Command) -> Self {
        Self {
            command,
            run: Run {
                pid: Pid(pid),
                ppid: Pid(ppid),
                events: Vec::new(),
            },
        }
    }

    pub fn pid(&self) -> Pid {
        self.run.pid
    }

    pub fn ppid(&self) -> Pid {
        self.run.ppid
    }
}

/// Information about the tracing session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "intercept", default)]
    pub session_type: String,
    #[serde(default)]
    pub host_info: BTreeMap<String, String>,
}

/// The complete trace of a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub context: Context,
    pub executions: Vec<Execution>,
}

impl Report {
    pub fn new(executions: Vec<Execution>) -> Self {
        Self {
            context: Context::default(),
            executions,
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("Failed to parse execution report")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open execution report: {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to read execution report: {}", path.display()))
    }
}
