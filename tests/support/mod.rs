// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted fake shell implementing the session capability traits.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use capstan::ssh::{
    CommandOps, ExecResult, LineSink, OutputChannel, Probe, Result, SessionOps, TransferOps,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("capstan=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// One remote interaction, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Exec { command: String, cwd: Option<String> },
    Probe { command: String, cwd: Option<String> },
    Upload { local: PathBuf, remote: String },
    Close,
}

/// Scripted stand-in for an SSH session.
///
/// Probes are answered from the script; every interaction is recorded so
/// tests can assert on ordering and exact command text. No live server is
/// involved anywhere. Clones share the event log, so a test can keep a
/// handle to the log while a run consumes the shell.
#[derive(Default, Clone)]
pub struct FakeShell {
    home: Option<(u32, String)>,
    directories: Vec<String>,
    missing_tools: Vec<String>,
    failures: Vec<(String, u32)>,
    outputs: Vec<(String, Vec<(OutputChannel, String)>)>,
    broken_uploads: bool,
    broken_close: bool,
    events: Arc<Mutex<Vec<ShellEvent>>>,
}

// Each test binary only uses some of these helpers, so allow dead_code.
#[allow(dead_code)]
impl FakeShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the home directory probe with this path.
    pub fn with_home(mut self, home: &str) -> Self {
        self.home = Some((0, home.to_string()));
        self
    }

    /// Make the home directory probe fail with this exit code.
    pub fn with_home_failure(mut self, exit_code: u32) -> Self {
        self.home = Some((exit_code, String::new()));
        self
    }

    /// Make `test -d` report an existing directory for this path.
    pub fn with_directory(mut self, path: &str) -> Self {
        self.directories.push(path.to_string());
        self
    }

    /// Make `command -v` report this tool as absent.
    pub fn without_tool(mut self, tool: &str) -> Self {
        self.missing_tools.push(tool.to_string());
        self
    }

    /// Make any executed command containing `fragment` exit with `exit_code`.
    pub fn with_failure(mut self, fragment: &str, exit_code: u32) -> Self {
        self.failures.push((fragment.to_string(), exit_code));
        self
    }

    /// Emit these lines to the sink when an executed command contains `fragment`.
    pub fn with_output(mut self, fragment: &str, lines: &[(OutputChannel, &str)]) -> Self {
        self.outputs.push((
            fragment.to_string(),
            lines.iter().map(|(c, l)| (*c, l.to_string())).collect(),
        ));
        self
    }

    /// Make every upload fail with an I/O error.
    pub fn with_broken_uploads(mut self) -> Self {
        self.broken_uploads = true;
        self
    }

    /// Make the session close fail with an I/O error.
    pub fn with_broken_close(mut self) -> Self {
        self.broken_close = true;
        self
    }

    /// Every interaction so far, in issue order.
    pub fn events(&self) -> Vec<ShellEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Executed command texts only, in issue order.
    pub fn commands(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ShellEvent::Exec { command, .. } => Some(command),
                _ => None,
            })
            .collect()
    }

    /// Uploads only, in issue order.
    pub fn uploads(&self) -> Vec<(PathBuf, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ShellEvent::Upload { local, remote } => Some((local, remote)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: ShellEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl CommandOps for FakeShell {
    async fn exec(
        &self,
        command: &str,
        cwd: Option<&str>,
        sink: &dyn LineSink,
    ) -> Result<ExecResult> {
        self.record(ShellEvent::Exec {
            command: command.to_string(),
            cwd: cwd.map(str::to_string),
        });

        for (fragment, lines) in &self.outputs {
            if command.contains(fragment.as_str()) {
                for (channel, line) in lines {
                    sink.line(*channel, line);
                }
            }
        }

        let exit_code = self
            .failures
            .iter()
            .find(|(fragment, _)| command.contains(fragment.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0);

        Ok(ExecResult { exit_code })
    }

    async fn probe(&self, command: &str, cwd: Option<&str>) -> Result<Probe> {
        self.record(ShellEvent::Probe {
            command: command.to_string(),
            cwd: cwd.map(str::to_string),
        });

        if command.starts_with("printf") {
            let (exit_code, stdout) = self.home.clone().unwrap_or((0, "/root".to_string()));
            return Ok(Probe { exit_code, stdout });
        }

        if let Some(quoted) = command.strip_prefix("test -d ") {
            let path = quoted.trim_matches('\'');
            let exit_code = if self.directories.iter().any(|d| d == path) {
                0
            } else {
                1
            };
            return Ok(Probe {
                exit_code,
                stdout: String::new(),
            });
        }

        if let Some(tool) = command.strip_prefix("command -v ") {
            let exit_code = if self.missing_tools.iter().any(|t| t == tool) {
                1
            } else {
                0
            };
            return Ok(Probe {
                exit_code,
                stdout: format!("/usr/bin/{tool}"),
            });
        }

        Ok(Probe {
            exit_code: 0,
            stdout: String::new(),
        })
    }
}

#[async_trait]
impl TransferOps for FakeShell {
    async fn upload(&self, local: &Path, remote: &str) -> Result<()> {
        self.record(ShellEvent::Upload {
            local: local.to_path_buf(),
            remote: remote.to_string(),
        });

        if self.broken_uploads {
            return Err(std::io::Error::other("connection reset by peer").into());
        }

        Ok(())
    }
}

#[async_trait]
impl SessionOps for FakeShell {
    async fn close(self) -> Result<()> {
        self.record(ShellEvent::Close);

        if self.broken_close {
            return Err(std::io::Error::other("disconnect timed out").into());
        }

        Ok(())
    }
}

/// Line sink that records every line it receives.
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<(OutputChannel, String)>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(OutputChannel, String)> {
        self.lines.lock().unwrap().clone()
    }
}

impl LineSink for RecordingSink {
    fn line(&self, channel: OutputChannel, line: &str) {
        self.lines.lock().unwrap().push((channel, line.to_string()));
    }
}
