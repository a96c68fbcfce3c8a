//! Helper bridge process: location and supervision
//!
//! The helper is a small local server that forwards HTTP requests to the
//! macOS Notification Center. It is spawned once, owned by the HTTP
//! transport, and never restarted.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

use crate::application::ports::StartupError;

/// Helper script location inside its package
pub const HELPER_PACKAGE_PATH: &str = "node-osx-notifier/lib/node-osx-notifier.js";

/// How long the helper gets to exit after SIGTERM before it is killed
const TERMINATE_GRACE: Duration = Duration::from_secs(2);

/// Finds the helper executable.
///
/// An explicitly configured path is the only candidate when set. Otherwise
/// two install layouts are searched relative to the install root: dependencies
/// nested under the package, then dependencies flattened beside it.
#[derive(Debug, Clone)]
pub struct HelperLocator {
    configured: Option<PathBuf>,
    install_root: PathBuf,
}

impl HelperLocator {
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Self {
            configured: None,
            install_root: install_root.into(),
        }
    }

    /// Probe relative to the directory of the running executable
    pub fn from_current_exe() -> Self {
        let root = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(root)
    }

    /// Use an explicit helper path instead of probing
    pub fn with_configured_path(mut self, path: Option<PathBuf>) -> Self {
        self.configured = path;
        self
    }

    /// Paths checked, in order
    pub fn candidates(&self) -> Vec<PathBuf> {
        match &self.configured {
            Some(path) => vec![path.clone()],
            None => vec![
                self.install_root.join("node_modules").join(HELPER_PACKAGE_PATH),
                self.install_root.join("..").join(HELPER_PACKAGE_PATH),
            ],
        }
    }

    /// First existing candidate, or `HelperNotFound` listing all of them
    pub fn locate(&self) -> Result<PathBuf, StartupError> {
        let candidates = self.candidates();
        if let Some(found) = candidates.iter().find(|path| path.exists()) {
            return Ok(found.clone());
        }
        Err(StartupError::HelperNotFound {
            searched: candidates,
        })
    }
}

/// How the helper process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelperExit {
    /// None when terminated by a signal
    pub code: Option<i32>,
}

/// Handle to the running helper process.
///
/// Dropping the handle terminates the helper.
pub struct HelperProcess {
    pid: Option<u32>,
    shutdown: Option<oneshot::Sender<()>>,
    exit: watch::Receiver<Option<HelperExit>>,
}

impl HelperProcess {
    /// Spawn the helper listening on `host:port` and start supervising it
    pub fn spawn(path: &Path, host: &str, port: u16) -> Result<Self, StartupError> {
        let mut child = Command::new(path)
            .arg(port.to_string())
            .arg(host)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| StartupError::HelperSpawn {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let pid = child.id();
        info!(
            pid = ?pid,
            "OSX Notification Center reporter started at http://{}:{}", host, port
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (exit_tx, exit_rx) = watch::channel(None);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_output(stderr, name.clone()));
        }

        tokio::spawn(supervise(child, shutdown_rx, exit_tx, name));

        Ok(Self {
            pid,
            shutdown: Some(shutdown_tx),
            exit: exit_rx,
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Exit information, if the helper has already exited
    pub fn exit_status(&self) -> Option<HelperExit> {
        *self.exit.borrow()
    }

    /// Wait until the helper exits on its own
    pub async fn exited(&mut self) -> Option<HelperExit> {
        match self.exit.wait_for(Option::is_some).await {
            Ok(exit) => *exit,
            Err(_) => None,
        }
    }

    /// Terminate the helper and wait for it to go away
    pub async fn shutdown(mut self) -> Option<HelperExit> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.exited().await
    }
}

async fn supervise(
    mut child: Child,
    shutdown: oneshot::Receiver<()>,
    exit: watch::Sender<Option<HelperExit>>,
    name: String,
) {
    // Shutdown fires on an explicit request and when the handle is dropped
    let status = tokio::select! {
        status = child.wait() => status,
        _ = shutdown => terminate(&mut child).await,
    };

    let code = match status {
        Ok(status) => status.code(),
        Err(e) => {
            warn!("Failed to wait for {}: {}", name, e);
            None
        }
    };

    match code {
        Some(code) => info!("{} exited with code {}", name, code),
        None => info!("{} exited without a code", name),
    }

    let _ = exit.send(Some(HelperExit { code }));
}

/// Log each line the helper writes at debug level; returns the line count
async fn forward_output<R>(reader: R, name: String) -> usize
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut count = 0;
    while let Ok(Some(line)) = lines.next_line().await {
        debug!("{}: {}", name, line);
        count += 1;
    }
    count
}

async fn terminate(child: &mut Child) -> std::io::Result<ExitStatus> {
    #[cfg(unix)]
    if let Some(id) = child.id() {
        if signal::kill(Pid::from_raw(id as i32), Signal::SIGTERM).is_ok() {
            if let Ok(status) = tokio::time::timeout(TERMINATE_GRACE, child.wait()).await {
                return status;
            }
        }
    }

    child.kill().await?;
    child.wait().await
}
