//! Daemon process supervision
//!
//! Owns at most one child process per daemon kind. Each running daemon
//! gets one reader task that tails its merged output; that task is the
//! only place the process-exited transition is recognized and the only
//! writer that clears the handle, so an explicit stop and a natural exit
//! can never race into a double notification.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use shack_catalog::DaemonKind;
use shack_install::resolve_executable;

use crate::error::SupervisorError;
use crate::events::DaemonEvent;

/// A live child process for one daemon kind.
struct ProcessHandle {
    pid: u32,
    stop_tx: mpsc::Sender<()>,
}

/// Per-kind handle slot. One mutex per kind keeps the three daemons fully
/// independent; an operation on one never orders against another.
type Slot = Arc<Mutex<Option<ProcessHandle>>>;

/// Supervises the three control daemons independently.
///
/// Cheap to clone; clones share the same handle slots and event stream.
/// Must be used from within a tokio runtime, which hosts the per-process
/// reader tasks.
#[derive(Clone)]
pub struct Supervisor {
    root: PathBuf,
    events: mpsc::UnboundedSender<DaemonEvent>,
    slots: [Slot; 3],
}

impl Supervisor {
    /// Create a supervisor over an installation root. Events for all
    /// three kinds arrive on the receiver half of `events`.
    pub fn new(root: impl Into<PathBuf>, events: mpsc::UnboundedSender<DaemonEvent>) -> Self {
        Self {
            root: root.into(),
            events,
            slots: std::array::from_fn(|_| Slot::default()),
        }
    }

    fn slot(&self, kind: DaemonKind) -> &Slot {
        &self.slots[kind as usize]
    }

    /// Whether a daemon process is currently registered for this kind.
    pub fn is_running(&self, kind: DaemonKind) -> bool {
        lock_slot(self.slot(kind)).is_some()
    }

    /// Start a daemon with a caller-supplied argument list, typically one
    /// built by [`DaemonSession::args`](crate::session::DaemonSession::args).
    ///
    /// Rejected with [`SupervisorError::AlreadyRunning`] while a handle
    /// exists; a rejected start never disturbs the running process. The
    /// working directory is set to the executable's own folder because the
    /// daemons resolve their auxiliary data relative to themselves.
    ///
    /// Returns the spawned process id.
    pub fn start(&self, kind: DaemonKind, args: &[String]) -> Result<u32, SupervisorError> {
        let mut slot = lock_slot(self.slot(kind));
        if slot.is_some() {
            return Err(SupervisorError::AlreadyRunning(kind));
        }

        let exe = resolve_executable(&self.root, &kind.executable_name())
            .ok_or(SupervisorError::ExecutableNotFound(kind))?;
        let workdir = exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        debug!("starting {kind}: {} {}", exe.display(), args.join(" "));

        let mut child = Command::new(&exe)
            .args(args)
            .current_dir(&workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SupervisorError::Spawn { kind, source })?;

        let pid = child.id().unwrap_or_default();
        let (stop_tx, stop_rx) = mpsc::channel(1);
        *slot = Some(ProcessHandle { pid, stop_tx });
        drop(slot);

        info!("{kind} daemon started (pid {pid})");
        let _ = self.events.send(DaemonEvent::Started { kind, pid });

        let supervisor = self.clone();
        tokio::spawn(async move {
            supervisor.tail(kind, child, stop_rx).await;
        });

        Ok(pid)
    }

    /// Request termination of a running daemon.
    ///
    /// No-op when nothing is running. Returns immediately without blocking
    /// or force-killing; the handle is cleared and `Stopped` emitted by the
    /// reader task once the process actually exits, through the same path
    /// a natural exit takes.
    pub fn stop(&self, kind: DaemonKind) {
        let slot = lock_slot(self.slot(kind));
        if let Some(handle) = slot.as_ref() {
            debug!("requesting {kind} daemon stop (pid {})", handle.pid);
            let _ = handle.stop_tx.try_send(());
        }
    }

    /// Reader loop for one daemon process. Sole owner of the child and of
    /// the handle-cleared transition.
    async fn tail(&self, kind: DaemonKind, mut child: Child, mut stop_rx: mpsc::Receiver<()>) {
        // stderr is merged into the same event stream from its own task;
        // lifecycle bookkeeping stays here with the child.
        let stderr_task = child.stderr.take().map(|stderr| {
            let events = self.events.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    let _ = events.send(DaemonEvent::OutputLine { kind, line });
                }
            })
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                tokio::select! {
                    line = lines.next_line() => {
                        match line {
                            Ok(Some(line)) => {
                                let _ = self.events.send(DaemonEvent::OutputLine { kind, line });
                            }
                            // End of stream or read failure: the process
                            // is winding down.
                            _ => break,
                        }
                    }
                    Some(()) = stop_rx.recv() => {
                        request_exit(&mut child, kind);
                    }
                }
            }
        }

        if let Some(task) = stderr_task {
            let _ = task.await;
        }

        match child.wait().await {
            Ok(status) => info!("{kind} daemon exited: {status}"),
            Err(e) => warn!("{kind} daemon wait failed: {e}"),
        }

        *lock_slot(self.slot(kind)) = None;
        let _ = self.events.send(DaemonEvent::Stopped { kind });
    }
}

fn lock_slot(slot: &Slot) -> MutexGuard<'_, Option<ProcessHandle>> {
    // A poisoned slot just means a panicked reader; the data is a plain
    // Option and stays coherent.
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Deliver a termination request: SIGTERM where the platform has it, a
/// hard kill elsewhere (which is what process termination means there).
fn request_exit(child: &mut Child, kind: DaemonKind) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // SAFETY: pid is a live child of this process.
        unsafe {
            libc::kill(pid as i32, libc::SIGTERM);
        }
        return;
    }

    if let Err(e) = child.start_kill() {
        warn!("failed to terminate {kind} daemon: {e}");
    }
}
