//! Supervisor tests against fake daemon executables
//!
//! Shell scripts stand in for the daemons so real processes are spawned,
//! tailed, and terminated without a Hamlib install.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::timeout;

use shack_catalog::{DaemonKind, HardwareRecord};
use shack_daemon::{DaemonEvent, DaemonSession, DeviceSession, RadioSession, Supervisor};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn install_daemon(root: &Path, stem: &str, script: &str) {
    let bin = root.join("bin");
    fs::create_dir_all(&bin).unwrap();
    let path = bin.join(stem);
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
}

fn radio_session() -> DaemonSession {
    DaemonSession::Radio(RadioSession {
        model: HardwareRecord::new(1, "Yaesu", "FT-817"),
        device: None,
        baud: None,
        civ_address: None,
        ptt: None,
        tcp_port: 4532,
    })
}

fn rotor_session() -> DaemonSession {
    DaemonSession::Rotor(DeviceSession {
        device: None,
        baud: None,
        tcp_port: 4533,
    })
}

fn start(
    supervisor: &Supervisor,
    session: &DaemonSession,
) -> Result<u32, shack_daemon::SupervisorError> {
    supervisor.start(session.kind(), &session.args())
}

async fn next_event(rx: &mut UnboundedReceiver<DaemonEvent>) -> DaemonEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Drain events until `Stopped` for `kind`, returning everything seen.
async fn drain_until_stopped(
    rx: &mut UnboundedReceiver<DaemonEvent>,
    kind: DaemonKind,
) -> Vec<DaemonEvent> {
    let mut events = Vec::new();
    loop {
        let event = next_event(rx).await;
        let done = event == DaemonEvent::Stopped { kind };
        events.push(event);
        if done {
            return events;
        }
    }
}

#[tokio::test]
async fn natural_exit_emits_one_stopped_and_frees_the_slot() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    install_daemon(
        dir.path(),
        "rigctld",
        "#!/bin/sh\necho ready\necho 'bound to port' >&2\n",
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let supervisor = Supervisor::new(dir.path(), tx);
    let pid = start(&supervisor, &radio_session()).unwrap();
    assert!(pid > 0);

    let events = drain_until_stopped(&mut rx, DaemonKind::Radio).await;

    let starts = events
        .iter()
        .filter(|e| matches!(e, DaemonEvent::Started { .. }))
        .count();
    let stops = events
        .iter()
        .filter(|e| matches!(e, DaemonEvent::Stopped { .. }))
        .count();
    let lines: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            DaemonEvent::OutputLine { line, .. } => Some(line.as_str()),
            _ => None,
        })
        .collect();

    assert_eq!(starts, 1);
    assert_eq!(stops, 1);
    assert!(lines.contains(&"ready"));
    assert!(lines.contains(&"bound to port"));

    // No stray events after the lifecycle completed.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());
    assert!(!supervisor.is_running(DaemonKind::Radio));
}

#[tokio::test]
async fn second_start_is_rejected_while_running() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    install_daemon(dir.path(), "rigctld", "#!/bin/sh\necho up\nexec sleep 30\n");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let supervisor = Supervisor::new(dir.path(), tx);

    start(&supervisor, &radio_session()).unwrap();
    let err = start(&supervisor, &radio_session()).unwrap_err();
    assert!(matches!(
        err,
        shack_daemon::SupervisorError::AlreadyRunning(DaemonKind::Radio)
    ));

    supervisor.stop(DaemonKind::Radio);
    let events = drain_until_stopped(&mut rx, DaemonKind::Radio).await;

    // One process lifetime: one Started, one Stopped, despite the
    // rejected start and the explicit stop.
    let starts = events
        .iter()
        .filter(|e| matches!(e, DaemonEvent::Started { .. }))
        .count();
    assert_eq!(starts, 1);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn stop_on_idle_kind_is_a_silent_noop() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let supervisor = Supervisor::new(dir.path(), tx);

    supervisor.stop(DaemonKind::Rotor);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err());
    assert!(!supervisor.is_running(DaemonKind::Rotor));
}

#[tokio::test]
async fn missing_executable_rejects_start_and_stays_idle() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let supervisor = Supervisor::new(dir.path(), tx);

    let err = start(&supervisor, &radio_session()).unwrap_err();
    assert!(matches!(
        err,
        shack_daemon::SupervisorError::ExecutableNotFound(DaemonKind::Radio)
    ));
    assert!(!supervisor.is_running(DaemonKind::Radio));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn daemon_runs_from_its_own_directory() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    install_daemon(dir.path(), "rigctld", "#!/bin/sh\npwd\n");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let supervisor = Supervisor::new(dir.path(), tx);
    start(&supervisor, &radio_session()).unwrap();

    let events = drain_until_stopped(&mut rx, DaemonKind::Radio).await;
    let cwd = events
        .iter()
        .find_map(|e| match e {
            DaemonEvent::OutputLine { line, .. } => Some(line.clone()),
            _ => None,
        })
        .expect("no output line");

    assert!(cwd.ends_with("bin"), "daemon ran from {cwd}");
}

#[tokio::test]
async fn kinds_are_supervised_independently() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    install_daemon(dir.path(), "rigctld", "#!/bin/sh\nexec sleep 30\n");
    install_daemon(dir.path(), "rotctld", "#!/bin/sh\nexec sleep 30\n");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let supervisor = Supervisor::new(dir.path(), tx);

    start(&supervisor, &radio_session()).unwrap();
    start(&supervisor, &rotor_session()).unwrap();
    assert!(supervisor.is_running(DaemonKind::Radio));
    assert!(supervisor.is_running(DaemonKind::Rotor));

    // Stopping the radio leaves the rotor untouched.
    supervisor.stop(DaemonKind::Radio);
    loop {
        match next_event(&mut rx).await {
            DaemonEvent::Stopped {
                kind: DaemonKind::Radio,
            } => break,
            event => assert_ne!(
                event,
                DaemonEvent::Stopped {
                    kind: DaemonKind::Rotor
                }
            ),
        }
    }
    assert!(supervisor.is_running(DaemonKind::Rotor));

    supervisor.stop(DaemonKind::Rotor);
    drain_until_stopped(&mut rx, DaemonKind::Rotor).await;
    assert!(!supervisor.is_running(DaemonKind::Rotor));
}

#[tokio::test]
async fn slot_frees_for_a_new_session_after_exit() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    install_daemon(dir.path(), "ampctld", "#!/bin/sh\necho one-shot\n");

    let session = DaemonSession::Amplifier(DeviceSession {
        device: None,
        baud: None,
        tcp_port: 4534,
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let supervisor = Supervisor::new(dir.path(), tx);

    start(&supervisor, &session).unwrap();
    drain_until_stopped(&mut rx, DaemonKind::Amplifier).await;

    // A completed lifecycle leaves the kind startable again.
    start(&supervisor, &session).unwrap();
    drain_until_stopped(&mut rx, DaemonKind::Amplifier).await;
}
