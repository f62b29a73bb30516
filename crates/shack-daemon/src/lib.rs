//! Daemon Lifecycle Management
//!
//! This crate builds per-session argument vectors for the three Hamlib
//! control daemons and supervises their processes: start, live output
//! tail, stop, and exit detection, independently per daemon kind.
//!
//! # Example
//!
//! ```rust,no_run
//! use shack_catalog::{DaemonKind, HardwareRecord};
//! use shack_daemon::{DaemonSession, RadioSession, Supervisor};
//! use tokio::sync::mpsc;
//!
//! # async fn run() -> Result<(), shack_daemon::SupervisorError> {
//! let (events_tx, mut events_rx) = mpsc::unbounded_channel();
//! let supervisor = Supervisor::new("hamlib", events_tx);
//!
//! let session = DaemonSession::Radio(RadioSession {
//!     model: HardwareRecord::new(1035, "Yaesu", "FT-1000D"),
//!     device: Some("/dev/ttyUSB0".into()),
//!     baud: Some(4800),
//!     civ_address: None,
//!     ptt: None,
//!     tcp_port: DaemonKind::Radio.default_port(),
//! });
//! supervisor.start(session.kind(), &session.args())?;
//!
//! while let Some(event) = events_rx.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod session;
pub mod supervisor;

pub use error::SupervisorError;
pub use events::DaemonEvent;
pub use session::{DaemonSession, DeviceSession, PttConfig, PttSignal, RadioSession};
pub use supervisor::Supervisor;
