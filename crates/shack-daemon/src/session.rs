//! Daemon session arguments
//!
//! Pure mapping from user selections to each daemon's argument vector.
//! Nothing here touches the filesystem or the process table; the
//! supervisor consumes the result verbatim.

use shack_catalog::{DaemonKind, HardwareRecord};

/// PTT signalling line for external keying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PttSignal {
    #[default]
    Rts,
    Dtr,
}

impl PttSignal {
    /// Flag value as the daemons spell it.
    pub fn as_flag(self) -> &'static str {
        match self {
            PttSignal::Rts => "RTS",
            PttSignal::Dtr => "DTR",
        }
    }
}

/// External PTT keying via a dedicated serial line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PttConfig {
    pub device: String,
    pub signal: PttSignal,
}

/// Selections for a radio-control session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioSession {
    pub model: HardwareRecord,
    pub device: Option<String>,
    pub baud: Option<u32>,
    /// CI-V bus address text, e.g. `94h`. Only reaches the command line
    /// for Icom-family models; other manufacturers have no use for it.
    pub civ_address: Option<String>,
    pub ptt: Option<PttConfig>,
    pub tcp_port: u16,
}

/// Selections for a rotator- or amplifier-control session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSession {
    pub device: Option<String>,
    pub baud: Option<u32>,
    pub tcp_port: u16,
}

/// A fully specified start request for one daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonSession {
    Radio(RadioSession),
    Rotor(DeviceSession),
    Amplifier(DeviceSession),
}

impl DaemonSession {
    pub fn kind(&self) -> DaemonKind {
        match self {
            DaemonSession::Radio(_) => DaemonKind::Radio,
            DaemonSession::Rotor(_) => DaemonKind::Rotor,
            DaemonSession::Amplifier(_) => DaemonKind::Amplifier,
        }
    }

    /// Build the daemon's argument vector.
    ///
    /// Blank selections are omitted entirely rather than passed empty;
    /// verbose logging is always the last argument.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();

        match self {
            DaemonSession::Radio(radio) => {
                args.push(format!("--model={}", radio.model.id));
                if let Some(device) = selected(&radio.device) {
                    args.push(format!("--rig-file={device}"));
                }
                if radio.model.is_icom() {
                    if let Some(civ) = selected(&radio.civ_address) {
                        args.push(format!("--civaddr={civ}"));
                    }
                }
                if let Some(ptt) = &radio.ptt {
                    args.push(format!("--ptt-file={}", ptt.device));
                    args.push(format!("--ptt-type={}", ptt.signal.as_flag()));
                }
                if let Some(baud) = radio.baud {
                    args.push(format!("--serial-speed={baud}"));
                }
                args.push(format!("--port={}", radio.tcp_port));
            }
            DaemonSession::Rotor(device) => push_device_args(&mut args, "--rot-file", device),
            DaemonSession::Amplifier(device) => push_device_args(&mut args, "--amp-file", device),
        }

        args.push("-vvvv".to_string());
        args
    }
}

fn push_device_args(args: &mut Vec<String>, file_flag: &str, session: &DeviceSession) {
    if let Some(device) = selected(&session.device) {
        args.push(format!("{file_flag}={device}"));
    }
    if let Some(baud) = session.baud {
        args.push(format!("--serial-speed={baud}"));
    }
    args.push(format!("--port={}", session.tcp_port));
}

fn selected(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
