//! Daemon identities
//!
//! The three Hamlib control daemons this system manages. The set is fixed;
//! everything keyed per daemon derives from this enum.

use std::fmt;
use std::time::Duration;

/// One of the three control daemons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DaemonKind {
    /// `rigctld`, the radio-control server
    Radio,
    /// `rotctld`, the rotator-control server
    Rotor,
    /// `ampctld`, the amplifier-control server
    Amplifier,
}

impl DaemonKind {
    /// All kinds, in display order.
    pub const ALL: [DaemonKind; 3] = [
        DaemonKind::Radio,
        DaemonKind::Rotor,
        DaemonKind::Amplifier,
    ];

    /// Executable file name, with the platform suffix.
    pub fn executable_name(self) -> String {
        let stem = match self {
            DaemonKind::Radio => "rigctld",
            DaemonKind::Rotor => "rotctld",
            DaemonKind::Amplifier => "ampctld",
        };
        format!("{stem}{}", std::env::consts::EXE_SUFFIX)
    }

    /// Default TCP listen port for the daemon's control protocol.
    pub fn default_port(self) -> u16 {
        match self {
            DaemonKind::Radio => 4532,
            DaemonKind::Rotor => 4533,
            DaemonKind::Amplifier => 4534,
        }
    }

    /// Time budget for a `--list` capability probe. The radio list is an
    /// order of magnitude larger than the other two.
    pub fn list_timeout(self) -> Duration {
        match self {
            DaemonKind::Radio => Duration::from_secs(20),
            DaemonKind::Rotor | DaemonKind::Amplifier => Duration::from_secs(10),
        }
    }

    /// Short human label.
    pub fn label(self) -> &'static str {
        match self {
            DaemonKind::Radio => "Radio",
            DaemonKind::Rotor => "Rotor",
            DaemonKind::Amplifier => "Amplifier",
        }
    }
}

impl fmt::Display for DaemonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
