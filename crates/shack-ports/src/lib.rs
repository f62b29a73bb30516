//! Serial Port Enumeration
//!
//! Lists the serial ports a user can assign to a daemon's rig, rotator,
//! amplifier, or PTT line. Pseudo-ports that are never radio hardware
//! (Bluetooth endpoints, debug consoles) are filtered out.

use serialport::{available_ports, SerialPortType};
use thiserror::Error;
use tracing::info;

/// Failure to enumerate ports. Callers may treat this as an empty list;
/// port selection is an input aid, not a requirement.
#[derive(Debug, Error)]
pub enum PortsError {
    #[error("failed to enumerate serial ports: {0}")]
    EnumerationFailed(String),
}

/// One selectable serial port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Port path, e.g. `/dev/ttyUSB0` or `COM3`
    pub name: String,
    /// USB product string, when the port is USB-backed
    pub product: Option<String>,
    /// USB manufacturer string, when the port is USB-backed
    pub manufacturer: Option<String>,
}

impl PortInfo {
    /// Label for a port dropdown: `"/dev/ttyUSB0 (FT232R)"`, or the bare
    /// name when nothing better is known.
    pub fn display_label(&self) -> String {
        match &self.product {
            Some(product) => format!("{} ({})", self.name, product),
            None => self.name.clone(),
        }
    }
}

/// Pseudo-port name fragments skipped during enumeration.
const SKIP_PATTERNS: &[&str] = &["Bluetooth", "debug"];

fn should_skip(name: &str) -> bool {
    SKIP_PATTERNS.iter().any(|pattern| name.contains(pattern))
}

/// Enumerate selectable serial ports.
pub fn list_ports() -> Result<Vec<PortInfo>, PortsError> {
    let ports = available_ports().map_err(|e| PortsError::EnumerationFailed(e.to_string()))?;

    let result: Vec<_> = ports
        .into_iter()
        .filter(|p| !should_skip(&p.port_name))
        .map(|p| match p.port_type {
            SerialPortType::UsbPort(usb) => PortInfo {
                name: p.port_name,
                product: usb.product,
                manufacturer: usb.manufacturer,
            },
            _ => PortInfo {
                name: p.port_name,
                product: None,
                manufacturer: None,
            },
        })
        .collect();

    info!("found {} serial port(s)", result.len());
    Ok(result)
}

/// Bare port names, for callers that only need the paths.
pub fn list_port_names() -> Vec<String> {
    list_ports()
        .map(|ports| ports.into_iter().map(|p| p.name).collect())
        .unwrap_or_default()
}
