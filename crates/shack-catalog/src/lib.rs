//! Hardware Capability Catalog
//!
//! This crate discovers which hardware models each installed control daemon
//! supports by running the daemon itself in a short-lived probe and parsing
//! its tabular listing, and reads the installed release version from the
//! radio daemon's banner.
//!
//! Probes are independent process invocations with hard timeouts. They
//! never talk to a daemon that is already running as a server, and their
//! failures degrade to an empty catalog rather than stopping anything else.

pub mod error;
pub mod kind;
pub mod parse;
pub mod probe;
pub mod records;

pub use error::CatalogError;
pub use kind::DaemonKind;
pub use parse::parse_capability_table;
pub use probe::{installed_version, list_models, UNKNOWN_VERSION};
pub use records::{find_by_id, HardwareRecord};
