//! Hamlib Release Management
//!
//! This crate maintains the local installation tree of the Hamlib control
//! daemons (`rigctld`, `rotctld`, `ampctld`): locating installed executables
//! across the layouts different releases ship with, and replacing the tree
//! with a freshly downloaded release archive from the GitHub feed.
//!
//! # Example
//!
//! ```rust,no_run
//! use shack_install::{default_install_root, ReleaseInstaller};
//!
//! # async fn run() -> Result<(), shack_install::InstallError> {
//! let root = default_install_root();
//! let installer = ReleaseInstaller::for_hamlib();
//! let tag = installer.install(&root, |fraction| {
//!     println!("{:.0}%", fraction * 100.0);
//! }).await?;
//! println!("installed {tag}");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod installer;
pub mod resolve;

pub use error::InstallError;
pub use installer::{ReleaseInstaller, HAMLIB_RELEASES_URL};
pub use resolve::{default_install_root, newest_bin_dir, resolve_executable};
