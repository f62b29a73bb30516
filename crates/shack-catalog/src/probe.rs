//! Capability probes
//!
//! Short-lived invocations of the installed daemons, used only to read
//! their capability listing and version banner. Each probe is its own
//! process with a hard timeout and is killed if the budget runs out; a
//! probe never touches a daemon that is already running as a server.

use std::path::Path;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use shack_install::resolve_executable;

use crate::error::CatalogError;
use crate::kind::DaemonKind;
use crate::parse::parse_capability_table;
use crate::records::HardwareRecord;

/// Timeout for the version banner probe.
const VERSION_TIMEOUT: Duration = Duration::from_secs(5);

/// Version string reported when the banner probe fails in any way.
pub const UNKNOWN_VERSION: &str = "unknown";

/// List the hardware models a daemon supports.
///
/// Runs `<exe> --list` under the kind's timeout and parses the combined
/// stdout and stderr. An error here is a notification for the caller, not
/// something to abort on: daemons configured from an earlier catalog stay
/// usable whether or not this probe succeeds.
pub async fn list_models(
    root: &Path,
    kind: DaemonKind,
) -> Result<Vec<HardwareRecord>, CatalogError> {
    let exe = resolve_executable(root, &kind.executable_name())
        .ok_or(CatalogError::ExecutableNotFound(kind))?;

    let output = run_probe(&exe, "--list", kind.list_timeout(), kind).await?;
    let records = parse_capability_table(kind, &output.combined());
    debug!("{kind} capability probe returned {} models", records.len());
    Ok(records)
}

/// Version of the installed release, read from the radio daemon's banner.
///
/// All three daemons ship in the same release, so one oracle suffices.
/// Best-effort: any probe failure collapses to [`UNKNOWN_VERSION`].
/// Returns `None` only when no radio daemon is installed at all.
pub async fn installed_version(root: &Path) -> Option<String> {
    let kind = DaemonKind::Radio;
    let exe = resolve_executable(root, &kind.executable_name())?;

    let output = match run_probe(&exe, "--version", VERSION_TIMEOUT, kind).await {
        Ok(output) => output,
        Err(e) => {
            warn!("version probe failed: {e}");
            return Some(UNKNOWN_VERSION.to_string());
        }
    };

    let banner = if output.stdout.trim().is_empty() {
        output.stderr
    } else {
        output.stdout
    };
    Some(normalize_version(&banner))
}

struct ProbeOutput {
    stdout: String,
    stderr: String,
}

impl ProbeOutput {
    fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

async fn run_probe(
    exe: &Path,
    flag: &str,
    budget: Duration,
    kind: DaemonKind,
) -> Result<ProbeOutput, CatalogError> {
    debug!("probing {} {flag}", exe.display());

    let mut cmd = Command::new(exe);
    // A probe that overruns its budget is abandoned; kill it rather than
    // leaving a stray process behind.
    cmd.arg(flag).kill_on_drop(true);

    let output = match timeout(budget, cmd.output()).await {
        Ok(result) => result.map_err(|e| CatalogError::ProbeFailed {
            kind,
            reason: e.to_string(),
        })?,
        Err(_) => return Err(CatalogError::ProbeTimeout { kind, budget }),
    };

    Ok(ProbeOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Reduce a version banner to a short display string.
///
/// Banners look like `rigctld Hamlib 4.6.2 <date> <commit>`; keep the
/// project, version, and trailing identifier when the shape matches,
/// otherwise the first line verbatim.
fn normalize_version(banner: &str) -> String {
    let text = banner.trim();
    if text.is_empty() {
        return UNKNOWN_VERSION.to_string();
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() >= 4 {
        format!("{} {} {}", tokens[1], tokens[2], tokens[tokens.len() - 1])
    } else {
        text.lines().next().unwrap_or(UNKNOWN_VERSION).to_string()
    }
}
