//! Capability table parsing
//!
//! Daemon `--list` output is a loosely aligned fixed-width table whose
//! exact columns drift between releases. Parsing is deliberately forgiving:
//! find the header, split rows on runs of whitespace, and skip anything
//! that does not look like a data row. The format is not contractually
//! stable, so skipping is the failure policy, not an error.

use crate::kind::DaemonKind;
use crate::records::HardwareRecord;

/// Parse a capability listing into hardware records.
///
/// Lines before the header marker are ignored; without a marker the whole
/// text is treated as the data region. Data rows need at least three
/// columns with an integer id in the first.
pub fn parse_capability_table(kind: DaemonKind, text: &str) -> Vec<HardwareRecord> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|line| is_header(kind, line))
        .map(|i| i + 1)
        .unwrap_or(0);

    lines[start..]
        .iter()
        .filter_map(|line| parse_row(line))
        .collect()
}

/// Header marker for a daemon's listing. `rigctld` prints a `Rig #`
/// column; the other daemons' headers vary between releases, so any of
/// several column words is accepted.
fn is_header(kind: DaemonKind, line: &str) -> bool {
    match kind {
        DaemonKind::Radio => line
            .match_indices("Rig")
            .any(|(pos, _)| line[pos + 3..].trim_start().starts_with('#')),
        DaemonKind::Rotor | DaemonKind::Amplifier => {
            let lower = line.to_lowercase();
            ["rotator", "amplifier", "device", "model"]
                .iter()
                .any(|marker| lower.contains(marker))
        }
    }
}

fn parse_row(line: &str) -> Option<HardwareRecord> {
    let fields = split_columns(line.trim());
    if fields.len() < 3 {
        return None;
    }
    let id: u32 = fields[0].parse().ok()?;
    Some(HardwareRecord::new(id, fields[1], fields[2]))
}

/// Split a table row on runs of two or more whitespace characters.
///
/// Single spaces stay inside a field, tolerating ragged fixed-width
/// columns and multi-word manufacturer names.
fn split_columns(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut field_start = 0usize;
    let mut run_start: Option<usize> = None;
    let mut run_len = 0usize;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if run_start.is_none() {
                run_start = Some(i);
            }
            run_len += 1;
        } else if let Some(run) = run_start {
            if run_len >= 2 && run > field_start {
                fields.push(&line[field_start..run]);
                field_start = i;
            } else if run_len >= 2 {
                field_start = i;
            }
            run_start = None;
            run_len = 0;
        }
    }

    if field_start < line.len() {
        fields.push(&line[field_start..]);
    }

    fields
}
