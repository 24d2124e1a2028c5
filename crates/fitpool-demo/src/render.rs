//! Plain-text rendering of scenario reports.

use std::fmt::Write;

use fitpool_arena::{AllocationRecord, UsageReport};

use crate::session::{Event, ScenarioReport};

/// Render one event as a single line.
pub fn event_line(event: &Event) -> Option<String> {
    let line = match event {
        Event::Allocated { size, offset } => format!("✓ allocated {size} bytes at {offset}"),
        Event::AllocFailed { size, error } => format!("✗ could not allocate {size} bytes: {error}"),
        Event::Freed { record } => format!("  freed {record}"),
        Event::FreeIgnored { offset } => format!("  ignored free of untracked offset {offset}"),
        Event::Checkpoint { .. } => return None,
    };
    Some(line)
}

/// Render the live-allocation table.
pub fn layout(records: &[AllocationRecord]) -> String {
    let mut out = String::from("=== Current allocations ===\n");
    if records.is_empty() {
        out.push_str("no allocations\n");
        return out;
    }
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "allocation {}: start={}, size={} bytes",
            i + 1,
            record.start,
            record.size
        );
    }
    out
}

/// Render a usage report.
pub fn stats(report: &UsageReport) -> String {
    format!(
        "=== Memory statistics ===\n{report}\nfragmentation:      {:.2}\n",
        report.fragmentation_ratio()
    )
}

/// Render a whole scenario: banner, events interleaved with checkpoints,
/// and a teardown line.
pub fn scenario(report: &ScenarioReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "========================================");
    let _ = writeln!(out, "{} ({} byte pool)", report.name.to_uppercase(), report.pool_size);
    let _ = writeln!(out, "========================================");

    for event in &report.events {
        match event {
            Event::Checkpoint { phase } => {
                if let Some(phase) = report.phases.get(*phase) {
                    let _ = writeln!(out, "\n--- {} ---", phase.label);
                    out.push_str(&layout(&phase.layout));
                    out.push_str(&stats(&phase.stats));
                    out.push('\n');
                }
            }
            other => {
                if let Some(line) = event_line(other) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
        }
    }

    let _ = writeln!(
        out,
        "released {} live allocation(s) ({} bytes) and a {} byte pool",
        report.cleanup.released_records, report.cleanup.released_bytes, report.cleanup.pool_bytes
    );
    out
}
