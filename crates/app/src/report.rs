//! Human-readable ingestion report printed on success.

use std::fmt::Write;

use scanbridge_domain::{IngestionReport, IngestionStats};

/// Render the report as plain text, one fact per line.
pub fn render(report: &IngestionReport) -> String {
    let mut out = String::new();
    let slot = &report.slot;
    let activity = &report.activity;

    let _ = writeln!(out, "Upload ID: {}", slot.id);
    let _ = writeln!(out, "Upload URL: {}", slot.url);
    let _ = writeln!(out, "System Activity ID: {}", slot.system_activity_id);
    let _ = writeln!(out, "System Activity Status: {}", activity.status);
    if let Some(info) = activity.status_info.as_deref().filter(|info| !info.is_empty()) {
        let _ = writeln!(out, "Status Info: {info}");
    }

    if let Some(result) = &activity.result {
        write_stats(&mut out, "Data sources", result.data_sources);
        write_stats(&mut out, "Findings", result.findings);
        write_stats(&mut out, "Events", result.events);
        write_stats(&mut out, "Tags", result.tags);
        let _ = writeln!(out, "Unresolved assets: {}", result.unresolved_assets.count);
        for id in &result.unresolved_assets.ids {
            let _ = writeln!(out, "  - {id}");
        }
    }

    out
}

fn write_stats(out: &mut String, label: &str, stats: IngestionStats) {
    let _ = writeln!(out, "{label}: {} incoming, {} handled", stats.incoming, stats.handled);
}
