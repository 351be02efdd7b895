/// Plain-text rendering of the metric panels for the `snapshot` command

use colored::Colorize;
use std::fmt::Write;

use crate::core::tier::Tier;
use crate::screens::model::{MemoryGroup, Panels, PercentSlot};

fn tier_color(tier: Tier) -> colored::Color {
    match tier {
        Tier::Normal => colored::Color::Green,
        Tier::Warning => colored::Color::Yellow,
        Tier::Critical => colored::Color::Red,
    }
}

fn percent(slot: &PercentSlot, color: bool) -> String {
    if color {
        slot.label.color(tier_color(slot.tier)).bold().to_string()
    } else {
        slot.label.clone()
    }
}

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn write_memory(out: &mut String, title: &str, group: &MemoryGroup, color: bool) {
    let _ = writeln!(out, "{}", heading(title, color));
    let _ = writeln!(out, "  {:<15}{}", "Total:", group.total);
    let _ = writeln!(out, "  {:<15}{}", "Available:", group.available);
    let _ = writeln!(out, "  {:<15}{}", "Used:", group.used);
    let _ = writeln!(out, "  {:<15}{}", "Free:", group.free);
    let _ = writeln!(out, "  {:<15}{}", "Percent Used:", percent(&group.percent, color));
}

/// Build the report text. `color` adds ANSI tier colors.
pub fn render_report(panels: &Panels, color: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}\n", heading("Server Metrics", color));
    let _ = writeln!(out, "{:<25}{}", "Current Server Time:", panels.top.server_time);
    let _ = writeln!(out, "{:<25}{}", "Server Uptime:", panels.top.uptime);
    let _ = writeln!(out, "{:<25}{}", "Requests Processed:", panels.top.requests_processed);
    let _ = writeln!(out, "{:<25}{}", "Active Processes:", panels.top.active_processes);
    out.push('\n');

    write_memory(&mut out, "Memory Info:", &panels.memory, color);
    write_memory(&mut out, "Swap Memory Info:", &panels.swap, color);
    out.push('\n');

    let _ = writeln!(out, "{} {}", heading("CPU Usage:", color), percent(&panels.cpu.overall, color));
    let _ = writeln!(out, "{}", heading("CPU Usage per Core:", color));
    if panels.cpu.cores.is_empty() {
        let _ = writeln!(out, "  N/A");
    }
    for core in &panels.cpu.cores {
        let _ = writeln!(out, "  {:<15}{}", format!("{}:", core.name), percent(&core.usage, color));
    }
    let _ = writeln!(out, "{}", heading("Load Average:", color));
    let _ = writeln!(out, "  {:<15}{}", "1 min:", panels.cpu.load_one);
    let _ = writeln!(out, "  {:<15}{}", "5 min:", panels.cpu.load_five);
    let _ = writeln!(out, "  {:<15}{}", "15 min:", panels.cpu.load_fifteen);
    out.push('\n');

    let _ = writeln!(out, "{}", heading("Disk Usage:", color));
    let _ = writeln!(out, "  {:<15}{}", "Total:", panels.disk.total);
    let _ = writeln!(out, "  {:<15}{}", "Used:", panels.disk.used);
    let _ = writeln!(out, "  {:<15}{}", "Free:", panels.disk.free);
    let _ = writeln!(out, "  {:<15}{}", "Percent Used:", percent(&panels.disk.percent, color));
    let _ = writeln!(out, "{}", heading("Disk I/O:", color));
    let _ = writeln!(out, "  {:<15}{}", "Read:", panels.disk.read);
    let _ = writeln!(out, "  {:<15}{}", "Write:", panels.disk.write);
    let _ = writeln!(out, "{}", heading("Network I/O:", color));
    let _ = writeln!(out, "  {:<15}{}", "Bytes Sent:", panels.network.sent);
    let _ = writeln!(out, "  {:<15}{}", "Bytes Received:", panels.network.received);
    out.push('\n');

    let _ = writeln!(out, "{}", heading("Delivery Analytics:", color));
    let _ = writeln!(out, "  {:<15}{}", "Total:", panels.delivery.total);
    let _ = writeln!(out, "  {:<15}{}", "In Progress:", panels.delivery.in_progress);
    let _ = writeln!(out, "  {:<15}{}", "Completed:", panels.delivery.completed);
    let _ = writeln!(out, "  {:<15}{}", "Cancelled:", panels.delivery.cancelled);
    let _ = writeln!(out, "  {:<15}{}", "Completion:", percent(&panels.delivery.completion, color));
    let _ = writeln!(out, "{}", heading("Connection Analytics:", color));
    let _ = writeln!(out, "  {:<15}{}", "Connections:", panels.connections.total_connections);
    let _ = writeln!(out, "  {:<15}{}", "Tracking:", panels.connections.active_sessions);
    let _ = writeln!(out, "  {:<15}{}", "Success Rate:", panels.connections.success_rate);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::MetricsSnapshot;

    #[test]
    fn test_report_lists_cores_in_order() {
        let snapshot = MetricsSnapshot::from_json(
            br#"{"cpuUsage": 82.3, "cpuUsagePerCore": [{"core":0,"usage":90.1},{"core":1,"usage":10.0}]}"#,
        )
        .unwrap();
        let report = render_report(&Panels::from_snapshot(&snapshot), false);

        assert!(report.contains("CPU Usage: 82.30%"));
        let core0 = report.find("Core 0:").unwrap();
        let core1 = report.find("Core 1:").unwrap();
        assert!(core0 < core1);
    }

    #[test]
    fn test_report_placeholders_without_color() {
        let report = render_report(&Panels::from_snapshot(&MetricsSnapshot::default()), false);

        assert!(report.contains("Server Uptime:           -"));
        assert!(report.contains("Percent Used:  0%"));
        assert!(report.contains("CPU Usage: N/A"));
        assert!(!report.contains('\u{1b}'));
    }
}
