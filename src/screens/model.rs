/// Display model: a pure mapping from view state to the strings, tiers and
/// bar widths the dashboard draws.
///
/// Nothing here touches the terminal, so the mapping can be checked directly.

use chrono::{DateTime, Local};

use crate::core::snapshot::{CoreUsage, MemoryInfo, MetricsSnapshot};
use crate::core::tier::{bar_width, classify, Tier};
use crate::core::view::{MetricsView, Phase};

/// Placeholder for missing values inside panels
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for the top-line stats
pub const TOP_PLACEHOLDER: &str = "-";
/// Label for a percentage whose group or field is missing
pub const MISSING_PERCENT: &str = "0%";

/// One percentage-driven slot: label, clamped bar width and tier
#[derive(Debug, Clone, PartialEq)]
pub struct PercentSlot {
    pub label: String,
    pub bar: f64,
    pub tier: Tier,
}

impl PercentSlot {
    pub fn from_value(value: f64) -> Self {
        Self {
            label: format!("{:.2}%", value),
            bar: bar_width(value),
            tier: classify(value),
        }
    }

    pub fn missing() -> Self {
        Self {
            label: MISSING_PERCENT.to_string(),
            bar: 0.0,
            tier: Tier::Normal,
        }
    }

    fn from_option(value: Option<f64>) -> Self {
        value.map(Self::from_value).unwrap_or_else(Self::missing)
    }

    /// Bar width as a 0..=1 ratio, safe for gauge widgets
    pub fn ratio(&self) -> f64 {
        self.bar / 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopStats {
    pub server_time: String,
    pub uptime: String,
    pub requests_processed: String,
    pub active_processes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoreSlot {
    pub name: String,
    pub usage: PercentSlot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpuPanel {
    pub overall: PercentSlot,
    pub cores: Vec<CoreSlot>,
    pub load_one: String,
    pub load_five: String,
    pub load_fifteen: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryGroup {
    pub total: String,
    pub used: String,
    pub available: String,
    pub free: String,
    pub percent: PercentSlot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskPanel {
    pub total: String,
    pub used: String,
    pub free: String,
    pub percent: PercentSlot,
    pub read: String,
    pub write: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkPanel {
    pub sent: String,
    pub received: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPanel {
    pub total: String,
    pub in_progress: String,
    pub completed: String,
    pub cancelled: String,
    pub completion: PercentSlot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPanel {
    pub total_connections: String,
    pub active_sessions: String,
    pub success_rate: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panels {
    pub top: TopStats,
    pub cpu: CpuPanel,
    pub memory: MemoryGroup,
    pub swap: MemoryGroup,
    pub disk: DiskPanel,
    pub network: NetworkPanel,
    pub delivery: DeliveryPanel,
    pub connections: ConnectionPanel,
}

/// Exactly one body region is produced per phase
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Loading { spinner: String },
    Error { message: String, retry_enabled: bool },
    Ready(Box<Panels>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub last_updated: String,
    pub refresh_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardModel {
    pub header: Header,
    pub body: Body,
}

impl DashboardModel {
    pub fn build(view: &MetricsView) -> Self {
        Self::from_parts(
            view.phase(),
            view.last_updated(),
            view.refresh_enabled(),
            view.busy_frame(),
        )
    }

    pub fn from_parts(
        phase: &Phase,
        last_updated: Option<DateTime<Local>>,
        refresh_enabled: bool,
        spinner: Option<&str>,
    ) -> Self {
        let header = Header {
            last_updated: last_updated
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "Never".to_string()),
            refresh_enabled,
        };

        let body = match phase {
            Phase::Loading => Body::Loading {
                spinner: spinner.unwrap_or(" ").to_string(),
            },
            Phase::Error(message) => Body::Error {
                message: message.clone(),
                retry_enabled: refresh_enabled,
            },
            Phase::Ready(snapshot) => Body::Ready(Box::new(Panels::from_snapshot(snapshot))),
        };

        Self { header, body }
    }
}

fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    value.unwrap_or_else(|| placeholder.to_string())
}

fn count(value: Option<u64>) -> String {
    or_placeholder(value.map(|v| v.to_string()), NOT_AVAILABLE)
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    or_placeholder(value.map(|v| format!("{:.2} {}", v, unit)), NOT_AVAILABLE)
}

fn decimal(value: Option<f64>) -> String {
    or_placeholder(value.map(|v| format!("{:.2}", v)), NOT_AVAILABLE)
}

fn core_slot(position: usize, core: &CoreUsage) -> CoreSlot {
    // Producers number cores from 1 when no identifier is sent
    let name = match &core.core {
        Some(id) => format!("Core {}", id),
        None => format!("Core {}", position + 1),
    };

    CoreSlot {
        name,
        usage: PercentSlot::from_option(core.usage),
    }
}

impl Panels {
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        let top = TopStats {
            server_time: or_placeholder(snapshot.current_server_time.clone(), TOP_PLACEHOLDER),
            uptime: or_placeholder(snapshot.server_uptime.clone(), TOP_PLACEHOLDER),
            requests_processed: or_placeholder(
                snapshot.requests_processed.map(|v| v.to_string()),
                TOP_PLACEHOLDER,
            ),
            active_processes: or_placeholder(
                snapshot.active_processes.map(|v| v.to_string()),
                TOP_PLACEHOLDER,
            ),
        };

        let load = snapshot.load_average.as_ref();
        let cpu = CpuPanel {
            overall: match snapshot.cpu_usage {
                Some(value) => PercentSlot::from_value(value),
                None => PercentSlot {
                    label: NOT_AVAILABLE.to_string(),
                    ..PercentSlot::missing()
                },
            },
            cores: snapshot
                .cpu_usage_per_core
                .iter()
                .flatten()
                .enumerate()
                .map(|(i, core)| core_slot(i, core))
                .collect(),
            load_one: decimal(load.and_then(|l| l.one_min)),
            load_five: decimal(load.and_then(|l| l.five_min)),
            load_fifteen: decimal(load.and_then(|l| l.fifteen_min)),
        };

        let memory_group = |info: Option<&MemoryInfo>| MemoryGroup {
            total: with_unit(info.and_then(|m| m.total), "MB"),
            used: with_unit(info.and_then(|m| m.used), "MB"),
            available: with_unit(info.and_then(|m| m.available), "MB"),
            free: with_unit(info.and_then(|m| m.free), "MB"),
            percent: PercentSlot::from_option(info.and_then(|m| m.percent_used)),
        };

        let disk_usage = snapshot.disk_usage.as_ref();
        let disk_io = snapshot.disk_io.as_ref();
        let disk = DiskPanel {
            total: with_unit(disk_usage.and_then(|d| d.total), "GB"),
            used: with_unit(disk_usage.and_then(|d| d.used), "GB"),
            free: with_unit(disk_usage.and_then(|d| d.free), "GB"),
            percent: PercentSlot::from_option(disk_usage.and_then(|d| d.percent_used)),
            read: with_unit(disk_io.and_then(|d| d.read), "MB"),
            write: with_unit(disk_io.and_then(|d| d.write), "MB"),
        };

        let net = snapshot.network_io.as_ref();
        let network = NetworkPanel {
            sent: with_unit(net.and_then(|n| n.bytes_sent), "MB"),
            received: with_unit(net.and_then(|n| n.bytes_received), "MB"),
        };

        let stats = snapshot.delivery_stats.as_ref();
        let delivery = DeliveryPanel {
            total: count(stats.and_then(|d| d.total_deliveries)),
            in_progress: count(stats.and_then(|d| d.in_progress)),
            completed: count(stats.and_then(|d| d.completed)),
            cancelled: count(stats.and_then(|d| d.cancelled)),
            completion: PercentSlot::from_option(stats.and_then(|d| d.completion_rate)),
        };

        let ws = snapshot.websocket_stats.as_ref();
        let connections = ConnectionPanel {
            total_connections: count(ws.and_then(|w| w.total_connections)),
            active_sessions: count(ws.and_then(|w| w.active_tracking_sessions)),
            success_rate: or_placeholder(
                ws.and_then(|w| w.connection_success_rate).map(|r| format!("{:.2}%", r)),
                NOT_AVAILABLE,
            ),
        };

        Self {
            top,
            cpu,
            memory: memory_group(snapshot.memory_info.as_ref()),
            swap: memory_group(snapshot.swap_memory_info.as_ref()),
            disk,
            network,
            delivery,
            connections,
        }
    }
}
