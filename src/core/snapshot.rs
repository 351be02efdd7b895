/// Metrics snapshot as served by the `/json` endpoint
///
/// Every field is optional: the producer may omit or null out any of them and
/// the dashboard degrades that slot to a placeholder.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_server_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_uptime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_processed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_processes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_usage_per_core: Option<Vec<CoreUsage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_average: Option<LoadAverage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_info: Option<MemoryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_memory_info: Option<MemoryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_usage: Option<DiskUsage>,
    #[serde(rename = "diskIO", skip_serializing_if = "Option::is_none")]
    pub disk_io: Option<DiskIo>,
    #[serde(rename = "networkIO", skip_serializing_if = "Option::is_none")]
    pub network_io: Option<NetworkIo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_stats: Option<DeliveryStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub websocket_stats: Option<WebsocketStats>,
}

/// Core identifier; producers send either an index or a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoreId {
    Index(u64),
    Name(String),
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreId::Index(i) => write!(f, "{}", i),
            CoreId::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreUsage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core: Option<CoreId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadAverage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub five_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifteen_min: Option<f64>,
}

/// Memory or swap figures in megabytes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_used: Option<f64>,
}

/// Disk figures in gigabytes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskUsage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_used: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskIo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkIo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_sent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_received: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_deliveries: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsocketStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_connections: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_tracking_sessions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_success_rate: Option<f64>,
}

impl MetricsSnapshot {
    /// Decode a snapshot from a raw response body
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
