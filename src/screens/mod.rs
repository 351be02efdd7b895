pub mod dashboard;
pub mod model;
pub mod report;

// The dashboard is a single screen:
// - Header: title, source endpoint, last-updated time, refresh state
// - Body: exactly one of spinner, error panel, or metric panels
// - Footer: key hints
//
// `model` maps view state to display values, `dashboard` draws them with
// ratatui and `report` prints them as plain text for the snapshot command.

pub use dashboard::Dashboard;
pub use model::DashboardModel;
