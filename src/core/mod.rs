pub mod snapshot;
pub mod client;
pub mod tier;
pub mod busy;
pub mod view;

pub use client::{FetchError, MetricsClient};
pub use snapshot::MetricsSnapshot;
pub use tier::{classify, Tier};
pub use view::{MetricsView, Phase, RefreshTicket};
