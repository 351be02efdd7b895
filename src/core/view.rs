/// MetricsView state machine
///
/// Exactly one phase is active at a time. A refresh moves the view to
/// `Loading` and hands out a ticket; the fetch outcome comes back through
/// `settle`, which is the single exit point for every refresh.

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::core::busy::BusyIndicator;
use crate::core::client::FetchError;
use crate::core::snapshot::MetricsSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    Error(String),
    Ready(Box<MetricsSnapshot>),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Error(_) => "error",
            Phase::Ready(_) => "ready",
        }
    }
}

/// Identifies one refresh. Only the outcome for the latest ticket is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

struct InFlight {
    ticket: RefreshTicket,
    busy: BusyIndicator,
    started: Instant,
}

pub struct MetricsView {
    phase: Phase,
    last_updated: Option<DateTime<Local>>,
    in_flight: Option<InFlight>,
    next_ticket: u64,
    spinner_interval: Duration,
}

impl MetricsView {
    pub fn new(spinner_interval: Duration) -> Self {
        Self {
            phase: Phase::Loading,
            last_updated: None,
            in_flight: None,
            next_ticket: 0,
            spinner_interval,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Wall-clock time of the last successful refresh
    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    /// The refresh/retry control is disabled while a fetch is pending
    pub fn refresh_enabled(&self) -> bool {
        self.in_flight.is_none()
    }

    pub fn busy_frame(&self) -> Option<&'static str> {
        self.in_flight.as_ref().map(|f| f.busy.frame())
    }

    /// Enter `Loading` and start the busy indicator.
    ///
    /// Returns `None` when a refresh is already pending. Requires a tokio
    /// runtime for the indicator task.
    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        if self.in_flight.is_some() {
            debug!("Refresh ignored, fetch already pending");
            return None;
        }

        self.next_ticket += 1;
        let ticket = RefreshTicket(self.next_ticket);

        self.phase = Phase::Loading;
        self.in_flight = Some(InFlight {
            ticket,
            busy: BusyIndicator::start(self.spinner_interval),
            started: Instant::now(),
        });

        info!(ticket = ticket.0, "Refresh started");
        Some(ticket)
    }

    /// Apply a fetch outcome. Stops the busy indicator and re-enables refresh.
    ///
    /// Returns false if the ticket is stale and the outcome was dropped.
    pub fn settle(&mut self, ticket: RefreshTicket, outcome: Result<MetricsSnapshot, FetchError>) -> bool {
        let current = match self.in_flight.as_ref() {
            Some(in_flight) if in_flight.ticket == ticket => in_flight,
            _ => {
                debug!(ticket = ticket.0, "Dropping stale refresh outcome");
                return false;
            }
        };
        let elapsed_ms = current.started.elapsed().as_millis() as u64;

        // Dropping the in-flight record aborts the indicator task
        self.in_flight = None;

        match outcome {
            Ok(snapshot) => {
                info!(ticket = ticket.0, elapsed_ms, "Refresh succeeded");
                self.last_updated = Some(Local::now());
                self.phase = Phase::Ready(Box::new(snapshot));
            }
            Err(e) => {
                warn!(ticket = ticket.0, elapsed_ms, kind = e.kind(), error = %e, "Refresh failed");
                self.phase = Phase::Error(e.to_string());
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn view() -> MetricsView {
        MetricsView::new(Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_initial_phase_is_loading() {
        let view = view();
        assert_eq!(view.phase(), &Phase::Loading);
        assert!(view.last_updated().is_none());
        assert!(view.busy_frame().is_none());
    }

    #[tokio::test]
    async fn test_refresh_disables_control_until_settled() {
        let mut view = view();

        let ticket = view.begin_refresh().unwrap();
        assert!(!view.refresh_enabled());
        assert!(view.busy_frame().is_some());

        // A second trigger while pending is refused
        assert!(view.begin_refresh().is_none());

        let snapshot = MetricsSnapshot {
            cpu_usage: Some(12.0),
            ..Default::default()
        };
        assert!(view.settle(ticket, Ok(snapshot.clone())));

        assert!(view.refresh_enabled());
        assert!(view.busy_frame().is_none());
        assert_eq!(view.phase(), &Phase::Ready(Box::new(snapshot)));
        assert!(view.last_updated().is_some());
    }

    #[tokio::test]
    async fn test_http_error_settles_into_error_phase() {
        let mut view = view();
        let ticket = view.begin_refresh().unwrap();

        view.settle(ticket, Err(FetchError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR)));

        match view.phase() {
            Phase::Error(message) => assert!(message.contains("500")),
            other => panic!("expected error phase, got {:?}", other),
        }
        assert!(view.refresh_enabled());
        assert!(view.busy_frame().is_none());
        assert!(view.last_updated().is_none());
    }

    #[tokio::test]
    async fn test_parse_error_settles_into_error_phase() {
        let mut view = view();
        let ticket = view.begin_refresh().unwrap();

        let parse_err = serde_json::from_str::<MetricsSnapshot>("{").unwrap_err();
        view.settle(ticket, Err(FetchError::Parse(parse_err)));

        assert_eq!(view.phase().name(), "error");
        assert!(view.refresh_enabled());
    }

    #[tokio::test]
    async fn test_retry_from_error_returns_to_loading() {
        let mut view = view();
        let first = view.begin_refresh().unwrap();
        view.settle(first, Err(FetchError::HttpStatus(StatusCode::BAD_GATEWAY)));

        let second = view.begin_refresh().unwrap();
        assert_ne!(first, second);
        assert_eq!(view.phase(), &Phase::Loading);
    }

    #[tokio::test]
    async fn test_error_keeps_previous_last_updated() {
        let mut view = view();
        let ticket = view.begin_refresh().unwrap();
        view.settle(ticket, Ok(MetricsSnapshot::default()));
        let stamp = view.last_updated();

        let ticket = view.begin_refresh().unwrap();
        view.settle(ticket, Err(FetchError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE)));
        assert_eq!(view.last_updated(), stamp);
    }

    #[tokio::test]
    async fn test_stale_ticket_is_ignored() {
        let mut view = view();
        let old = view.begin_refresh().unwrap();
        view.settle(old, Err(FetchError::HttpStatus(StatusCode::BAD_GATEWAY)));

        let current = view.begin_refresh().unwrap();
        assert!(!view.settle(old, Ok(MetricsSnapshot::default())));
        assert_eq!(view.phase(), &Phase::Loading);
        assert!(!view.refresh_enabled());

        assert!(view.settle(current, Ok(MetricsSnapshot::default())));
        assert_eq!(view.phase().name(), "ready");
    }
}
