/// Main TUI application

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::core::{FetchError, MetricsClient, MetricsSnapshot, MetricsView, Phase, RefreshTicket};
use crate::screens::{Dashboard, DashboardModel};
use crate::utils::{AppConfig, EVENT_POLL_MS};

type FetchOutcome = (RefreshTicket, Result<MetricsSnapshot, FetchError>);

pub struct App {
    dashboard: Dashboard,
    client: MetricsClient,
    view: MetricsView,
    should_quit: bool,
    show_help: bool,
    // Fetch tasks report back through this channel
    outcome_tx: UnboundedSender<FetchOutcome>,
    outcome_rx: UnboundedReceiver<FetchOutcome>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = MetricsClient::new(&config.endpoint, config.request_timeout())?;
        let (outcome_tx, outcome_rx) = unbounded_channel();

        Ok(Self {
            dashboard: Dashboard::new(client.url()),
            client,
            view: MetricsView::new(config.spinner_interval()),
            should_quit: false,
            show_help: false,
            outcome_tx,
            outcome_rx,
        })
    }

    pub fn view(&self) -> &MetricsView {
        &self.view
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Initial load
        self.refresh();

        let result = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Start a fetch unless one is already pending. Returns whether a fetch started.
    fn refresh(&mut self) -> bool {
        let Some(ticket) = self.view.begin_refresh() else {
            return false;
        };

        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = client.fetch().await;
            // Receiver only goes away when the app is shutting down
            let _ = tx.send((ticket, outcome));
        });

        true
    }

    /// Apply any finished fetches without blocking
    fn drain_outcomes(&mut self) {
        while let Ok((ticket, outcome)) = self.outcome_rx.try_recv() {
            self.view.settle(ticket, outcome);
        }
    }

    async fn run_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.drain_outcomes();

            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
                if let Event::Key(key_event) = event::read()? {
                    self.handle_key(key_event);
                }
            }

            if self.should_quit {
                info!("Quit requested");
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = !self.show_help,
            KeyCode::Char('r') | KeyCode::F(5) => {
                if !self.refresh() {
                    debug!("Refresh key ignored while fetch pending");
                }
            }
            KeyCode::Enter => {
                if matches!(self.view.phase(), Phase::Error(_)) {
                    self.refresh();
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        let model = DashboardModel::build(&self.view);
        self.dashboard.render(frame, &model, self.show_help);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve every connection with the same canned response
    async fn serve(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    fn app_for(endpoint: String) -> App {
        let config = AppConfig {
            endpoint,
            request_timeout_secs: 5,
            ..AppConfig::default()
        };
        App::new(&config).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    /// Wait for the pending fetch and apply it
    async fn settle_next(app: &mut App) {
        let (ticket, outcome) = app.outcome_rx.recv().await.unwrap();
        app.view.settle(ticket, outcome);
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 48)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    #[tokio::test]
    async fn test_http_500_shows_error_with_retry() {
        let mut app = app_for(serve("500 Internal Server Error", "{}").await);

        assert!(app.refresh());
        assert_eq!(app.view().phase(), &Phase::Loading);
        settle_next(&mut app).await;

        match app.view().phase() {
            Phase::Error(message) => assert!(message.contains("500")),
            other => panic!("expected error, got {:?}", other),
        }
        assert!(app.view().refresh_enabled());
        assert!(app.view().busy_frame().is_none());

        let text = screen_text(&app);
        assert!(text.contains("Press [Enter] to retry"));
        assert!(!text.contains("Loading metrics..."));
    }

    #[tokio::test]
    async fn test_refresh_key_ignored_while_pending() {
        let mut app = app_for(serve("200 OK", r#"{"cpuUsage": 82.3}"#).await);

        press(&mut app, KeyCode::Char('r'));
        assert!(!app.view().refresh_enabled());
        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::F(5));

        settle_next(&mut app).await;
        assert_eq!(app.view().phase().name(), "ready");

        // Only one fetch was spawned, so nothing else is queued
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(app.outcome_rx.try_recv().is_err());

        let text = screen_text(&app);
        assert!(text.contains("82.30%"));
    }

    #[tokio::test]
    async fn test_enter_retries_only_from_error() {
        let mut app = app_for(serve("503 Service Unavailable", "").await);

        // Enter does nothing before any error
        press(&mut app, KeyCode::Enter);
        assert!(app.view().refresh_enabled());

        press(&mut app, KeyCode::Char('r'));
        settle_next(&mut app).await;
        assert_eq!(app.view().phase().name(), "error");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view().phase(), &Phase::Loading);
        assert!(!app.view().refresh_enabled());
        settle_next(&mut app).await;
        assert!(app.view().refresh_enabled());
    }

    #[tokio::test]
    async fn test_help_and_quit_keys() {
        let mut app = app_for("http://127.0.0.1:9".to_string());

        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
