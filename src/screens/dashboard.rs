/// Main dashboard screen

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::screens::model::{
    Body, ConnectionPanel, CpuPanel, DashboardModel, DeliveryPanel, DiskPanel, MemoryGroup,
    NetworkPanel, Panels, PercentSlot, TopStats,
};

/// Width in cells of the inline per-core bars
const CORE_BAR_WIDTH: usize = 20;

/// Render a ratio (0..=1) as a fixed-width block bar
fn text_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn label_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn value_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

/// "Label: value" line used throughout the panels
fn field_line<'a>(label: &'a str, value: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), label_style()),
        Span::styled(value, value_style()),
    ])
}

pub struct Dashboard {
    pub title: String,
    endpoint: String,
}

impl Dashboard {
    pub fn new(endpoint: &str) -> Self {
        Self {
            title: "Server Metrics Dashboard".to_string(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn render(&self, frame: &mut Frame, model: &DashboardModel, show_help: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Min(0),    // Body
                Constraint::Length(3), // Footer
            ])
            .split(frame.size());

        self.render_header(frame, chunks[0], model);

        // Exactly one body region per phase
        match &model.body {
            Body::Loading { spinner } => self.render_loading(frame, chunks[1], spinner),
            Body::Error { message, retry_enabled } => {
                self.render_error(frame, chunks[1], message, *retry_enabled)
            }
            Body::Ready(panels) => self.render_panels(frame, chunks[1], panels),
        }

        let footer_text = match &model.body {
            Body::Error { retry_enabled: true, .. } => "[Enter] Retry | [r]efresh | [?] Help | [q]uit",
            _ if model.header.refresh_enabled => "[r]efresh | [?] Help | [q]uit",
            _ => "Fetching... | [?] Help | [q]uit",
        };
        let footer = Paragraph::new(footer_text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);

        if show_help {
            self.render_help(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, model: &DashboardModel) {
        let refresh_span = if model.header.refresh_enabled {
            Span::styled("[r] Refresh", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        } else {
            Span::styled("Refreshing...", Style::default().fg(Color::DarkGray))
        };

        let title_line = Line::from(vec![
            Span::styled(
                &self.title,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            refresh_span,
        ]);

        let info_line = Line::from(vec![
            Span::styled("Source: ", label_style()),
            Span::styled(&self.endpoint, Style::default().fg(Color::White)),
            Span::raw(" | "),
            Span::styled("Last updated: ", label_style()),
            Span::styled(&model.header.last_updated, Style::default().fg(Color::White)),
        ]);

        let header = Paragraph::new(vec![title_line, info_line])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect, spinner: &str) {
        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(spinner, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled("Loading metrics...", Style::default().fg(Color::Gray)),
            ]),
        ];

        let loading = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, area);
    }

    fn render_error(&self, frame: &mut Frame, area: Rect, message: &str, retry_enabled: bool) {
        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Failed to load metrics",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::White))),
            Line::from(""),
        ];

        if retry_enabled {
            text.push(Line::from(Span::styled(
                "Press [Enter] to retry",
                Style::default().fg(Color::Yellow),
            )));
        }

        let error = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error "),
            );
        frame.render_widget(error, area);
    }

    fn render_panels(&self, frame: &mut Frame, area: Rect, panels: &Panels) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Top-line stats
                Constraint::Min(6),    // CPU | Memory & Swap
                Constraint::Length(8), // Disk | Network | Deliveries | Connections
            ])
            .split(area);

        self.render_top_stats(frame, rows[0], &panels.top);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        self.render_cpu(frame, middle[0], &panels.cpu);
        self.render_memory(frame, middle[1], &panels.memory, &panels.swap);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(20),
                Constraint::Percentage(30),
                Constraint::Percentage(20),
            ])
            .split(rows[2]);
        self.render_disk(frame, bottom[0], &panels.disk);
        self.render_network(frame, bottom[1], &panels.network);
        self.render_deliveries(frame, bottom[2], &panels.delivery);
        self.render_connections(frame, bottom[3], &panels.connections);
    }

    fn render_top_stats(&self, frame: &mut Frame, area: Rect, top: &TopStats) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        let stats = [
            ("Server Time", top.server_time.as_str()),
            ("Uptime", top.uptime.as_str()),
            ("Requests", top.requests_processed.as_str()),
            ("Processes", top.active_processes.as_str()),
        ];

        for (cell, (title, value)) in cells.iter().zip(stats) {
            let widget = Paragraph::new(Line::from(Span::styled(value, value_style())))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)));
            frame.render_widget(widget, *cell);
        }
    }

    /// Label line followed by a tier-colored gauge
    fn render_percent(&self, frame: &mut Frame, area: Rect, slot: &PercentSlot) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(slot.tier.color()).bg(Color::Black))
            .ratio(slot.ratio())
            .label(Span::styled(
                slot.label.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));
        frame.render_widget(gauge, area);
    }

    fn render_cpu(&self, frame: &mut Frame, area: Rect, cpu: &CpuPanel) {
        let block = Block::default().borders(Borders::ALL).title(" CPU Usage ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Overall gauge
                Constraint::Length(1), // Load average
                Constraint::Min(0),    // Per-core list
            ])
            .split(inner);

        self.render_percent(frame, parts[0], &cpu.overall);

        let load = Paragraph::new(Line::from(vec![
            Span::styled("Load avg: ", label_style()),
            Span::styled(
                format!("{} / {} / {}", cpu.load_one, cpu.load_five, cpu.load_fifteen),
                value_style(),
            ),
        ]));
        frame.render_widget(load, parts[1]);

        // Rebuilt from the snapshot every frame so no stale cores linger
        let items: Vec<ListItem> = cpu
            .cores
            .iter()
            .map(|core| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<10}", core.name), label_style()),
                    Span::styled(
                        text_bar(core.usage.ratio(), CORE_BAR_WIDTH),
                        Style::default().fg(core.usage.tier.color()),
                    ),
                    Span::raw(" "),
                    Span::styled(
                        core.usage.label.clone(),
                        Style::default().fg(core.usage.tier.color()).add_modifier(Modifier::BOLD),
                    ),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items), parts[2]);
    }

    fn render_memory(&self, frame: &mut Frame, area: Rect, memory: &MemoryGroup, swap: &MemoryGroup) {
        let block = Block::default().borders(Borders::ALL).title(" Memory & Swap ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let halves = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
            .split(inner);

        self.render_memory_group(frame, halves[0], "Memory", memory);
        self.render_memory_group(frame, halves[1], "Swap", swap);
    }

    fn render_memory_group(&self, frame: &mut Frame, area: Rect, name: &str, group: &MemoryGroup) {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        // Name and gauge share the first row
        let heading = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(parts[0]);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                name,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))),
            heading[0],
        );
        self.render_percent(frame, heading[1], &group.percent);

        let lines = vec![
            Line::from(vec![
                Span::styled("Total: ", label_style()),
                Span::styled(&group.total, value_style()),
                Span::raw("  "),
                Span::styled("Used: ", label_style()),
                Span::styled(&group.used, value_style()),
            ]),
            Line::from(vec![
                Span::styled("Free: ", label_style()),
                Span::styled(&group.free, value_style()),
                Span::raw("  "),
                Span::styled("Available: ", label_style()),
                Span::styled(&group.available, value_style()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), parts[1]);
    }

    fn render_disk(&self, frame: &mut Frame, area: Rect, disk: &DiskPanel) {
        let block = Block::default().borders(Borders::ALL).title(" Disk ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        self.render_percent(frame, parts[0], &disk.percent);

        let lines = vec![
            field_line("Total", &disk.total),
            field_line("Used", &disk.used),
            field_line("Free", &disk.free),
            field_line("I/O Read", &disk.read),
            field_line("I/O Write", &disk.write),
        ];
        frame.render_widget(Paragraph::new(lines), parts[1]);
    }

    fn render_network(&self, frame: &mut Frame, area: Rect, network: &NetworkPanel) {
        let lines = vec![
            field_line("Sent", &network.sent),
            field_line("Received", &network.received),
        ];
        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Network I/O "));
        frame.render_widget(widget, area);
    }

    fn render_deliveries(&self, frame: &mut Frame, area: Rect, delivery: &DeliveryPanel) {
        let block = Block::default().borders(Borders::ALL).title(" Delivery Analytics ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        self.render_percent(frame, parts[0], &delivery.completion);

        let lines = vec![
            field_line("Total", &delivery.total),
            field_line("In progress", &delivery.in_progress),
            field_line("Completed", &delivery.completed),
            field_line("Cancelled", &delivery.cancelled),
        ];
        frame.render_widget(Paragraph::new(lines), parts[1]);
    }

    fn render_connections(&self, frame: &mut Frame, area: Rect, connections: &ConnectionPanel) {
        let lines = vec![
            field_line("Total", &connections.total_connections),
            field_line("Tracking", &connections.active_sessions),
            field_line("Success", &connections.success_rate),
        ];
        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Connections "));
        frame.render_widget(widget, area);
    }

    fn render_help(&self, frame: &mut Frame) {
        // Create centered overlay
        let area = frame.size();
        let popup_width = area.width.min(60);
        let popup_height = area.height.min(14);
        let popup_area = Rect {
            x: (area.width.saturating_sub(popup_width)) / 2,
            y: (area.height.saturating_sub(popup_height)) / 2,
            width: popup_width,
            height: popup_height,
        };

        let help_text = vec![
            Line::from(Span::styled(
                "Keyboard Shortcuts",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("  [r]            Refresh metrics"),
            Line::from("  [Enter]        Retry after an error"),
            Line::from("  [?] / [F1]     Toggle this help screen"),
            Line::from("  [q] / [Esc]    Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "Colors: green < 50%, yellow 50-75%, red >= 75%",
                Style::default().fg(Color::Gray),
            )),
        ];

        let help = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title(" Help "))
            .wrap(Wrap { trim: false });

        frame.render_widget(Clear, popup_area);
        frame.render_widget(help, popup_area);
    }
}
