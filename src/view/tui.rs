use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::fetcher::{self, FetchError, Record};
use crate::filters::{self, FilterEntry, FilterSelection};
use crate::view::{build_cards, ui_state_for, Card, UiState};

/// Result of one spawned fetch, tagged with the request generation that
/// issued it. Only the latest generation is ever applied; responses from
/// superseded refreshes are discarded.
pub struct FetchOutcome {
    pub generation: u64,
    pub result: Result<Vec<Record>, FetchError>,
}

/// Owns the dashboard state: current dataset, filter row, selection, and
/// UI state. User actions and fetch outcomes re-enter through here.
pub struct Dashboard {
    endpoint: String,
    client: reqwest::Client,
    dataset: Vec<Record>,
    filters: Vec<FilterEntry>,
    selected: usize,
    state: UiState,
    generation: u64,
    pending_filter: Option<String>,
    should_quit: bool,
    tx: mpsc::UnboundedSender<FetchOutcome>,
}

impl Dashboard {
    pub fn new(
        client: reqwest::Client,
        endpoint: String,
        initial_filter: Option<String>,
        tx: mpsc::UnboundedSender<FetchOutcome>,
    ) -> Self {
        Self {
            endpoint,
            client,
            dataset: Vec::new(),
            filters: filters::derive_filters(&[]),
            selected: 0,
            state: UiState::Loading,
            generation: 0,
            pending_filter: initial_filter,
            should_quit: false,
            tx,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn selection(&self) -> FilterSelection {
        filters::selection_at(&self.filters, self.selected)
    }

    pub fn cards(&self) -> Vec<Card> {
        build_cards(&self.dataset, &self.selection())
    }

    /// Bumps the generation token and spawns the fetch. The UI enters the
    /// loading state immediately; the dataset stays untouched until the
    /// matching outcome arrives.
    pub fn refresh(&mut self) {
        self.generation += 1;
        self.state = UiState::Loading;

        let generation = self.generation;
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = fetcher::fetch_dataset(&client, &endpoint).await;
            let _ = tx.send(FetchOutcome { generation, result });
        });
    }

    /// Applies a fetch outcome. A success replaces the dataset wholesale,
    /// rebuilds the filter row, and resets the selection; a failure keeps
    /// the previous dataset and surfaces the error.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if outcome.generation != self.generation {
            return;
        }
        match outcome.result {
            Ok(dataset) => {
                self.dataset = dataset;
                self.filters = filters::derive_filters(&self.dataset);
                self.selected = self
                    .pending_filter
                    .take()
                    .and_then(|wanted| self.filters.iter().position(|e| e.label == wanted))
                    .unwrap_or(0);
                self.state = ui_state_for(&self.cards());
            }
            Err(e) => {
                self.state = UiState::Error(e.to_string());
            }
        }
    }

    /// Selecting a filter is a pure local re-render, never a fetch. While
    /// a refresh is in flight the selection keys are inert; the filter row
    /// belongs to the dataset being replaced.
    fn select(&mut self, index: usize) {
        if self.state == UiState::Loading || index >= self.filters.len() {
            return;
        }
        self.selected = index;
        self.state = ui_state_for(&self.cards());
    }

    fn next_filter(&mut self) {
        if !self.filters.is_empty() {
            self.select((self.selected + 1) % self.filters.len());
        }
    }

    fn previous_filter(&mut self) {
        if !self.filters.is_empty() {
            self.select((self.selected + self.filters.len() - 1) % self.filters.len());
        }
    }

    pub fn on_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Right | KeyCode::Tab => self.next_filter(),
            KeyCode::Left | KeyCode::BackTab => self.previous_filter(),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                self.select((c as usize) - ('1' as usize));
            }
            _ => {}
        }
    }
}

/// Runs the interactive dashboard until the user quits. Fetches resolve on
/// the runtime's workers; this loop polls input and outcomes at 100ms.
pub async fn run_dashboard(
    client: reqwest::Client,
    endpoint: String,
    initial_filter: Option<String>,
) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("failed to enter raw mode: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {e}"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to build terminal: {e}"))?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = Dashboard::new(client, endpoint, initial_filter, tx);
    app.refresh();

    let result = event_loop(&mut terminal, &mut app, &mut rx);

    disable_raw_mode().map_err(|e| format!("failed to leave raw mode: {e}"))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| format!("failed to leave alternate screen: {e}"))?;
    let _ = terminal.show_cursor();

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut Dashboard,
    rx: &mut mpsc::UnboundedReceiver<FetchOutcome>,
) -> Result<(), String> {
    loop {
        while let Ok(outcome) = rx.try_recv() {
            app.apply_outcome(outcome);
        }

        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| format!("failed to draw frame: {e}"))?;

        if event::poll(Duration::from_millis(100)).map_err(|e| format!("input error: {e}"))? {
            if let Event::Key(key) = event::read().map_err(|e| format!("input error: {e}"))? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_filter_row(f, chunks[0], app);

    match app.state() {
        UiState::Loading => render_loading(f, chunks[1]),
        UiState::Error(message) => render_error(f, chunks[1], message, !app.dataset.is_empty()),
        UiState::Empty => render_empty(f, chunks[1]),
        UiState::Loaded => render_cards(f, chunks[1], &app.cards()),
    }

    let help = Paragraph::new("r refresh | ←/→ or 1-9 filter | q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);
}

fn render_filter_row(f: &mut Frame, area: Rect, app: &Dashboard) {
    let titles: Vec<Line> = app
        .filters
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == app.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(
                format!("{} ({})", entry.label, entry.count),
                style,
            ))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("margem"))
        .style(Style::default().fg(Color::White))
        .select(app.selected);

    f.render_widget(tabs, area);
}

fn render_cards(f: &mut Frame, area: Rect, cards: &[Card]) {
    let items: Vec<ListItem> = cards
        .iter()
        .map(|card| {
            let badge = match card.margin.as_deref() {
                Some(margin) => {
                    let color = if margin.starts_with('-') {
                        Color::Red
                    } else {
                        Color::Green
                    };
                    Span::styled(
                        format!(" {margin} margin"),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )
                }
                None => Span::styled(" margin n/a", Style::default().fg(Color::DarkGray)),
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        card.title.clone(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                    badge,
                ]),
                Line::from(Span::styled(
                    format!("  {}", card.location),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(vec![
                    Span::styled("  gross ", Style::default().fg(Color::DarkGray)),
                    Span::raw(card.gross_profit.clone()),
                    Span::styled("  debt ", Style::default().fg(Color::DarkGray)),
                    Span::raw(card.debt.clone()),
                    Span::styled("  net ", Style::default().fg(Color::DarkGray)),
                    Span::raw(card.net_profit.clone()),
                ]),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Companies"))
        .style(Style::default().fg(Color::White));

    f.render_widget(list, area);
}

fn render_loading(f: &mut Frame, area: Rect) {
    let loading = Paragraph::new("fetching dataset...")
        .block(Block::default().borders(Borders::ALL).title("Loading"))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(loading, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let empty = Paragraph::new("no records match the current filter")
        .block(Block::default().borders(Borders::ALL).title("Empty"))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(empty, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str, has_stale_data: bool) {
    let mut lines = vec![Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Red),
    ))];
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        if has_stale_data {
            "press r to retry, or a filter key to view the last fetched data"
        } else {
            "press r to retry"
        },
        Style::default().fg(Color::White),
    )));

    let error = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .style(Style::default().fg(Color::Red)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(error, area);
}
