use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use waste_wise::{
    Category, ImpactLevel, Notification, RecordingNotifier, Severity, VendorType, WasteSession,
    WasteType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Catalog,
    Tracker,
    Vendors,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Catalog => Page::Tracker,
            Page::Tracker => Page::Vendors,
            Page::Vendors => Page::Catalog,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Catalog => Page::Vendors,
            Page::Tracker => Page::Catalog,
            Page::Vendors => Page::Tracker,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Catalog => "Identify",
            Page::Tracker => "Tracker",
            Page::Vendors => "Vendors",
        }
    }
}

pub struct App<'a> {
    pub session: &'a mut WasteSession,
    pub notifications: RecordingNotifier,
    pub current_page: Page,
    pub catalog_state: TableState,
    pub tracker_state: TableState,
    pub query: String,
    pub searching: bool,
    pub quantity: u32,
    pub error: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(session: &'a mut WasteSession) -> Self {
        let notifications = RecordingNotifier::new();
        session.set_notifier(Box::new(notifications.clone()));

        let mut catalog_state = TableState::default();
        catalog_state.select(Some(0));
        let mut tracker_state = TableState::default();
        tracker_state.select(Some(0));

        Self {
            session,
            notifications,
            current_page: Page::Catalog,
            catalog_state,
            tracker_state,
            query: String::new(),
            searching: false,
            quantity: 1,
            error: None,
        }
    }

    /// Catalog rows: search results, or everything when the query is blank
    pub fn visible_wastes(&self) -> Vec<WasteType> {
        let catalog = self.session.catalog();
        if self.query.trim().is_empty() {
            catalog.waste_types().to_vec()
        } else {
            catalog.search(&self.query).into_iter().cloned().collect()
        }
    }

    pub fn selected_category(&self) -> Category {
        let index = self.tracker_state.selected().unwrap_or(0);
        Category::ALL[index.min(Category::ALL.len() - 1)]
    }

    pub fn select_highlighted(&mut self) {
        let wastes = self.visible_wastes();
        if let Some(waste) = self.catalog_state.selected().and_then(|i| wastes.get(i)) {
            let id = waste.id.clone();
            self.run(|s| s.select(&id).map(|_| ()));
        }
    }

    pub fn record(&mut self) {
        let quantity = self.quantity;
        self.run(|s| s.record_identified(quantity).map(|_| ()));
        self.quantity = 1;
    }

    pub fn remove_identified(&mut self) {
        if let Some(id) = self.session.current_identified_waste().map(|w| w.id.clone()) {
            self.run(|s| s.store_mut().remove_entry(&id));
        }
    }

    pub fn adjust_limit(&mut self, delta: i64) {
        let category = self.selected_category();
        let current = i64::from(self.session.store().limit_for(category));
        let next = (current + delta).clamp(0, i64::from(u32::MAX)) as u32;
        self.run(|s| s.store_mut().set_limit(category, next));
    }

    fn run<F>(&mut self, op: F)
    where
        F: FnOnce(&mut WasteSession) -> waste_wise::WasteResult<()>,
    {
        self.error = op(&mut *self.session).err().map(|e| e.to_string());
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn next(&mut self) {
        let (state, len) = self.active_table();
        step(state, len, true);
    }

    pub fn previous(&mut self) {
        let (state, len) = self.active_table();
        step(state, len, false);
    }

    fn active_table(&mut self) -> (&mut TableState, usize) {
        match self.current_page {
            Page::Tracker => (&mut self.tracker_state, Category::ALL.len()),
            _ => {
                let len = self.visible_wastes().len();
                (&mut self.catalog_state, len)
            }
        }
    }

    pub fn last_notification(&self) -> Option<Notification> {
        self.notifications.last()
    }
}

fn step(state: &mut TableState, len: usize, forward: bool) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };

        if app.searching {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => app.searching = false,
                KeyCode::Backspace => {
                    app.query.pop();
                    app.catalog_state.select(Some(0));
                }
                KeyCode::Char(c) => {
                    app.query.push(c);
                    app.catalog_state.select(Some(0));
                }
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Tab => app.next_page(),
            KeyCode::BackTab => app.previous_page(),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Char('/') if app.current_page == Page::Catalog => app.searching = true,
            KeyCode::Enter if app.current_page == Page::Catalog => app.select_highlighted(),
            KeyCode::Char('+') | KeyCode::Char('=') if app.current_page == Page::Tracker => {
                app.quantity = app.quantity.saturating_add(1);
            }
            KeyCode::Char('-') if app.current_page == Page::Tracker => {
                app.quantity = app.quantity.saturating_sub(1).max(1);
            }
            KeyCode::Char('r') if app.current_page == Page::Tracker => app.record(),
            KeyCode::Char('x') if app.current_page == Page::Tracker => app.remove_identified(),
            KeyCode::Char(']') if app.current_page == Page::Tracker => app.adjust_limit(1),
            KeyCode::Char('[') if app.current_page == Page::Tracker => app.adjust_limit(-1),
            KeyCode::Char('C') if app.current_page == Page::Tracker => {
                app.run(|s| s.store_mut().clear_all());
            }
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Catalog => render_catalog(f, chunks[1], app),
        Page::Tracker => render_tracker(f, chunks[1], app),
        Page::Vendors => render_vendors(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Catalog, Page::Tracker, Page::Vendors];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    let identified = app
        .session
        .current_identified_waste()
        .map(|w| format!("Identified: {}", w.name))
        .unwrap_or_else(|| "Nothing identified".to_string());
    tab_spans.push(Span::styled(identified, Style::default().fg(Color::White)));

    let over = app.session.evaluator().over_limit().len();
    if over > 0 {
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            format!("⚠ {} over limit", over),
            Style::default().fg(Color::Red),
        ));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn impact_color(level: ImpactLevel) -> Color {
    match level {
        ImpactLevel::Low => Color::Green,
        ImpactLevel::Medium => Color::Yellow,
        ImpactLevel::High => Color::LightRed,
        ImpactLevel::Severe => Color::Red,
    }
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn render_catalog(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let wastes = app.visible_wastes();
    let rows = wastes.iter().map(|w| {
        let impact = w.impact_level();
        Row::new(vec![
            Cell::from(w.name.clone()),
            Cell::from(w.category.as_str()),
            Cell::from(impact.as_str()).style(Style::default().fg(impact_color(impact))),
        ])
    });

    let title = if app.searching {
        format!(" Search: {}_ ", app.query)
    } else if app.query.is_empty() {
        " Catalog (/ to search) ".to_string()
    } else {
        format!(" Results for '{}' ({}) ", app.query, wastes.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(12),
            Constraint::Length(8),
        ],
    )
    .header(header_row(&["Item", "Category", "Impact"]))
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[0], &mut app.catalog_state);

    let highlighted = app.catalog_state.selected().and_then(|i| wastes.get(i));
    render_detail_panel(f, chunks[1], highlighted);
}

fn render_detail_panel(f: &mut Frame, area: Rect, waste: Option<&WasteType>) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");

    let Some(waste) = waste else {
        f.render_widget(Paragraph::new("No items match").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let impact = waste.impact_level();

    let mut lines = vec![
        Line::from(Span::styled(waste.name.clone(), label)),
        Line::from(waste.description.clone()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Decomposition: ", label),
            Span::raw(waste.decomposition_time.display()),
            Span::raw("  "),
            Span::styled(
                format!("{} impact", impact.as_str()),
                Style::default().fg(impact_color(impact)),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled("5Rs", label)),
    ];

    for r in waste.five_rs() {
        let style = if r.applicable {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled(
            format!("  {} {}", if r.applicable { "✓" } else { "·" }, r.strategy.name()),
            style,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Reuse ideas", label)));
    for suggestion in &waste.reuse_suggestions {
        lines.push(Line::from(format!("  - {}", suggestion)));
    }

    if let Some(notes) = &waste.recycling_notes {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![Span::styled("Recycling: ", label), Span::raw(notes.clone())]));
    }
    if let Some(notes) = &waste.hazardous_notes {
        lines.push(Line::from(Span::styled(
            format!("Hazard: {}", notes),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_tracker(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    // Record panel
    let record_text = match app.session.current_identified_waste() {
        Some(waste) => vec![
            Line::from(format!("Record disposal of {}", waste.name)),
            Line::from(vec![
                Span::raw("Quantity: "),
                Span::styled(
                    app.quantity.to_string(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw("   (+/- adjust, r record, x remove from log)"),
            ]),
        ],
        None => vec![Line::from("Identify an item on the first page to record disposals.")],
    };
    f.render_widget(
        Paragraph::new(record_text).block(Block::default().borders(Borders::ALL).title(" Record ")),
        chunks[0],
    );

    // Category stats
    let stats = app.session.evaluator().stats();
    let rows = stats.iter().map(|s| {
        let color = if s.is_over_limit { Color::Red } else { Color::White };
        Row::new(vec![
            Cell::from(s.name),
            Cell::from(format!("{}", s.count)).style(Style::default().fg(color)),
            Cell::from(format!("{}", s.limit)),
            Cell::from(if s.is_over_limit {
                format!("over by {}", s.over_by)
            } else {
                format!("{}%", s.progress_percent())
            })
            .style(Style::default().fg(color)),
        ])
    });

    let stats_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(12),
        ],
    )
    .header(header_row(&["Category", "Today", "Limit", "Status"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Today ([ ] limit, C clear all) "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, stats_chunks[0], &mut app.tracker_state);

    let selected = app.session.evaluator().stat_for(app.selected_category());
    let gauge_color = if selected.is_over_limit { Color::Red } else { Color::Green };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", selected.name)),
        )
        .gauge_style(Style::default().fg(gauge_color))
        .percent(selected.progress_percent())
        .label(format!("{} / {}", selected.count, selected.limit));
    f.render_widget(gauge, stats_chunks[1]);
}

fn render_vendors(f: &mut Frame, area: Rect, app: &App) {
    let catalog = app.session.catalog();
    let category = app.session.current_identified_waste().map(|w| w.category);

    let vendors: Vec<&VendorType> = match category {
        Some(c) => catalog.vendors_accepting(c),
        None => catalog.vendors().iter().collect(),
    };

    let title = match category {
        Some(c) => format!(" Vendors accepting {} ", c),
        None => " All vendors ".to_string(),
    };

    let mut lines = Vec::new();
    if vendors.is_empty() {
        lines.push(Line::from("No vendors accept this category."));
    }

    for vendor in vendors {
        lines.push(Line::from(Span::styled(
            vendor.name.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("  {}", vendor.description)));
        lines.push(Line::from(format!("  {} · {}", vendor.location, vendor.contact)));

        let accepted: Vec<&str> = vendor.accepted_categories.iter().map(|c| c.as_str()).collect();
        lines.push(Line::from(format!("  Accepts: {}", accepted.join(", "))));

        if let Some(price) = category.and_then(|c| vendor.price_for(c)) {
            lines.push(Line::from(format!("  Pricing: {}", price.display())));
        }
        if let Some(site) = &vendor.website {
            lines.push(Line::from(format!("  {}", site)));
        }
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(err) = &app.error {
        status_spans.push(Span::styled(
            format!(" {} ", err),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(n) = app.last_notification() {
        let color = match n.severity {
            Severity::Info => Color::Green,
            Severity::Destructive => Color::Red,
        };
        status_spans.push(Span::styled(
            format!(" {}: {} ", n.title, n.description),
            Style::default().fg(color),
        ));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Select | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
