use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use employee_dashboard::columns::ColumnField;
use employee_dashboard::grid::{self, ColumnFilter, GridPage, GridQuery, SortDirection};
use employee_dashboard::render::PerformanceBand;
use employee_dashboard::{
    export_to_path, logging, CellRenderers, DashboardConfig, EmployeeRecord, EmployeeStore,
    SummaryCache, SummaryStatistics, PAGE_SIZE_OPTIONS,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

/// Columns shown in the terminal grid; the rest are in the API and CSV
const VISIBLE_COLUMNS: [ColumnField; 10] = [
    ColumnField::Id,
    ColumnField::FirstName,
    ColumnField::LastName,
    ColumnField::Department,
    ColumnField::Position,
    ColumnField::Salary,
    ColumnField::Location,
    ColumnField::PerformanceRating,
    ColumnField::IsActive,
    ColumnField::Skills,
];

pub struct App {
    pub store: EmployeeStore,
    pub query: GridQuery,
    pub state: TableState,
    pub config: DashboardConfig,
    pub status_message: Option<String>,
    renderers: CellRenderers,
    cache: SummaryCache,
    /// Index into `store.departments()`; None means no department filter
    department_cursor: Option<usize>,
}

impl App {
    pub fn new(store: EmployeeStore, config: DashboardConfig) -> Result<Self> {
        let mut query = GridQuery::new();
        query.set_page_size(config.page_size)?;

        let mut state = TableState::default();
        if !store.is_empty() {
            state.select(Some(0));
        }

        Ok(Self {
            renderers: CellRenderers::new(config.render_options()),
            store,
            query,
            state,
            config,
            status_message: None,
            cache: SummaryCache::new(),
            department_cursor: None,
        })
    }

    pub fn summary(&mut self) -> SummaryStatistics {
        self.cache.get(&self.store.shared())
    }

    pub fn current_page(&self) -> Result<GridPage<'_>> {
        Ok(grid::apply(self.store.get_all(), &self.query)?)
    }

    fn reset_selection(&mut self) {
        let has_rows = self
            .current_page()
            .map(|p| !p.rows.is_empty())
            .unwrap_or(false);
        self.state.select(if has_rows { Some(0) } else { None });
    }

    pub fn next_page(&mut self) {
        let page_count = self.current_page().map(|p| p.page_count).unwrap_or(1);
        if self.query.page() + 1 < page_count {
            self.query.set_page(self.query.page() + 1);
            self.reset_selection();
        }
    }

    pub fn previous_page(&mut self) {
        if self.query.page() > 0 {
            self.query.set_page(self.query.page() - 1);
            self.reset_selection();
        }
    }

    pub fn next(&mut self) {
        let len = self.current_page().map(|p| p.rows.len()).unwrap_or(0);
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.current_page().map(|p| p.rows.len()).unwrap_or(0);
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Advance the sort column through the visible sortable columns
    pub fn cycle_sort(&mut self) {
        let sortable: Vec<ColumnField> = VISIBLE_COLUMNS
            .iter()
            .copied()
            .filter(|f| f.column().sortable)
            .collect();

        let next = match self.query.sort() {
            None => sortable.first().copied(),
            Some(spec) => sortable
                .iter()
                .position(|f| *f == spec.field)
                .and_then(|i| sortable.get(i + 1).copied()),
        };

        match next {
            Some(field) => {
                if let Err(e) = self.query.set_sort(field, SortDirection::Asc) {
                    self.status_message = Some(e.to_string());
                }
            }
            None => self.query.clear_sort(),
        }
        self.reset_selection();
    }

    pub fn reverse_sort(&mut self) {
        if let Some(spec) = self.query.sort() {
            if let Err(e) = self.query.set_sort(spec.field, spec.direction.reversed()) {
                self.status_message = Some(e.to_string());
            }
            self.reset_selection();
        }
    }

    pub fn toggle_active_only(&mut self) {
        if self.query.filter_for(ColumnField::IsActive).is_some() {
            self.query.remove_filter(ColumnField::IsActive);
        } else if let Err(e) = self.query.set_filter(ColumnField::IsActive, ColumnFilter::Boolean(true)) {
            self.status_message = Some(e.to_string());
        }
        self.reset_selection();
    }

    /// Step through departments one at a time, then back to all
    pub fn cycle_department(&mut self) {
        let departments: Vec<String> = self.store.departments().iter().map(|d| d.to_string()).collect();

        self.department_cursor = match self.department_cursor {
            None if !departments.is_empty() => Some(0),
            Some(i) if i + 1 < departments.len() => Some(i + 1),
            _ => None,
        };

        match self.department_cursor.and_then(|i| departments.get(i)) {
            Some(dept) => {
                let filter = ColumnFilter::Set(vec![dept.clone()]);
                if let Err(e) = self.query.set_filter(ColumnField::Department, filter) {
                    self.status_message = Some(e.to_string());
                }
            }
            None => self.query.remove_filter(ColumnField::Department),
        }
        self.reset_selection();
    }

    pub fn clear_filters(&mut self) {
        self.query.clear_filters();
        self.department_cursor = None;
        self.reset_selection();
    }

    pub fn toggle_page_size(&mut self) {
        let next = if self.query.page_size() == PAGE_SIZE_OPTIONS[0] {
            PAGE_SIZE_OPTIONS[1]
        } else {
            PAGE_SIZE_OPTIONS[0]
        };
        if let Err(e) = self.query.set_page_size(next) {
            self.status_message = Some(e.to_string());
        }
        self.reset_selection();
    }

    pub fn export(&mut self) {
        let path = self.config.export_path.clone();
        self.status_message = Some(
            match export_to_path(&path, self.store.get_all(), self.config.export_scope) {
                Ok(rows) => format!("Exported {} rows to {}", rows, path.display()),
                Err(e) => format!("Export failed: {}", e),
            },
        );
    }

    fn active_filter_labels(&self) -> Vec<String> {
        self.query
            .filters()
            .iter()
            .map(|(field, filter)| match filter {
                ColumnFilter::Set(values) => format!("{}={}", field, values.join("|")),
                ColumnFilter::Boolean(true) => "active only".to_string(),
                ColumnFilter::Boolean(false) => "inactive only".to_string(),
                _ => field.to_string(),
            })
            .collect()
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal; logging stays quiet until the screen is restored
    let pause = logging::StderrPause::new();
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
    drop(pause);

    if let Err(err) = res {
        tracing::error!("UI error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            app.status_message = None;
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('n') | KeyCode::Right => app.next_page(),
                KeyCode::Char('p') | KeyCode::Left => app.previous_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char('s') => app.cycle_sort(),
                KeyCode::Char('r') => app.reverse_sort(),
                KeyCode::Char('a') => app.toggle_active_only(),
                KeyCode::Char('d') => app.cycle_department(),
                KeyCode::Char('c') => app.clear_filters(),
                KeyCode::Char('z') => app.toggle_page_size(),
                KeyCode::Char('e') => app.export(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(4), // Summary cards
            Constraint::Min(0),    // Grid
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0]);
    render_summary_cards(f, chunks[1], app);
    render_table(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header_text = vec![
        Line::from(vec![
            Span::styled(
                "Employee Dashboard",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("[e] Export Data", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(
            "Manage and analyze employee data efficiently",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &mut App) {
    let stats = app.summary();
    let colors = [Color::Blue, Color::Magenta, Color::Green, Color::Yellow];

    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    for ((card, color), card_area) in stats.cards().iter().zip(colors).zip(card_areas.iter()) {
        let value = if stats.has_active_employees() {
            card.value.clone()
        } else {
            "—".to_string()
        };

        let content = Paragraph::new(vec![
            Line::from(Span::styled(card.label, Style::default().fg(Color::Gray))),
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));

        f.render_widget(content, *card_area);
    }
}

fn performance_color(rating: f64) -> Color {
    match PerformanceBand::for_rating(rating) {
        PerformanceBand::Excellent => Color::Green,
        PerformanceBand::Good => Color::Blue,
        PerformanceBand::Fair => Color::Yellow,
        PerformanceBand::Poor => Color::Red,
    }
}

fn cell_style(field: ColumnField, record: &EmployeeRecord) -> Style {
    match field {
        ColumnField::Salary => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ColumnField::PerformanceRating => Style::default().fg(performance_color(record.performance_rating)),
        ColumnField::IsActive if record.is_active => Style::default().fg(Color::Green),
        ColumnField::IsActive => Style::default().fg(Color::Red),
        ColumnField::Skills => Style::default().fg(Color::Blue),
        _ => Style::default(),
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let sort = app.query.sort();

    let header_cells = VISIBLE_COLUMNS.iter().map(|field| {
        let mut title = field.column().header_name.to_string();
        if let Some(spec) = sort.filter(|s| s.field == *field) {
            title.push(' ');
            title.push_str(spec.direction.arrow());
        }
        Cell::from(title).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let (rows, title) = match grid::apply(app.store.get_all(), &app.query) {
        Ok(page) => {
            let title = format!(
                " Employees {} to {} of {} ",
                page.first_row, page.last_row, page.total_rows
            );
            let rows: Vec<Row> = page
                .rows
                .iter()
                .map(|record| {
                    let cells = VISIBLE_COLUMNS.iter().map(|field| {
                        Cell::from(app.renderers.render(*field, record)).style(cell_style(*field, record))
                    });
                    Row::new(cells).height(1)
                })
                .collect();
            (rows, title)
        }
        Err(e) => (Vec::new(), format!(" {} ", e)),
    };

    let widths: Vec<Constraint> = VISIBLE_COLUMNS
        .iter()
        .map(|field| Constraint::Length(field.column().width / 8 + 2))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let (page, page_count) = app
        .current_page()
        .map(|p| (p.page + 1, p.page_count))
        .unwrap_or((1, 1));

    let mut status_spans = vec![Span::styled(
        format!(" Page {}/{} ({} per page) ", page, page_count, app.query.page_size()),
        Style::default().fg(Color::Cyan),
    )];

    let filters = app.active_filter_labels();
    if !filters.is_empty() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Filter: {}", filters.join(", ")),
            Style::default().fg(Color::Green),
        ));
    }

    if let Some(message) = &app.status_message {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(message.clone(), Style::default().fg(Color::Magenta)));
    }

    for (key, label) in [
        ("n/p", " Page | "),
        ("s/r", " Sort | "),
        ("a", " Active | "),
        ("d", " Dept | "),
        ("c", " Clear | "),
        ("z", " Size | "),
    ] {
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(label));
    }
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        employee_dashboard::registry::initialize();
        let store = EmployeeStore::embedded().unwrap();
        App::new(store, DashboardConfig::default()).unwrap()
    }

    #[test]
    fn test_paging_stays_in_bounds() {
        let mut app = app();
        app.previous_page();
        assert_eq!(app.query.page(), 0);

        app.next_page();
        app.next_page();
        app.next_page();
        // 24 records at 10 per page
        assert_eq!(app.query.page(), 2);
        assert_eq!(app.current_page().unwrap().rows.len(), 4);
    }

    #[test]
    fn test_summary_is_memoized() {
        let mut app = app();
        let first = app.summary();
        let second = app.summary();
        assert_eq!(first, second);
        assert_eq!(app.cache.recomputations(), 1);
    }

    #[test]
    fn test_cycle_department_then_clear() {
        let mut app = app();
        app.cycle_department();
        let page = app.current_page().unwrap();
        let first_dept = app.store.departments()[0].to_string();
        assert!(page.rows.iter().all(|r| r.department == first_dept));

        app.clear_filters();
        assert_eq!(app.current_page().unwrap().total_rows, 24);
    }

    #[test]
    fn test_active_toggle() {
        let mut app = app();
        app.toggle_active_only();
        assert_eq!(app.current_page().unwrap().total_rows, 21);
        app.toggle_active_only();
        assert_eq!(app.current_page().unwrap().total_rows, 24);
    }

    #[test]
    fn test_sort_cycle_and_reverse() {
        let mut app = app();
        app.cycle_sort();
        assert_eq!(app.query.sort().map(|s| s.field), Some(ColumnField::Id));
        app.reverse_sort();
        assert_eq!(app.current_page().unwrap().rows[0].id, 24);
    }

    #[test]
    fn test_page_size_toggle() {
        let mut app = app();
        app.toggle_page_size();
        assert_eq!(app.query.page_size(), 20);
        app.toggle_page_size();
        assert_eq!(app.query.page_size(), 10);
    }
}
