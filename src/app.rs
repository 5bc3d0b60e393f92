use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Utc};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row,
        Table, Wrap,
    },
    Frame, Terminal,
};

use crate::cities::{self, City, CITIES};
use crate::config::QrConfig;
use crate::error::WeatherError;
use crate::locale;
use crate::qr::QrImage;
use crate::refresh::{Outcome, Refresher};
use crate::weather::{Current, Dataset, Day, MISSING};

const TICK: Duration = Duration::from_millis(250);
const LOADING: &str = "Henter data";

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    Refresh,
    Switch(&'static City),
}

/// City picker overlay, opened by a mobile deep link or the `c` key.
#[derive(Debug, Clone, PartialEq)]
pub struct Picker {
    pub selected: usize,
}

impl Picker {
    fn next(&mut self) {
        self.selected = (self.selected + 1) % CITIES.len();
    }

    fn previous(&mut self) {
        self.selected = (self.selected + CITIES.len() - 1) % CITIES.len();
    }
}

/// Everything on screen. Replaced piecewise as fetches complete.
pub struct App {
    pub city: &'static City,
    pub dataset: Option<Dataset>,
    pub status: Status,
    pub picker: Option<Picker>,
    pub qr: Option<QrImage>,
    pub updated_at: Option<DateTime<Utc>>,
    qr_config: QrConfig,
}

impl App {
    pub fn new(city: &'static City, qr_config: QrConfig) -> Self {
        let mut app = Self {
            city,
            dataset: None,
            status: Status::Loading,
            picker: None,
            qr: None,
            updated_at: None,
            qr_config,
        };
        app.update_qr();
        app
    }

    fn update_qr(&mut self) {
        self.qr = match QrImage::for_city(
            &self.qr_config.base_url,
            self.city.key,
            self.qr_config.render_locally,
        ) {
            Ok(qr) => Some(qr),
            Err(e) => {
                log::warn!("QR code unavailable: {e}");
                None
            }
        };
    }

    /// Makes `key` the active city. Unknown keys leave everything as it was.
    pub fn switch_city(&mut self, key: &str) -> Result<&'static City, WeatherError> {
        let city = cities::lookup(key).inspect_err(|e| log::error!("{e}"))?;
        if city.key != self.city.key {
            log::info!("switching to city {}", city.name);
            self.city = city;
            self.dataset = None;
            self.status = Status::Loading;
            self.update_qr();
        }
        Ok(city)
    }

    /// Applies a finished fetch. Outcomes for another city are stale and dropped.
    pub fn apply<Tz: TimeZone>(&mut self, outcome: Outcome, now: DateTime<Utc>, tz: &Tz) {
        if outcome.city != self.city.key {
            log::debug!("dropping stale forecast for {}", outcome.city);
            return;
        }

        let dataset = outcome
            .result
            .and_then(|forecast| Dataset::from_samples(self.city.key, forecast.samples(), now, tz));
        match dataset {
            Ok(dataset) => {
                log::info!("weather updated for {}", self.city.name);
                self.dataset = Some(dataset);
                self.status = Status::Ready;
                self.updated_at = Some(outcome.fetched_at);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Drops the dataset so every region shows its placeholder.
    pub fn fail(&mut self, error: WeatherError) {
        self.dataset = None;
        self.status = Status::Failed(error.to_string());
    }

    pub fn open_picker(&mut self, preselect: Option<&str>) {
        let selected = preselect
            .and_then(cities::position)
            .or_else(|| cities::position(self.city.key))
            .unwrap_or(0);
        self.picker = Some(Picker { selected });
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        if let Some(picker) = self.picker.as_mut() {
            match code {
                KeyCode::Down | KeyCode::Char('j') => picker.next(),
                KeyCode::Up | KeyCode::Char('k') => picker.previous(),
                KeyCode::Esc => self.picker = None,
                KeyCode::Enter => {
                    let key = CITIES[picker.selected].key;
                    self.picker = None;
                    let previous = self.city.key;
                    if let Ok(city) = self.switch_city(key) {
                        if city.key != previous {
                            return Action::Switch(city);
                        }
                    }
                }
                _ => {}
            }
            return Action::None;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('c') => {
                self.open_picker(None);
                Action::None
            }
            _ => Action::None,
        }
    }

    pub fn current(&self) -> Current {
        match (&self.dataset, &self.status) {
            (Some(dataset), _) => dataset.current.clone(),
            (None, Status::Loading) => Current {
                description: LOADING.to_string(),
                ..Current::placeholder()
            },
            (None, _) => Current::placeholder(),
        }
    }

    pub fn days(&self) -> Vec<Day> {
        match &self.dataset {
            Some(dataset) => dataset.day_panels(),
            None => Dataset::empty_panels(),
        }
    }

    fn status_line(&self) -> String {
        match &self.status {
            Status::Loading => format!("{LOADING} for {}...", self.city.name),
            Status::Ready => match self.updated_at {
                Some(at) => format!(
                    "Oppdatert {}",
                    locale::format_time(&at.with_timezone(&Local))
                ),
                None => String::new(),
            },
            Status::Failed(e) => format!("Feil ved lasting: {e}"),
        }
    }
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    refresher: &Refresher,
) -> io::Result<()> {
    loop {
        while let Some(outcome) = refresher.try_next() {
            app.apply(outcome, Utc::now(), &Local);
        }

        terminal.draw(|f| ui(f, app, Local::now()))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let sent = match app.handle_key(key.code) {
                Action::Quit => return Ok(()),
                Action::Refresh => refresher.refresh(),
                Action::Switch(city) => refresher.switch(city),
                Action::None => Ok(()),
            };
            if let Err(e) = sent {
                app.fail(e);
            }
        }
    }
}

fn bordered(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
}

fn value(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(Color::Green))
}

fn display_current_conditions(current: &Current) -> Table<'static> {
    let rows = vec![
        Row::new(vec![Cell::from("")]),
        Row::new(vec![
            Cell::from(" Temperatur"),
            Cell::from(value(&current.temperature)),
        ]),
        Row::new(vec![
            Cell::from(" Vær"),
            Cell::from(value(&format!("{} {}", current.glyph, current.description))),
        ]),
        Row::new(vec![
            Cell::from(" Nedbør"),
            Cell::from(value(&current.precipitation)),
        ]),
        Row::new(vec![Cell::from(" Vind"), Cell::from(value(&current.wind))]),
    ];

    Table::new(rows, [Constraint::Length(13), Constraint::Min(10)])
        .block(bordered("Nå"))
}

fn display_forecast(day: &Day) -> Paragraph<'static> {
    let label = |name: &str| Span::raw(format!(" {name:12}"));
    Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("{} {}", day.glyph, day.description),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![label("Høy / lav"), value(&format!("{} / {}", day.high, day.low))]),
        Line::from(vec![label("Nedbør"), value(&day.precipitation)]),
        Line::from(vec![label("Vind"), value(&day.wind)]),
    ])
    .block(bordered(&day.name))
}

fn display_headline(city: &City, now: DateTime<Local>) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                city.name,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" : "),
            Span::styled(city.address, Style::default().fg(Color::Blue)),
        ]),
        Line::from(format!(
            " {}  {}",
            locale::format_time(&now),
            locale::format_date(&now)
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .border_type(BorderType::Rounded),
    )
}

fn display_qr(qr: Option<&QrImage>, area: Rect) -> Paragraph<'static> {
    let block = bordered("Velg by på mobil");
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = match qr {
        Some(QrImage::Rendered { lines, .. })
            if lines.len() <= inner_height
                && lines.first().map_or(0, |l| l.chars().count()) <= inner_width =>
        {
            lines.iter().map(|l| Line::from(l.clone())).collect()
        }
        Some(QrImage::Rendered { target, .. }) => vec![
            Line::from("QR-kode får ikke plass"),
            Line::from(""),
            Line::from(value(target)),
        ],
        Some(QrImage::Remote { image_url, target }) => vec![
            Line::from("QR-kode:"),
            Line::from(value(image_url)),
            Line::from(""),
            Line::from("Bruk URL:"),
            Line::from(value(target)),
        ],
        None => vec![Line::from(format!("QR-kode ikke tilgjengelig {MISSING}"))],
    };

    Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn display_picker(f: &mut Frame, picker: &Picker) {
    let area = centered(f.area(), 44, CITIES.len() as u16 + 4);
    let items: Vec<ListItem> = CITIES
        .iter()
        .map(|city| {
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {:14}", city.name)),
                Span::styled(city.address, Style::default().fg(Color::Blue)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(bordered("Velg by (Enter bekreft, Esc avbryt)"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(picker.selected));

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
}

pub fn ui(f: &mut Frame, app: &App, now: DateTime<Local>) {
    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(display_headline(app.city, now), vert_layout[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(vert_layout[1]);

    let lchunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(chunks[0]);

    f.render_widget(display_current_conditions(&app.current()), lchunks[0]);

    let days = app.days();
    let day_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, days.len().max(1) as u32); days.len()])
        .split(lchunks[1]);
    for (day, area) in days.iter().zip(day_chunks.iter()) {
        f.render_widget(display_forecast(day), *area);
    }

    f.render_widget(display_qr(app.qr.as_ref(), chunks[1]), chunks[1]);

    let status_style = match app.status {
        Status::Failed(_) => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::DarkGray),
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {}", app.status_line()), status_style),
            Span::raw("   q avslutt  c velg by  r oppdater"),
        ])),
        vert_layout[2],
    );

    if let Some(picker) = &app.picker {
        display_picker(f, picker);
    }
}

/// Plain text rendering of the display regions.
pub fn snapshot(app: &App, now: DateTime<Local>) -> String {
    let current = app.current();
    let mut out = vec![
        format!("{} ({})", app.city.name, app.city.address),
        format!("{}  {}", locale::format_time(&now), locale::format_date(&now)),
        String::new(),
        format!(
            "Nå: {} {} {}, nedbør {}, vind {}",
            current.glyph, current.temperature, current.description, current.precipitation, current.wind
        ),
    ];
    for day in app.days() {
        out.push(format!(
            "{}: {} {} {} / {}, nedbør {}, vind {}",
            day.name, day.glyph, day.description, day.high, day.low, day.precipitation, day.wind
        ));
    }
    if let Some(qr) = &app.qr {
        out.push(String::new());
        if let QrImage::Rendered { lines, .. } = qr {
            out.extend(lines.iter().cloned());
        }
        out.push(qr.target().to_string());
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metno::Forecast;
    use crate::metno::tests::DOCUMENT;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(cities::lookup("oslo").unwrap(), QrConfig::default())
    }

    fn outcome(city: &'static str, result: Result<Forecast, WeatherError>) -> Outcome {
        Outcome {
            city,
            fetched_at: Utc::now(),
            result,
        }
    }

    fn document_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T11:05:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_apply_forecast() {
        let mut app = app();
        assert_eq!(app.current().description, LOADING);

        let forecast = Forecast::from_json(DOCUMENT).unwrap();
        app.apply(outcome("oslo", Ok(forecast)), document_now(), &Utc);
        assert_eq!(app.status, Status::Ready);
        assert_eq!(app.current().temperature, "-4°");
        assert_eq!(app.days().len(), 2);
        assert_eq!(app.days()[0].name, "Torsdag");
    }

    #[test]
    fn test_failure_shows_placeholders() {
        let mut app = app();
        let forecast = Forecast::from_json(DOCUMENT).unwrap();
        app.apply(outcome("oslo", Ok(forecast)), document_now(), &Utc);

        app.apply(
            outcome("oslo", Err(WeatherError::Decode("bad".to_string()))),
            document_now(),
            &Utc,
        );
        assert!(matches!(app.status, Status::Failed(_)));
        assert_eq!(app.current(), Current::placeholder());

        app.apply(outcome("oslo", Ok(Forecast::default())), document_now(), &Utc);
        assert_eq!(
            app.status,
            Status::Failed(WeatherError::EmptyInput.to_string())
        );
    }

    #[test]
    fn test_stopped_worker_shows_failure() {
        let mut app = app();
        let forecast = Forecast::from_json(DOCUMENT).unwrap();
        app.apply(outcome("oslo", Ok(forecast)), document_now(), &Utc);

        app.fail(WeatherError::WorkerStopped);
        assert_eq!(
            app.status,
            Status::Failed(WeatherError::WorkerStopped.to_string())
        );
        assert_eq!(app.current(), Current::placeholder());
    }

    #[test]
    fn test_stale_outcome_ignored() {
        let mut app = app();
        let forecast = Forecast::from_json(DOCUMENT).unwrap();
        app.apply(outcome("bergen", Ok(forecast)), document_now(), &Utc);
        assert_eq!(app.status, Status::Loading);
        assert!(app.dataset.is_none());
    }

    #[test]
    fn test_unknown_city_keeps_state() {
        let mut app = app();
        let forecast = Forecast::from_json(DOCUMENT).unwrap();
        app.apply(outcome("oslo", Ok(forecast)), document_now(), &Utc);
        let qr = app.qr.clone();

        assert!(app.switch_city("narvik").is_err());
        assert_eq!(app.city.key, "oslo");
        assert_eq!(app.status, Status::Ready);
        assert!(app.dataset.is_some());
        assert_eq!(app.qr, qr);
    }

    #[test]
    fn test_switch_city_updates_qr() {
        let mut app = app();
        let city = app.switch_city("trondheim").unwrap();
        assert_eq!(city.name, "Trondheim");
        assert_eq!(app.status, Status::Loading);
        assert!(app.qr.unwrap().target().ends_with("city=trondheim"));
    }

    #[test]
    fn test_picker_flow() {
        let mut app = app();
        assert_eq!(app.handle_key(KeyCode::Char('c')), Action::None);
        assert_eq!(app.picker, Some(Picker { selected: 0 }));

        app.handle_key(KeyCode::Up);
        assert_eq!(app.picker, Some(Picker { selected: CITIES.len() - 1 }));
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char('j'));
        // 'q' does not quit while the picker is open
        assert_eq!(app.handle_key(KeyCode::Char('q')), Action::None);

        let bergen = cities::lookup("bergen").unwrap();
        assert_eq!(app.handle_key(KeyCode::Enter), Action::Switch(bergen));
        assert!(app.picker.is_none());
        assert_eq!(app.city.key, "bergen");
    }

    #[test]
    fn test_picker_cancel_and_same_city() {
        let mut app = app();
        app.open_picker(Some("drammen"));
        app.handle_key(KeyCode::Esc);
        assert!(app.picker.is_none());
        assert_eq!(app.city.key, "oslo");

        app.open_picker(Some("not-a-city"));
        assert_eq!(app.picker, Some(Picker { selected: 0 }));
        assert_eq!(app.handle_key(KeyCode::Enter), Action::None);
    }

    #[test]
    fn test_main_keys() {
        let mut app = app();
        assert_eq!(app.handle_key(KeyCode::Char('r')), Action::Refresh);
        assert_eq!(app.handle_key(KeyCode::Char('x')), Action::None);
        assert_eq!(app.handle_key(KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn test_ui_renders_regions() {
        let mut app = app();
        let forecast = Forecast::from_json(DOCUMENT).unwrap();
        app.apply(outcome("oslo", Ok(forecast)), document_now(), &Utc);

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let now = Local::now();
        terminal.draw(|f| ui(f, &app, now)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Oslo"));
        assert!(text.contains("Grev Wedels plass 9"));
        assert!(text.contains("-4°"));
        assert!(text.contains("Torsdag"));
        assert!(text.contains("-12°"));
    }

    #[test]
    fn test_snapshot() {
        let mut app = App::new(
            cities::lookup("oslo").unwrap(),
            QrConfig {
                render_locally: false,
                ..QrConfig::default()
            },
        );
        app.apply(
            outcome("oslo", Err(WeatherError::EmptyInput)),
            document_now(),
            &Utc,
        );
        let text = snapshot(&app, Local::now());
        assert!(text.starts_with("Oslo (Grev Wedels plass 9)"));
        assert!(text.contains("--° Feil ved lasting, nedbør --mm, vind -- m/s"));
        assert!(text.ends_with("?mobile=true&city=oslo"));
    }
}
