//! Ratatui-based terminal UI.
//!
//! Two screens: a login/sign-up form, then the dashboard where the user picks
//! a country and date range and draws trend, bar, or composition charts.
//! Errors from the pipeline never end the loop; they become a notice line.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::auth::{FlatFileStore, RememberedUser};
use crate::config::AppConfig;
use crate::domain::Dataset;
use crate::error::{AppError, ErrorKind};
use crate::io::ingest::LoadOutcome;

mod dashboard;
mod login;
mod plotters_chart;

use dashboard::{DashAction, Dashboard};
use login::{LoginAction, LoginScreen};

/// Start the TUI with an already loaded dataset.
pub fn run(config: &AppConfig, outcome: LoadOutcome) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, outcome);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// One-line message shown at the bottom of either screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn from_error(err: &AppError) -> Self {
        let is_error = !matches!(err.kind(), ErrorKind::EmptySelection | ErrorKind::Precondition);
        Self {
            text: format!("{}: {}", err.kind().title(), err.message()),
            is_error,
        }
    }

    pub fn span(&self) -> Span<'_> {
        let color = if self.is_error { Color::Red } else { Color::Yellow };
        Span::styled(self.text.as_str(), Style::default().fg(color))
    }
}

enum Screen {
    Login(LoginScreen),
    Dashboard(Box<Dashboard>),
}

struct App {
    dataset: Dataset,
    entities: Vec<String>,
    store: FlatFileStore,
    remembered: RememberedUser,
    screen: Screen,
}

impl App {
    fn new(config: &AppConfig, outcome: LoadOutcome) -> Self {
        let remembered = RememberedUser::new(&config.remember_file);
        let mut login = LoginScreen::new(remembered.load());

        let entities = outcome.dataset.entities();
        login.set_notice(match &outcome.notice {
            Some(err) => Notice::from_error(err),
            None => Notice::info(crate::report::format_load_report(&outcome.report, entities.len())),
        });

        Self {
            dataset: outcome.dataset,
            entities,
            store: FlatFileStore::new(&config.users_file),
            remembered,
            screen: Screen::Login(login),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if is_ctrl_c(&key) {
            return true;
        }

        match &mut self.screen {
            Screen::Login(login) => match login.handle_key(key, &self.store, &self.remembered) {
                LoginAction::None => false,
                LoginAction::Quit => true,
                LoginAction::Authenticated(username) => {
                    let mut dashboard = Dashboard::new(username.clone(), self.entities.clone());
                    dashboard.set_notice(Notice::info(format!("Welcome back, {username}!")));
                    self.screen = Screen::Dashboard(Box::new(dashboard));
                    false
                }
            },
            Screen::Dashboard(dashboard) => match dashboard.handle_key(key, &self.dataset) {
                DashAction::None => false,
                DashAction::Quit => true,
            },
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let area = frame.area();
        match &self.screen {
            Screen::Login(login) => login.draw(frame, area),
            Screen::Dashboard(dashboard) => dashboard.draw(frame, area),
        }
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c'))
}

/// Text input cell: `label [value]`, highlighted when focused.
pub(crate) fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default().fg(Color::Black).bg(Color::White)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
        Span::raw(" ["),
        Span::styled(format!("{value}{cursor}"), value_style),
        Span::raw("]"),
    ])
}

/// Push-button or checkbox cell, reversed when focused.
pub(crate) fn button_span(text: String, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Span::styled(text, style)
}

/// A rectangle of at most `width` x `height` centered in `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
