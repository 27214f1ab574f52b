//! Login / sign-up screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::{Notice, button_span, centered, field_line};
use crate::auth::{self, CredentialStore, RememberedUser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Password,
    ShowPassword,
    Remember,
    Login,
    SignUp,
}

impl Field {
    const ORDER: [Field; 6] = [
        Field::Username,
        Field::Password,
        Field::ShowPassword,
        Field::Remember,
        Field::Login,
        Field::SignUp,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|&f| f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn is_text(self) -> bool {
        matches!(self, Field::Username | Field::Password)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoginAction {
    None,
    Quit,
    Authenticated(String),
}

pub(crate) struct LoginScreen {
    username: String,
    password: String,
    show_password: bool,
    remember: bool,
    focus: Field,
    notice: Option<Notice>,
}

impl LoginScreen {
    /// A remembered username pre-fills the form and keeps "remember me" on.
    pub fn new(remembered: Option<String>) -> Self {
        let remember = remembered.is_some();
        let focus = if remember { Field::Password } else { Field::Username };
        Self {
            username: remembered.unwrap_or_default(),
            password: String::new(),
            show_password: false,
            remember,
            focus,
            notice: None,
        }
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        store: &dyn CredentialStore,
        remembered: &RememberedUser,
    ) -> LoginAction {
        match key.code {
            KeyCode::Esc => return LoginAction::Quit,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Enter => match self.focus {
                Field::Username | Field::Password | Field::Login => return self.submit_login(store, remembered),
                Field::SignUp => self.submit_signup(store),
                Field::ShowPassword => self.show_password = !self.show_password,
                Field::Remember => self.remember = !self.remember,
            },
            KeyCode::Backspace => {
                if let Some(text) = self.focused_text() {
                    text.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.focus.is_text() {
                    if let Some(text) = self.focused_text() {
                        text.push(c);
                    }
                } else if c == ' ' {
                    match self.focus {
                        Field::ShowPassword => self.show_password = !self.show_password,
                        Field::Remember => self.remember = !self.remember,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        LoginAction::None
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Username => Some(&mut self.username),
            Field::Password => Some(&mut self.password),
            _ => None,
        }
    }

    fn submit_login(&mut self, store: &dyn CredentialStore, remembered: &RememberedUser) -> LoginAction {
        match auth::log_in(store, &self.username, &self.password) {
            Ok(username) => {
                if let Err(err) = remembered.store(&username, self.remember) {
                    tracing::warn!(error = %err, "could not update remembered user");
                }
                LoginAction::Authenticated(username)
            }
            Err(err) => {
                self.notice = Some(Notice::from_error(&err));
                LoginAction::None
            }
        }
    }

    fn submit_signup(&mut self, store: &dyn CredentialStore) {
        self.notice = Some(match auth::sign_up(store, &self.username, &self.password) {
            Ok(_) => Notice::info("Account created successfully! You can now log in."),
            Err(err) => Notice::from_error(&err),
        });
    }

    fn masked_password(&self) -> String {
        if self.show_password {
            self.password.clone()
        } else {
            "*".repeat(self.password.chars().count())
        }
    }

    pub fn draw(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rect = centered(area, 56, 14);
        frame.render_widget(Clear, rect);

        let check = |on: bool| if on { "[x]" } else { "[ ]" };
        let focused = |f: Field| self.focus == f;

        let mut lines = vec![
            Line::from(Span::styled(
                "Welcome",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Line::raw(""),
            field_line("Username:", self.username.clone(), focused(Field::Username)),
            field_line("Password:", self.masked_password(), focused(Field::Password)),
            Line::raw(""),
            Line::from(button_span(
                format!("{} Show Password", check(self.show_password)),
                focused(Field::ShowPassword),
            )),
            Line::from(button_span(
                format!("{} Remember Me", check(self.remember)),
                focused(Field::Remember),
            )),
            Line::raw(""),
            Line::from(vec![
                button_span("[ Login ]".to_string(), focused(Field::Login)),
                Span::raw("   "),
                button_span("[ Sign Up ]".to_string(), focused(Field::SignUp)),
            ])
            .alignment(Alignment::Center),
            Line::raw(""),
        ];
        if let Some(notice) = &self.notice {
            lines.push(Line::from(notice.span()));
        }

        let block = Block::default()
            .title(" Login - COVID Data Visualizer ")
            .borders(Borders::ALL);
        let p = Paragraph::new(Text::from(lines)).block(block);
        frame.render_widget(p, rect);

        let help = Paragraph::new("Tab/↑↓ move  Enter activate  Space toggle  Esc quit")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        let help_rect = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: 1.min(area.height),
        };
        frame.render_widget(help, help_rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::FlatFileStore;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut LoginScreen, text: &str, store: &FlatFileStore, remembered: &RememberedUser) {
        for c in text.chars() {
            screen.handle_key(press(KeyCode::Char(c)), store, remembered);
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        store: FlatFileStore,
        remembered: RememberedUser,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = FlatFileStore::new(dir.path().join("users.txt"));
        let remembered = RememberedUser::new(dir.path().join("remember_me.txt"));
        Fixture {
            _dir: dir,
            store,
            remembered,
        }
    }

    #[test]
    fn sign_up_then_log_in_with_remember() {
        let fx = fixture();
        let mut screen = LoginScreen::new(None);

        type_text(&mut screen, "alice", &fx.store, &fx.remembered);
        screen.handle_key(press(KeyCode::Tab), &fx.store, &fx.remembered);
        type_text(&mut screen, "secret", &fx.store, &fx.remembered);

        // Focus Sign Up (Password -> Show -> Remember -> Login -> SignUp).
        for _ in 0..4 {
            screen.handle_key(press(KeyCode::Tab), &fx.store, &fx.remembered);
        }
        assert_eq!(screen.handle_key(press(KeyCode::Enter), &fx.store, &fx.remembered), LoginAction::None);
        assert_eq!(
            screen.notice.as_ref().map(|n| n.text.as_str()),
            Some("Account created successfully! You can now log in.")
        );

        // Back to Remember, toggle it with space, then log in.
        screen.handle_key(press(KeyCode::BackTab), &fx.store, &fx.remembered);
        screen.handle_key(press(KeyCode::BackTab), &fx.store, &fx.remembered);
        screen.handle_key(press(KeyCode::Char(' ')), &fx.store, &fx.remembered);
        screen.handle_key(press(KeyCode::Tab), &fx.store, &fx.remembered);
        let action = screen.handle_key(press(KeyCode::Enter), &fx.store, &fx.remembered);
        assert_eq!(action, LoginAction::Authenticated("alice".to_string()));
        assert_eq!(fx.remembered.load().as_deref(), Some("alice"));
    }

    #[test]
    fn wrong_password_shows_error_and_stays() {
        let fx = fixture();
        fx.store.save("bob", "pw").unwrap();
        let mut screen = LoginScreen::new(Some("bob".to_string()));
        assert!(screen.remember);
        type_text(&mut screen, "nope", &fx.store, &fx.remembered);
        let action = screen.handle_key(press(KeyCode::Enter), &fx.store, &fx.remembered);
        assert_eq!(action, LoginAction::None);
        let notice = screen.notice.clone().unwrap();
        assert!(notice.is_error);
        assert_eq!(notice.text, "Error: Invalid username or password.");
    }

    #[test]
    fn password_is_masked_until_shown() {
        let mut screen = LoginScreen::new(None);
        screen.password = "abc".to_string();
        assert_eq!(screen.masked_password(), "***");
        screen.show_password = true;
        assert_eq!(screen.masked_password(), "abc");
    }

    #[test]
    fn login_without_remember_clears_remembered_file() {
        let fx = fixture();
        fx.store.save("bob", "pw").unwrap();
        fx.remembered.store("bob", true).unwrap();

        let mut screen = LoginScreen::new(fx.remembered.load());
        screen.remember = false;
        type_text(&mut screen, "pw", &fx.store, &fx.remembered);
        let action = screen.handle_key(press(KeyCode::Enter), &fx.store, &fx.remembered);
        assert_eq!(action, LoginAction::Authenticated("bob".to_string()));
        assert_eq!(fx.remembered.load(), None);
    }

    #[test]
    fn escape_quits() {
        let fx = fixture();
        let mut screen = LoginScreen::new(None);
        assert_eq!(screen.handle_key(press(KeyCode::Esc), &fx.store, &fx.remembered), LoginAction::Quit);
    }
}
