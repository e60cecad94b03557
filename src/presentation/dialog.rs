//! Terminal dialog shell: profile selector, enabled checkbox, path field,
//! file browser and OK / Cancel buttons.

use crate::application::session::{EditorSession, Outcome};
use crate::infrastructure::file_browser::{EntryKind, FileBrowser};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs};
use ratatui::{DefaultTerminal, Frame};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Profile,
    Enabled,
    Path,
    Browse,
    Ok,
    Cancel,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Profile,
        Focus::Enabled,
        Focus::Path,
        Focus::Browse,
        Focus::Ok,
        Focus::Cancel,
    ];

    fn step(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let at = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward { (at + 1) % len } else { (at + len - 1) % len };
        Self::ORDER[next]
    }
}

struct BrowserPopup {
    browser: FileBrowser,
    state: ListState,
}

/// Runs the dialog until the user confirms or cancels
pub fn run(session: EditorSession<'_>) -> Result<Outcome> {
    let mut terminal = ratatui::try_init()?;
    let result = DialogApp::new(session).run(&mut terminal);
    ratatui::restore();
    result
}

pub struct DialogApp<'a> {
    session: EditorSession<'a>,
    focus: Focus,
    popup: Option<BrowserPopup>,
    status: Option<String>,
}

impl<'a> DialogApp<'a> {
    pub fn new(session: EditorSession<'a>) -> Self {
        Self {
            session,
            focus: Focus::Profile,
            popup: None,
            status: None,
        }
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<Outcome> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(outcome) = self.handle_key(key)? {
                    return Ok(outcome);
                }
            }
        }
    }

    /// Applies one key press; returns the outcome once the dialog is done
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Option<Outcome>> {
        if self.popup.is_some() {
            self.handle_browser_key(key);
            return Ok(None);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Ok(Some(self.session.cancel()?)),
            KeyCode::Char('s') if ctrl => return Ok(Some(self.session.confirm()?)),
            KeyCode::Tab => self.focus = self.focus.step(true),
            KeyCode::BackTab => self.focus = self.focus.step(false),
            _ => return self.handle_focused_key(key),
        }
        Ok(None)
    }

    fn handle_focused_key(&mut self, key: KeyEvent) -> Result<Option<Outcome>> {
        let plain = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();
        match (self.focus, key.code) {
            (Focus::Profile, KeyCode::Left | KeyCode::Up) => {
                let index = self.session.selected_index();
                self.session.select(index.saturating_sub(1));
            }
            (Focus::Profile, KeyCode::Right | KeyCode::Down) => {
                let index = self.session.selected_index();
                self.session.select(index + 1);
            }
            (Focus::Enabled, KeyCode::Char(' ') | KeyCode::Enter) => self.session.toggle_enabled(),
            (Focus::Path, KeyCode::Char(c)) if plain => {
                let mut path = self.session.form().path.clone();
                path.push(c);
                self.session.set_path(path);
            }
            (Focus::Path, KeyCode::Backspace) => {
                let mut path = self.session.form().path.clone();
                path.pop();
                self.session.set_path(path);
            }
            (Focus::Browse, KeyCode::Enter) => self.open_browser(),
            (Focus::Ok, KeyCode::Enter) => return Ok(Some(self.session.confirm()?)),
            (Focus::Cancel, KeyCode::Enter) => return Ok(Some(self.session.cancel()?)),
            (_, KeyCode::Enter) => self.focus = self.focus.step(true),
            _ => {}
        }
        Ok(None)
    }

    fn open_browser(&mut self) {
        match FileBrowser::open(self.session.browse_start_dir()) {
            Ok(browser) => {
                let mut state = ListState::default();
                state.select(Some(0));
                self.popup = Some(BrowserPopup { browser, state });
                self.status = None;
            }
            Err(e) => {
                warn!("cannot browse: {:#}", e);
                self.status = Some(format!("{:#}", e));
            }
        }
    }

    fn handle_browser_key(&mut self, key: KeyEvent) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        let count = popup.browser.entries().len();
        let selected = popup.state.selected().unwrap_or(0);

        let result = match key.code {
            KeyCode::Esc => {
                self.popup = None;
                return;
            }
            KeyCode::Up => {
                popup.state.select(Some(selected.saturating_sub(1)));
                Ok(None)
            }
            KeyCode::Down => {
                popup.state.select(Some((selected + 1).min(count.saturating_sub(1))));
                Ok(None)
            }
            KeyCode::Tab => popup.browser.toggle_filter().map(|_| None),
            KeyCode::Enter => popup.browser.activate(selected),
            _ => Ok(None),
        };

        match result {
            Ok(Some(chosen)) => {
                self.session.set_path(chosen.to_string_lossy());
                self.popup = None;
            }
            Ok(None) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Tab) {
                    popup.state.select(Some(0));
                }
            }
            Err(e) => {
                warn!("browse failed: {:#}", e);
                self.status = Some(format!("{:#}", e));
            }
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(frame.area());

        self.draw_profiles(frame, rows[0]);

        let form = self.session.form();
        let checkbox = if form.enabled { "[x]" } else { "[ ]" };
        frame.render_widget(
            Paragraph::new(format!("{} Use custom F# Interactive", checkbox))
                .block(self.block("Enabled", Focus::Enabled)),
            rows[1],
        );
        frame.render_widget(
            Paragraph::new(form.path.as_str()).block(self.block("Executable path", Focus::Path)),
            rows[2],
        );

        let buttons = Line::from(vec![
            self.button("Browse...", Focus::Browse),
            Span::raw("  "),
            self.button("OK", Focus::Ok),
            Span::raw("  "),
            self.button("Cancel", Focus::Cancel),
        ]);
        frame.render_widget(Paragraph::new(buttons), rows[3]);

        let help = self
            .status
            .clone()
            .unwrap_or_else(|| "Tab: next field  Enter: activate  Ctrl+S: OK  Esc: cancel".to_string());
        frame.render_widget(
            Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
            rows[4],
        );

        if self.popup.is_some() {
            self.draw_browser(frame);
        }
    }

    fn draw_profiles(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<String> = self
            .session
            .profiles()
            .iter()
            .map(|profile| profile.display_name.clone())
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.session.selected_index())
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .block(self.block("Profile", Focus::Profile));
        frame.render_widget(tabs, area);
    }

    fn draw_browser(&mut self, frame: &mut Frame) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        let area = centered(frame.area(), 80, 70);
        let items: Vec<ListItem> = popup
            .browser
            .entries()
            .iter()
            .map(|entry| match entry.kind {
                EntryKind::File => ListItem::new(entry.name.clone()),
                EntryKind::Parent | EntryKind::Directory => {
                    ListItem::new(format!("{}/", entry.name)).style(Style::default().fg(Color::Blue))
                }
            })
            .collect();
        let title = format!(
            "{} [{}] (Tab: filter, Esc: close)",
            popup.browser.dir().display(),
            popup.browser.filter().label()
        );
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        frame.render_widget(Clear, area);
        frame.render_stateful_widget(list, area, &mut popup.state);
    }

    fn block(&self, title: &'static str, focus: Focus) -> Block<'static> {
        let style = if self.focus == focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Block::default().borders(Borders::ALL).title(title).border_style(style)
    }

    fn button(&self, label: &'static str, focus: Focus) -> Span<'static> {
        let text = format!("[ {} ]", label);
        if self.focus == focus {
            Span::styled(text, Style::default().add_modifier(Modifier::REVERSED))
        } else {
            Span::raw(text)
        }
    }
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let scale = |length: u16, percent: u16| (u32::from(length) * u32::from(percent) / 100) as u16;
    let width = scale(area.width, percent_x);
    let height = scale(area.height, percent_y);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::builders::resolver_builder::ResolverBuilder;
    use crate::application::services::SettingsResolver;
    use crate::domain::entities::ProfileDescriptor;
    use crate::domain::value_objects::ProfileId;
    use crate::infrastructure::memory_store::MemoryStore;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::rc::Rc;

    fn resolver() -> SettingsResolver {
        ResolverBuilder::new()
            .store(Rc::new(MemoryStore::new()))
            .probe(Box::new(|_: &ProfileDescriptor| true))
            .build()
            .unwrap()
    }

    fn press(app: &mut DialogApp<'_>, code: KeyCode) -> Option<Outcome> {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(app: &mut DialogApp<'_>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn editing_and_pressing_ok_commits_the_selected_profile() {
        let resolver = resolver();
        let mut app = DialogApp::new(EditorSession::multi(&resolver).unwrap());

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "/opt/fsi.exe");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);

        assert_eq!(press(&mut app, KeyCode::Enter), Some(Outcome::Committed));

        let vs2013 = resolver.resolve(&ProfileId::from("VS2013")).unwrap();
        assert!(vs2013.enabled);
        assert_eq!(vs2013.custom_executable_path, "/opt/fsi.ex");
    }

    #[test]
    fn escape_cancels_without_persisting() {
        let resolver = resolver();
        let mut app = DialogApp::new(EditorSession::multi(&resolver).unwrap());

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(press(&mut app, KeyCode::Esc), Some(Outcome::Cancelled));

        assert!(!resolver.resolve(&ProfileId::from("VS2012")).unwrap().enabled);
    }

    #[test]
    fn ctrl_s_confirms_from_any_field() {
        let resolver = resolver();
        let mut app = DialogApp::new(EditorSession::multi(&resolver).unwrap());

        let outcome = app
            .handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(outcome, Some(Outcome::Committed));
    }

    #[test]
    fn draw_shows_profiles_and_form() {
        let resolver = resolver();
        resolver
            .commit(&ProfileId::from("VS2012"), true, "/opt/fsi.exe")
            .unwrap();
        let mut app = DialogApp::new(EditorSession::multi(&resolver).unwrap());
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();

        terminal.draw(|frame| app.draw(frame)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Visual Studio 2012"));
        assert!(screen.contains("Visual Studio 2013"));
        assert!(screen.contains("[x] Use custom F# Interactive"));
        assert!(screen.contains("/opt/fsi.exe"));
    }

    #[test]
    fn modified_letters_are_not_typed_into_the_path() {
        let resolver = resolver();
        let mut app = DialogApp::new(EditorSession::multi(&resolver).unwrap());
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);

        app.handle_key(KeyEvent::new(KeyCode::Char('F'), KeyModifiers::SHIFT)).unwrap();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)).unwrap();
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT)).unwrap();

        assert_eq!(app.session.form().path, "F");
    }

    #[test]
    fn popup_fits_very_wide_terminals() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 2000,
            height: 600,
        };
        let popup = centered(area, 80, 70);

        assert_eq!((popup.x, popup.y), (200, 90));
        assert_eq!((popup.width, popup.height), (1600, 420));
    }
}
