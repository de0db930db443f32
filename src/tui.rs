use crate::git::IdentityStore;
use crate::keymap;
use crate::select::{SelectList, Selectable};
use crate::session::{Flow, Purpose, Session, Step};
use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event as TermEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::time::Duration;

/// Run the session full-screen until it exits. The terminal is restored
/// whether or not the loop fails.
pub fn run<I: IdentityStore>(session: &mut Session<I>) -> Result<()> {
    with_raw_mode(enable_raw_mode, disable_raw_mode, || run_terminal(session))
}

/// Run `body` in raw mode. Raw mode is switched off again whenever it was
/// switched on, including when `body` fails before the loop starts.
fn with_raw_mode<T>(
    enable: impl FnOnce() -> io::Result<()>,
    disable: impl FnOnce() -> io::Result<()>,
    body: impl FnOnce() -> Result<T>,
) -> Result<T> {
    enable().context("Failed to enable raw mode")?;
    let result = body();
    let restored = disable().context("Failed to disable raw mode");
    match result {
        Ok(value) => restored.map(|()| value),
        Err(e) => Err(e),
    }
}

fn run_terminal<I: IdentityStore>(session: &mut Session<I>) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide).context("Failed to enter alternate screen")?;
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
            return Err(e).context("Failed to create terminal");
        }
    };

    let result = run_loop(session, &mut terminal);
    let left = execute!(terminal.backend_mut(), Show, LeaveAlternateScreen)
        .context("Failed to leave alternate screen");
    result.and(left)
}

fn run_loop<I: IdentityStore>(
    session: &mut Session<I>,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| draw(frame, session))
            .context("Failed to render")?;

        if !event::poll(Duration::from_millis(250)).context("Failed to poll input")? {
            continue;
        }
        let TermEvent::Key(key) = event::read().context("Failed to read input")? else {
            continue;
        };
        let Some(event) = keymap::event_from_key(session.step(), key) else {
            continue;
        };
        if session.handle(event) == Flow::Exit {
            return Ok(());
        }
    }
}

fn draw<I: IdentityStore>(frame: &mut Frame<'_>, session: &Session<I>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(Line::from(Span::styled(
        "GitSwitch",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    match session.step() {
        Step::Home => draw_home(frame, chunks[1], session),
        Step::Menu => draw_list(frame, chunks[1], "Select an action", session.menu()),
        Step::Collect(field) => {
            let body = Paragraph::new(vec![
                Line::from(Span::styled(field.prompt(), Style::default().fg(Color::Cyan))),
                Line::from(format!("> {}_", session.input())),
            ])
            .block(main_panel_block());
            frame.render_widget(body, chunks[1]);
        }
        Step::Select(purpose) => {
            let title = match purpose {
                Purpose::Switch => "Select an account to switch to",
                Purpose::Delete => "Select an account to delete",
            };
            draw_list(frame, chunks[1], title, session.picker());
        }
    }

    let footer = Paragraph::new(Line::from(hint(session.step())))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}

fn draw_home<I: IdentityStore>(frame: &mut Frame<'_>, area: Rect, session: &Session<I>) {
    let account = Style::default()
        .fg(Color::LightMagenta)
        .add_modifier(Modifier::BOLD);
    let active = session.active();

    let mut lines = vec![
        Line::from(vec![
            Span::raw("Current Git account: "),
            Span::styled(active.alias.clone(), account),
        ]),
        Line::from(""),
        Line::from(vec![Span::raw("Username: "), Span::styled(active.name.clone(), account)]),
        Line::from(vec![Span::raw("Email: "), Span::styled(active.email.clone(), account)]),
        Line::from(""),
        Line::from(format!("Saved accounts: {}", session.profiles().len())),
    ];

    if let Some(message) = session.message() {
        lines.push(Line::from(""));
        lines.extend(
            message
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Green)))),
        );
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(main_panel_block());
    frame.render_widget(body, area);
}

fn draw_list<T: Selectable>(frame: &mut Frame<'_>, area: Rect, title: &str, list: &SelectList<T>) {
    let items: Vec<ListItem> = list
        .visible()
        .into_iter()
        .map(|item| {
            ListItem::new(vec![
                Line::from(item.label().to_string()),
                Line::from(Span::styled(item.detail(), Style::default().fg(Color::DarkGray))),
            ])
        })
        .collect();

    let title = if list.filter().is_empty() {
        title.to_string()
    } else {
        format!("{title} (filter: {})", list.filter())
    };
    let block = main_panel_block().title(title);
    let widget = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    // the state keeps the highlighted row inside the drawn window
    let mut state = ListState::default().with_selected(Some(list.selected_index()));
    frame.render_stateful_widget(widget, area, &mut state);
}

fn hint(step: Step) -> &'static str {
    match step {
        Step::Home => "Enter menu | q quit",
        Step::Menu => "Up/Down move | Enter select | Esc back | q quit",
        Step::Collect(_) => "Type to edit | Enter next | Esc cancel | Ctrl+C quit",
        Step::Select(_) => "Type to filter | Up/Down move | Enter select | Esc cancel | Ctrl+C quit",
    }
}

fn main_panel_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .padding(Padding::new(2, 2, 1, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use anyhow::anyhow;
    use ratatui::backend::TestBackend;
    use std::cell::Cell;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn accounts(count: usize) -> SelectList<Profile> {
        SelectList::new(
            (0..count)
                .map(|i| {
                    Profile::new(
                        format!("Account{i}"),
                        format!("User{i}"),
                        format!("user{i}@x.com"),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_list_scrolls_to_highlight() {
        let mut list = accounts(10);
        for _ in 0..9 {
            list.move_down();
        }
        assert_eq!(list.selected().map(|p| p.alias.as_str()), Some("Account9"));

        // room for four two-line rows
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                draw_list(frame, area, "Select", &list);
            })
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Account9"));
        assert!(!text.contains("Account0"));
    }

    #[test]
    fn test_list_starts_at_top() {
        let list = accounts(10);
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                draw_list(frame, area, "Select", &list);
            })
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Account0"));
        assert!(!text.contains("Account9"));
    }

    #[test]
    fn test_raw_mode_restored_when_setup_fails() {
        let disabled = Cell::new(false);
        let result: Result<()> = with_raw_mode(
            || Ok(()),
            || {
                disabled.set(true);
                Ok(())
            },
            || Err(anyhow!("Failed to enter alternate screen")),
        );

        assert!(disabled.get());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to enter alternate screen"
        );
    }

    #[test]
    fn test_raw_mode_not_restored_when_never_enabled() {
        let ran = Cell::new(false);
        let disabled = Cell::new(false);
        let result: Result<()> = with_raw_mode(
            || Err(io::Error::new(io::ErrorKind::Other, "no tty")),
            || {
                disabled.set(true);
                Ok(())
            },
            || {
                ran.set(true);
                Ok(())
            },
        );

        assert!(result.is_err());
        assert!(!ran.get());
        assert!(!disabled.get());
    }

    #[test]
    fn test_restore_failure_is_reported() {
        let result = with_raw_mode(
            || Ok(()),
            || Err(io::Error::new(io::ErrorKind::Other, "stuck")),
            || Ok(7),
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to disable raw mode"
        );
    }
}
