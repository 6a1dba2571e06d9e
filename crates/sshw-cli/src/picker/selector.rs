//! Arrow-key list selection on the terminal

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveToColumn, MoveUp, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};

use super::render::{plain_label, styled_label};
use super::{ListSelector, MenuItem};

/// Rows used by the title and the key help line
const CHROME_ROWS: usize = 4;
const MIN_VISIBLE_ROWS: usize = 3;
const FALLBACK_VISIBLE_ROWS: usize = 10;

const HELP_LINE: &str = "↑/k up • ↓/j down • / filter • enter select • q/esc cancel";
const FILTER_HELP_LINE: &str = "type to filter • ↑/↓ move • enter select • esc clear filter";

/// Result of one key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nav {
    Move(usize),
    Select,
    Cancel,
    StartFilter,
    Ignore,
}

/// Map a key press to a cursor movement or decision
fn navigate(key: KeyEvent, cursor: usize, len: usize, page: usize) -> Nav {
    let last = len.saturating_sub(1);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Nav::Cancel,
        KeyCode::Char('p') if ctrl => Nav::Move(cursor.saturating_sub(1)),
        KeyCode::Char('n') if ctrl => Nav::Move((cursor + 1).min(last)),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Nav::Cancel,
        KeyCode::Enter => Nav::Select,
        KeyCode::Char('/') => Nav::StartFilter,
        KeyCode::Up | KeyCode::Char('k') => Nav::Move(cursor.saturating_sub(1)),
        KeyCode::Down | KeyCode::Char('j') => Nav::Move((cursor + 1).min(last)),
        KeyCode::Home | KeyCode::Char('g') => Nav::Move(0),
        KeyCode::End | KeyCode::Char('G') => Nav::Move(last),
        KeyCode::PageUp => Nav::Move(cursor.saturating_sub(page)),
        KeyCode::PageDown => Nav::Move((cursor + page).min(last)),
        _ => Nav::Ignore,
    }
}

/// Index range of the rows to draw so that `cursor` stays visible
fn viewport(cursor: usize, len: usize, height: usize) -> (usize, usize) {
    if len == 0 {
        return (0, 0);
    }
    let height = height.max(1).min(len);
    let start = if cursor < height {
        0
    } else {
        cursor + 1 - height
    };
    (start, start + height)
}

/// Outcome of one key press on a [`MenuView`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    /// Index into the full item list
    Select(usize),
    Cancel,
}

/// Cursor and optional `/` filter over a list of rows
#[derive(Debug)]
struct MenuView {
    labels: Vec<String>,
    /// Position within [`MenuView::visible`]
    cursor: usize,
    filter: Option<String>,
}

impl MenuView {
    fn new(items: &[MenuItem]) -> Self {
        Self {
            labels: items.iter().map(plain_label).collect(),
            cursor: 0,
            filter: None,
        }
    }

    /// Indices of the rows matching the filter, in menu order
    fn visible(&self) -> Vec<usize> {
        match self.filter.as_deref() {
            None | Some("") => (0..self.labels.len()).collect(),
            Some(filter) => {
                let needle = filter.to_lowercase();
                self.labels
                    .iter()
                    .enumerate()
                    .filter(|(_, label)| label.to_lowercase().contains(&needle))
                    .map(|(index, _)| index)
                    .collect()
            }
        }
    }

    fn handle(&mut self, key: KeyEvent, page: usize) -> Step {
        let visible = self.visible();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if let Some(filter) = self.filter.as_mut() {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('d') if ctrl => return Step::Cancel,
                KeyCode::Esc => {
                    self.filter = None;
                    self.cursor = 0;
                    return Step::Continue;
                }
                KeyCode::Backspace => {
                    filter.pop();
                    self.cursor = 0;
                    return Step::Continue;
                }
                KeyCode::Char(c) if !ctrl => {
                    filter.push(c);
                    self.cursor = 0;
                    return Step::Continue;
                }
                _ => {}
            }
        }

        match navigate(key, self.cursor, visible.len(), page) {
            Nav::Move(next) => self.cursor = next,
            Nav::Select => {
                if let Some(&index) = visible.get(self.cursor) {
                    return Step::Select(index);
                }
            }
            Nav::Cancel => return Step::Cancel,
            Nav::StartFilter => {
                self.filter = Some(String::new());
                self.cursor = 0;
            }
            Nav::Ignore => {}
        }
        Step::Continue
    }
}

/// Interactive selector drawn inline below the cursor
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSelector;

impl TerminalSelector {
    fn visible_rows(&self) -> usize {
        terminal::size()
            .map(|(_, rows)| (rows as usize).saturating_sub(CHROME_ROWS).max(MIN_VISIBLE_ROWS))
            .unwrap_or(FALLBACK_VISIBLE_ROWS)
    }

    /// Redraw the menu over the previous frame, returning the number of lines drawn
    fn draw(
        &self,
        out: &mut impl Write,
        title: &str,
        items: &[MenuItem],
        view: &MenuView,
        previous: u16,
    ) -> io::Result<u16> {
        if previous > 0 {
            queue!(out, MoveUp(previous))?;
        }
        queue!(out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
        queue!(out, PrintStyledContent(title.bold()), Print("\r\n"))?;
        let mut lines = 1;

        if let Some(filter) = &view.filter {
            queue!(out, PrintStyledContent("/ ".cyan()), Print(filter), Print("\r\n"))?;
            lines += 1;
        }

        let visible = view.visible();
        if visible.is_empty() {
            queue!(out, PrintStyledContent("  no matches".dark_grey()), Print("\r\n"))?;
            lines += 1;
        }

        let (start, end) = viewport(view.cursor, visible.len(), self.visible_rows());
        for (position, &index) in visible.iter().enumerate().take(end).skip(start) {
            if position == view.cursor {
                queue!(out, PrintStyledContent("> ".cyan()))?;
            } else {
                queue!(out, Print("  "))?;
            }
            for part in styled_label(&items[index]) {
                queue!(out, PrintStyledContent(part))?;
            }
            queue!(out, Print("\r\n"))?;
            lines += 1;
        }

        let help = if view.filter.is_some() {
            FILTER_HELP_LINE
        } else {
            HELP_LINE
        };
        queue!(out, PrintStyledContent(help.dark_grey()), Print("\r\n"))?;
        out.flush()?;

        Ok(lines + 1)
    }

    /// Replace the menu with a one-line summary of the outcome
    fn finish(&self, out: &mut impl Write, title: &str, drawn: u16, choice: Option<&MenuItem>) -> io::Result<()> {
        if drawn > 0 {
            queue!(out, MoveUp(drawn))?;
        }
        queue!(out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
        if let Some(item) = choice {
            queue!(
                out,
                PrintStyledContent(title.bold()),
                Print(": "),
                Print(plain_label(item)),
                Print("\r\n")
            )?;
        }
        out.flush()
    }

    fn run(&self, out: &mut impl Write, title: &str, items: &[MenuItem]) -> io::Result<Option<usize>> {
        let mut view = MenuView::new(items);
        let mut drawn = 0;

        loop {
            drawn = self.draw(out, title, items, &view, drawn)?;

            let key = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => key,
                _ => continue,
            };
            match view.handle(key, self.visible_rows()) {
                Step::Continue => {}
                Step::Select(index) => {
                    self.finish(out, title, drawn, items.get(index))?;
                    return Ok(Some(index));
                }
                Step::Cancel => {
                    self.finish(out, title, drawn, None)?;
                    return Ok(None);
                }
            }
        }
    }
}

impl ListSelector for TerminalSelector {
    fn select(&mut self, title: &str, items: &[MenuItem]) -> io::Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, Hide)?;

        let result = self.run(&mut stdout, title, items);

        let restored = execute!(stdout, Show).and_then(|_| terminal::disable_raw_mode());
        let choice = result?;
        restored?;
        Ok(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_arrow_and_vi_keys_move_within_bounds() {
        assert_eq!(navigate(key(KeyCode::Down), 0, 3, 10), Nav::Move(1));
        assert_eq!(navigate(key(KeyCode::Char('j')), 2, 3, 10), Nav::Move(2));
        assert_eq!(navigate(key(KeyCode::Up), 0, 3, 10), Nav::Move(0));
        assert_eq!(navigate(key(KeyCode::Char('k')), 2, 3, 10), Nav::Move(1));
        assert_eq!(navigate(key(KeyCode::End), 0, 3, 10), Nav::Move(2));
        assert_eq!(navigate(key(KeyCode::PageDown), 0, 30, 10), Nav::Move(10));
    }

    #[test]
    fn test_cancel_keys() {
        for k in [key(KeyCode::Esc), key(KeyCode::Char('q')), key(KeyCode::Char('Q')), ctrl('c'), ctrl('d')] {
            assert_eq!(navigate(k, 0, 3, 10), Nav::Cancel);
        }
    }

    #[test]
    fn test_enter_selects() {
        assert_eq!(navigate(key(KeyCode::Enter), 1, 3, 10), Nav::Select);
        assert_eq!(navigate(key(KeyCode::Char('x')), 1, 3, 10), Nav::Ignore);
    }

    fn menu() -> Vec<MenuItem> {
        ["web1", "web2", "db1"]
            .into_iter()
            .map(|name| MenuItem::Target {
                name: name.into(),
                alias: None,
                user: None,
                host: "10.0.0.5".into(),
            })
            .collect()
    }

    fn type_text(view: &mut MenuView, text: &str) {
        for c in text.chars() {
            assert_eq!(view.handle(key(KeyCode::Char(c)), 10), Step::Continue);
        }
    }

    #[test]
    fn test_filter_selects_original_index() {
        let mut view = MenuView::new(&menu());

        assert_eq!(view.handle(key(KeyCode::Char('/')), 10), Step::Continue);
        type_text(&mut view, "DB");

        assert_eq!(view.visible(), vec![2]);
        assert_eq!(view.handle(key(KeyCode::Enter), 10), Step::Select(2));
    }

    #[test]
    fn test_filter_treats_q_and_j_as_text() {
        let mut view = MenuView::new(&menu());
        view.handle(key(KeyCode::Char('/')), 10);

        type_text(&mut view, "qj");
        assert_eq!(view.filter.as_deref(), Some("qj"));
        assert!(view.visible().is_empty());
        assert_eq!(view.handle(key(KeyCode::Enter), 10), Step::Continue);
    }

    #[test]
    fn test_filter_moves_within_matches() {
        let mut view = MenuView::new(&menu());
        view.handle(key(KeyCode::Char('/')), 10);
        type_text(&mut view, "web");

        view.handle(key(KeyCode::Down), 10);
        view.handle(key(KeyCode::Down), 10);
        assert_eq!(view.handle(key(KeyCode::Enter), 10), Step::Select(1));
    }

    #[test]
    fn test_escape_clears_filter_then_cancels() {
        let mut view = MenuView::new(&menu());
        view.handle(key(KeyCode::Char('/')), 10);
        type_text(&mut view, "db");
        view.handle(key(KeyCode::Backspace), 10);
        assert_eq!(view.filter.as_deref(), Some("d"));

        assert_eq!(view.handle(key(KeyCode::Esc), 10), Step::Continue);
        assert_eq!(view.filter, None);
        assert_eq!(view.visible(), vec![0, 1, 2]);

        assert_eq!(view.handle(key(KeyCode::Esc), 10), Step::Cancel);
    }

    #[test]
    fn test_ctrl_c_cancels_while_filtering() {
        let mut view = MenuView::new(&menu());
        view.handle(key(KeyCode::Char('/')), 10);
        assert_eq!(view.handle(ctrl('c'), 10), Step::Cancel);
    }

    #[test]
    fn test_viewport_follows_cursor() {
        assert_eq!(viewport(0, 20, 5), (0, 5));
        assert_eq!(viewport(4, 20, 5), (0, 5));
        assert_eq!(viewport(5, 20, 5), (1, 6));
        assert_eq!(viewport(19, 20, 5), (15, 20));
        assert_eq!(viewport(1, 3, 10), (0, 3));
        assert_eq!(viewport(0, 0, 10), (0, 0));
    }
}
