use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};
use tracing::debug;

use crate::render::Canvas;

/// One decoded key press, as far as the game cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    None,
    Left,
    Right,
    Up,
    Down,
    Escape,
    Enter,
    Interrupt,
}

impl Input {
    pub fn from_key_event(ev: &KeyEvent) -> Self {
        if ev.kind == KeyEventKind::Release {
            return Input::None;
        }

        match ev.code {
            KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => Input::Interrupt,
            KeyCode::Left => Input::Left,
            KeyCode::Right => Input::Right,
            KeyCode::Up => Input::Up,
            KeyCode::Down => Input::Down,
            KeyCode::Esc => Input::Escape,
            KeyCode::Enter => Input::Enter,
            _ => Input::None,
        }
    }
}

/// Owns the real terminal: raw mode, the alternate screen, cursor-addressed
/// writes, key polling and the last known window size. Dropping it puts the
/// terminal back the way it was found.
pub struct TermManager {
    cols: u16,
    rows: u16,
    stdout: Stdout,
    started: Instant,
    active: bool,
}

impl TermManager {
    pub fn new() -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(TermManager { cols, rows, stdout: stdout(), started: Instant::now(), active: false })
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        self.active = true;
        self.show_cursor(false)
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, LeaveAlternateScreen)
    }

    /// Last reported terminal size, refreshed whenever a resize event comes in.
    pub fn get_terminal_size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Milliseconds since this manager was created.
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Waits up to `timeout_ms` for one event and decodes it.
    pub fn poll_input(&mut self, timeout_ms: u64) -> io::Result<Input> {
        if !poll(Duration::from_millis(timeout_ms))? {
            return Ok(Input::None);
        }

        match read()? {
            Event::Key(ev) => Ok(Input::from_key_event(&ev)),
            Event::Resize(cols, rows) => {
                debug!(cols, rows, "terminal resized");
                self.cols = cols;
                self.rows = rows;
                Ok(Input::None)
            }
            _ => Ok(Input::None),
        }
    }
}

impl Canvas for TermManager {
    fn draw(&mut self, col: i32, row: i32, text: &str) -> io::Result<()> {
        if let Some((col, row, text)) = clip(col, row, text, self.cols, self.rows) {
            queue!(self.stdout, cursor::MoveTo(col, row), style::Print(text))?;
        }
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))
    }

    fn show_cursor(&mut self, show: bool) -> io::Result<()> {
        if show {
            execute!(self.stdout, cursor::Show)
        } else {
            execute!(self.stdout, cursor::Hide)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Drops text that starts off screen and cuts what runs past the right edge.
fn clip(col: i32, row: i32, text: &str, cols: u16, rows: u16) -> Option<(u16, u16, &str)> {
    if col < 0 || row < 0 || row >= rows as i32 {
        return None;
    }

    let room = (cols as i32 - col).max(0) as usize;
    let end = text.char_indices().nth(room).map_or(text.len(), |(i, _)| i);
    if end == 0 {
        return None;
    }

    Some((col as u16, row as u16, &text[..end]))
}
