use std::io;

use crate::error::GameError;
use crate::grid::{Tile, MAX_FIELD_H, MAX_FIELD_W};

/// Anything the game can draw on. Positions are absolute screen columns and
/// rows; implementations drop or clip whatever falls off the screen.
pub trait Canvas {
    fn draw(&mut self, col: i32, row: i32, text: &str) -> io::Result<()>;
    fn clear(&mut self) -> io::Result<()>;
    fn show_cursor(&mut self, show: bool) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

const MIN_COLS: u16 = 8;
const MIN_ROWS: u16 = 5;

/// Where the playfield sits on the screen. Each cell is two columns wide and
/// one row tall; row `screen_y` holds the score, `screen_y + 1` the top border.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    field_w: usize,
    field_h: usize,
    screen_x: i32,
    screen_y: i32,
    screen_w: i32,
    screen_h: i32,
}

impl Layout {
    /// Centers the biggest field that fits in a `cols` x `rows` terminal.
    pub fn fit(cols: u16, rows: u16) -> Result<Self, GameError> {
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(GameError::TerminalTooSmall { cols, rows });
        }

        let field_w = ((cols as usize - 2) / 2).min(MAX_FIELD_W);
        let field_h = (rows as usize - 3).min(MAX_FIELD_H);
        let screen_w = field_w as i32 * 2 + 2;
        let screen_h = field_h as i32 + 3;

        Ok(Layout {
            field_w,
            field_h,
            screen_x: cols as i32 / 2 - screen_w / 2,
            screen_y: rows as i32 / 2 - screen_h / 2,
            screen_w,
            screen_h,
        })
    }

    pub fn field_size(&self) -> (usize, usize) {
        (self.field_w, self.field_h)
    }

    pub fn cell_origin(&self, x: i32, y: i32) -> (i32, i32) {
        (self.screen_x + 1 + x * 2, self.screen_y + 2 + y)
    }

    pub fn draw_tile(&self, canvas: &mut dyn Canvas, x: i32, y: i32, tile: Tile) -> io::Result<()> {
        let (col, row) = self.cell_origin(x, y);
        canvas.draw(col, row, tile.glyph())
    }

    pub fn draw_score(&self, canvas: &mut dyn Canvas, score: u32) -> io::Result<()> {
        // Padding wipes out the digits of a longer previous score.
        let text = format!("    {}    ", score);
        let col = self.screen_x + self.screen_w / 2 - text.len() as i32 / 2;
        canvas.draw(col, self.screen_y, &text)
    }

    pub fn draw_border(&self, canvas: &mut dyn Canvas) -> io::Result<()> {
        let (left, right) = (self.screen_x, self.screen_x + self.screen_w - 1);
        let (top, bottom) = (self.screen_y + 1, self.screen_y + self.screen_h - 1);
        let edge = "-".repeat(self.field_w * 2);

        for row in [top, bottom] {
            canvas.draw(left, row, "+")?;
            canvas.draw(left + 1, row, &edge)?;
            canvas.draw(right, row, "+")?;
        }

        for row in top + 1..bottom {
            canvas.draw(left, row, "|")?;
            canvas.draw(right, row, "|")?;
        }

        Ok(())
    }

    pub fn draw_game_over(&self, canvas: &mut dyn Canvas) -> io::Result<()> {
        let col = self.screen_x + self.screen_w / 2 - 6;
        let row = self.screen_y + self.screen_h / 2 - 1;

        canvas.draw(col, row, "           ")?;
        canvas.draw(col, row + 1, " GAME OVER ")?;
        canvas.draw(col, row + 2, "           ")
    }
}

/// Canvas double that records every draw call.
#[cfg(test)]
#[derive(Default, Debug)]
pub struct RecordingCanvas {
    pub draws: Vec<(i32, i32, String)>,
    pub clears: usize,
}

#[cfg(test)]
impl RecordingCanvas {
    pub fn take(&mut self) -> Vec<(i32, i32, String)> {
        std::mem::take(&mut self.draws)
    }
}

#[cfg(test)]
impl Canvas for RecordingCanvas {
    fn draw(&mut self, col: i32, row: i32, text: &str) -> io::Result<()> {
        self.draws.push((col, row, text.to_string()));
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        self.draws.clear();
        Ok(())
    }

    fn show_cursor(&mut self, _show: bool) -> io::Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
