use std::io;

use thiserror::Error;

/// Failures the game cannot recover from. Crashes and full boards are
/// ordinary game events and never show up here.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal size {cols}x{rows} is too small")]
    TerminalTooSmall { cols: u16, rows: u16 },
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
