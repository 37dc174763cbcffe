/// Presentation layer: the page buffer on a terminal.
///
/// The simulation draws into the `PageBuffer` through the `PageDisplay`
/// contract; this module owns that buffer plus everything about putting it
/// on screen:
///   1. Each frame the 128×64 pixel buffer is folded into 32 rows of
///      half-block glyphs (▀ ▄ █, two pixel rows per terminal row)
///   2. Rows are compared with the previously printed frame and only
///      changed rows are re-emitted, batched with `queue!` and flushed once
///   3. Score digits are diffed against the last drawn digits, so a 9→10
///      carry repaints exactly the cells that changed
///
/// Screen compositions (banners, score header, final score) live here too:
/// they are fixed glyph layouts, not simulation logic.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};

use super::display::{PageBuffer, PageDisplay, DISPLAY_COLS, DISPLAY_ROWS};
use super::sprites::{self, letters};

/// Terminal rows used by the pixel field (two pixel rows per cell).
const FIELD_ROWS: usize = DISPLAY_ROWS / 2;

/// Displayed score is capped here; storage keeps counting.
pub const SCORE_DIGIT_CAP: u32 = 9999;

// ── Fixed layout (columns on the page grid) ──

/// "SCORE:" header and its four digit cells on page 0.
const HEADER_LETTER_COLS: [u8; 5] = [0, 7, 14, 21, 28];
const HEADER_COLON_COL: u8 = 35;
const HEADER_DIGIT_COLS: [u8; 4] = [38, 44, 50, 56];
const HEADER_PAGE: u8 = 0;

/// Final score line on page 3 of the end screen.
const FINAL_LETTER_COLS: [u8; 5] = [64, 71, 78, 85, 92];
const FINAL_COLON_COL: u8 = 99;
const FINAL_DIGIT_COLS: [u8; 4] = [102, 108, 114, 120];
const FINAL_PAGE: u8 = 3;

/// "PUSH STICK TO START" across the two banner pages.
const START_BANNER: [(u8, usize); 16] = [
    (0, letters::P), (7, letters::U), (14, letters::S), (21, letters::H),
    (31, letters::S), (38, letters::T), (46, letters::I), (54, letters::C), (61, letters::K),
    (71, letters::T), (79, letters::O),
    (89, letters::S), (96, letters::T), (104, letters::A), (111, letters::R), (118, letters::T),
];

/// "PUSH SENSOR TO RESET".
const END_BANNER: [(u8, usize); 17] = [
    (0, letters::P), (7, letters::U), (14, letters::S), (21, letters::H),
    (30, letters::S), (37, letters::E), (44, letters::N), (51, letters::S), (58, letters::O), (65, letters::R),
    (74, letters::T), (82, letters::O),
    (92, letters::R), (99, letters::E), (106, letters::S), (113, letters::E), (120, letters::T),
];

/// Split a score into thousands/hundreds/tens/ones, capped at 9999.
pub fn score_digits(score: u32) -> [u8; 4] {
    let s = score.min(SCORE_DIGIT_CAP);
    [
        (s / 1000) as u8,
        (s / 100 % 10) as u8,
        (s / 10 % 10) as u8,
        (s % 10) as u8,
    ]
}

pub struct Renderer {
    display: PageBuffer,
    writer: BufWriter<io::Stdout>,
    /// Rows as printed last frame; row diffing keys off these.
    prev_rows: Vec<String>,
    last_digits: [u8; 4],
    led: bool,
    prev_status: String,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            display: PageBuffer::new(),
            writer: BufWriter::with_capacity(16384, io::stdout()),
            prev_rows: Vec::new(),
            last_digits: [0; 4],
            led: false,
            prev_status: String::new(),
        }
    }

    pub fn display_mut(&mut self) -> &mut PageBuffer {
        &mut self.display
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        self.prev_rows.clear();
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn set_led(&mut self, on: bool) {
        self.led = on;
    }

    // ── Screen compositions ──

    /// Boot/reset screen: ground strip, grounded rex, start banner.
    pub fn draw_boot_screen(&mut self) {
        self.display.clear();
        self.prev_rows.clear();
        sprites::draw_ground(&mut self.display);
        sprites::draw_rex(&mut self.display);
        self.draw_start_banner();
    }

    pub fn draw_start_banner(&mut self) {
        for (col, letter) in START_BANNER {
            sprites::draw_banner_letter(&mut self.display, col, letter);
        }
    }

    pub fn draw_end_banner(&mut self) {
        for (col, letter) in END_BANNER {
            sprites::draw_banner_letter(&mut self.display, col, letter);
        }
    }

    /// Clear the two banner/header pages.
    pub fn clear_banner(&mut self) {
        self.display.clear_region(0, 0, DISPLAY_COLS as u8);
        self.display.clear_region(0, 1, DISPLAY_COLS as u8);
    }

    /// "SCORE:0000" header shown through play.
    pub fn draw_score_header(&mut self) {
        for (col, glyph) in HEADER_LETTER_COLS.iter().zip(&sprites::SCORE_LETTERS) {
            sprites::draw_strip(&mut self.display, *col, HEADER_PAGE, glyph);
        }
        sprites::draw_strip(&mut self.display, HEADER_COLON_COL, HEADER_PAGE, &[sprites::COLON]);
        for (i, col) in HEADER_DIGIT_COLS.iter().enumerate() {
            sprites::draw_digit(&mut self.display, *col, HEADER_PAGE, 0);
            self.last_digits[i] = 0;
        }
    }

    /// Repaint only the digit cells that changed since the last draw.
    pub fn draw_score(&mut self, score: u32) {
        let digits = score_digits(score);
        for i in 0..4 {
            if digits[i] != self.last_digits[i] {
                sprites::draw_digit(&mut self.display, HEADER_DIGIT_COLS[i], HEADER_PAGE, digits[i]);
                self.last_digits[i] = digits[i];
            }
        }
    }

    /// End-screen "SCORE:NNNN" with the final value, drawn once.
    pub fn draw_final_score(&mut self, score: u32) {
        for (col, glyph) in FINAL_LETTER_COLS.iter().zip(&sprites::SCORE_LETTERS) {
            sprites::draw_strip(&mut self.display, *col, FINAL_PAGE, glyph);
        }
        sprites::draw_strip(&mut self.display, FINAL_COLON_COL, FINAL_PAGE, &[sprites::COLON]);
        let digits = score_digits(score);
        for (col, digit) in FINAL_DIGIT_COLS.iter().zip(digits) {
            sprites::draw_digit(&mut self.display, *col, FINAL_PAGE, digit);
        }
    }

    // ── Presentation ──

    /// Fold the pixel buffer into half-block rows and emit the ones that
    /// changed. Also repaints the status line under the field.
    pub fn present(&mut self) -> io::Result<()> {
        let full_repaint = self.prev_rows.len() != FIELD_ROWS;
        if full_repaint {
            self.prev_rows = vec![String::new(); FIELD_ROWS];
            queue!(self.writer, Clear(ClearType::All))?;
        }

        for row in 0..FIELD_ROWS {
            let mut line = String::with_capacity(DISPLAY_COLS * 3);
            for x in 0..DISPLAY_COLS {
                let top = self.display.pixel(x, row * 2);
                let bottom = self.display.pixel(x, row * 2 + 1);
                line.push(match (top, bottom) {
                    (false, false) => ' ',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (true, true) => '█',
                });
            }
            if full_repaint || self.prev_rows[row] != line {
                queue!(self.writer, MoveTo(0, row as u16), Print(&line))?;
                self.prev_rows[row] = line;
            }
        }

        let status = if self.led { "● jump" } else { "      " };
        if full_repaint || status != self.prev_status {
            queue!(
                self.writer,
                MoveTo(0, FIELD_ROWS as u16),
                Clear(ClearType::CurrentLine),
                Print(status)
            )?;
            self.prev_status = status.to_string();
        }

        self.writer.flush()
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
