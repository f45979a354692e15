use crate::button::{ButtonState, PlayButton};
use crate::input::Field;
use crate::model::{Grid, Rgb, GRID_SIZE};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

pub(crate) const TILE_W: u16 = 4;
pub(crate) const TILE_H: u16 = 2;
const EDIT_W: u16 = 12;
const BUTTON_W: u16 = 14;
const BUTTON_LABEL: &str = "PLAY";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            *c = Cell { bg, ..Cell::default() };
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) w: u16,
    pub(crate) h: u16,
}

impl Rect {
    pub(crate) fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

/// Where everything sits on screen. Grid on the left, controls on the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) grid: Rect,
    pub(crate) edit_x: Rect,
    pub(crate) edit_y: Rect,
    pub(crate) button: Rect,
    pub(crate) status: (u16, u16),
}

impl Layout {
    pub(crate) fn new() -> Self {
        let grid = Rect {
            x: 2,
            y: 2,
            w: GRID_SIZE as u16 * TILE_W,
            h: GRID_SIZE as u16 * TILE_H,
        };
        let px = grid.x + grid.w + 4;
        Self {
            grid,
            edit_x: Rect { x: px + 3, y: 3, w: EDIT_W, h: 1 },
            edit_y: Rect { x: px + 3, y: 5, w: EDIT_W, h: 1 },
            button: Rect { x: px, y: 8, w: BUTTON_W, h: 3 },
            status: (px, 12),
        }
    }

    pub(crate) fn min_size(&self) -> (u16, u16) {
        let w = (self.edit_x.x + self.edit_x.w).max(self.button.x + self.button.w) + 2;
        let h = self.grid.y + self.grid.h + 2;
        (w, h)
    }

    pub(crate) fn field_at(&self, x: u16, y: u16) -> Option<Field> {
        if self.edit_x.contains(x, y) {
            Some(Field::X)
        } else if self.edit_y.contains(x, y) {
            Some(Field::Y)
        } else {
            None
        }
    }
}

pub(crate) struct View<'a> {
    pub(crate) grid: &'a Grid,
    pub(crate) x_text: &'a str,
    pub(crate) y_text: &'a str,
    pub(crate) focus: Field,
    pub(crate) button: &'a PlayButton,
    pub(crate) status: &'a str,
    pub(crate) color: bool,
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg, bold: false });
    }
}

pub(crate) fn draw_view(buf: &mut CellBuffer, layout: &Layout, view: &View) {
    let bg = Color::Black;
    let fg = Color::White;

    let (min_w, min_h) = layout.min_size();
    if buf.w < min_w || buf.h < min_h {
        draw_text(
            buf,
            0,
            0,
            &format!("terminal too small: need {min_w}x{min_h}"),
            Color::Yellow,
            bg,
        );
        return;
    }

    draw_text(buf, layout.grid.x, 0, "tilepaint", fg, bg);
    draw_grid(buf, layout.grid, view.grid, view.color);

    draw_edit(buf, layout.edit_x, 'X', view.x_text, view.focus == Field::X);
    draw_edit(buf, layout.edit_y, 'Y', view.y_text, view.focus == Field::Y);
    draw_button(buf, layout.button, view.button);

    let (sx, sy) = layout.status;
    draw_text(buf, sx, sy, view.status, Color::Grey, bg);

    let help = "tab switch field | enter or click PLAY | esc/q quit";
    draw_text(buf, 1, buf.h.saturating_sub(1), help, Color::DarkGrey, bg);
}

fn draw_grid(buf: &mut CellBuffer, area: Rect, grid: &Grid, color: bool) {
    for c in grid.cells() {
        let x0 = area.x + (c.col() as u16 - 1) * TILE_W;
        let y0 = area.y + (c.row() as u16 - 1) * TILE_H;
        let (ch, tile_fg, tile_bg) = match (c.color, color) {
            (Some(_), true) => (' ', Color::Black, c.rgb().map_or(Color::Black, to_color)),
            (Some(i), false) => {
                let digit = char::from_digit(i as u32, 10).unwrap_or('?');
                (digit, Color::White, Color::Black)
            }
            (None, _) => ('·', Color::DarkGrey, Color::Black),
        };
        for dy in 0..TILE_H {
            // rightmost column stays blank as a gutter
            for dx in 0..TILE_W - 1 {
                buf.set(
                    x0 + dx,
                    y0 + dy,
                    Cell {
                        ch,
                        fg: tile_fg,
                        bg: tile_bg,
                        bold: false,
                    },
                );
            }
        }
    }
}

fn draw_edit(buf: &mut CellBuffer, r: Rect, label: char, text: &str, focused: bool) {
    let bg = Color::Black;
    let frame = if focused { Color::Yellow } else { Color::Grey };
    draw_text(buf, r.x - 3, r.y, &format!("{label}:"), frame, bg);
    draw_text(buf, r.x - 1, r.y, "[", frame, bg);
    draw_text(buf, r.x + r.w, r.y, "]", frame, bg);

    let inner = r.w as usize;
    // keep the tail visible while typing
    let skip = text.chars().count().saturating_sub(inner);
    let mut shown: String = text.chars().skip(skip).collect();
    if focused && shown.chars().count() < inner {
        shown.push('_');
    }
    for i in 0..r.w {
        let blank = Cell {
            bg: Color::DarkGrey,
            ..Cell::default()
        };
        buf.set(r.x + i, r.y, blank);
    }
    draw_text(buf, r.x, r.y, &shown, Color::White, Color::DarkGrey);
}

fn draw_button(buf: &mut CellBuffer, r: Rect, b: &PlayButton) {
    if b.state() == ButtonState::Idle {
        return;
    }
    let s = b.scale();
    let w = ((r.w as f32 * s.x).round() as u16).min(r.w + 2);
    if w < 2 || s.y < 0.2 {
        return;
    }
    let h = if s.y < 0.6 { 1 } else { r.h };
    let cx = (r.x + r.w / 2) as i32 + b.shake() as i32;
    let x0 = (cx - (w / 2) as i32).max(0) as u16;
    let y0 = r.y + (r.h - h) / 2;

    let shade = |v: f32| (v * b.dim()).clamp(0.0, 255.0) as u8;
    let face = Color::Rgb { r: shade(40.0), g: shade(170.0), b: shade(70.0) };
    let ink = Color::Rgb { r: shade(255.0), g: shade(255.0), b: shade(255.0) };

    for dy in 0..h {
        for dx in 0..w {
            buf.set(x0 + dx, y0 + dy, Cell { ch: ' ', fg: ink, bg: face, bold: false });
        }
    }
    if (w as usize) >= BUTTON_LABEL.len() {
        let lx = x0 + (w - BUTTON_LABEL.len() as u16) / 2;
        let ly = y0 + h / 2;
        for (i, ch) in BUTTON_LABEL.chars().enumerate() {
            buf.set(lx + i as u16, ly, Cell { ch, fg: ink, bg: face, bold: true });
        }
    }
}

/// Headless output: one line per row, two-column colored blocks or palette digits.
pub(crate) fn print_grid(out: &mut impl Write, grid: &Grid, color: bool) -> io::Result<()> {
    for row in 1..=GRID_SIZE {
        for col in 1..=GRID_SIZE {
            let cell = grid.get(row, col);
            match (cell.and_then(|c| c.rgb()), cell.and_then(|c| c.color)) {
                (Some(rgb), Some(_)) if color => {
                    queue!(out, SetBackgroundColor(to_color(rgb)), Print("  "))?;
                }
                (_, Some(i)) => {
                    queue!(out, Print(i), Print(' '))?;
                }
                _ => {
                    queue!(out, Print(". "))?;
                }
            }
        }
        if color {
            queue!(out, ResetColor)?;
        }
        queue!(out, Print('\n'))?;
    }
    out.flush()
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    mouse: bool,
}

impl Terminal {
    pub(crate) fn begin(mouse: bool) -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        if mouse {
            execute!(out, EnableMouseCapture)?;
        }
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            mouse,
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        if self.mouse {
            queue!(self.out, DisableMouseCapture)?;
        }
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Writes only the cells that changed since the last frame.
    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = false;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if c.bold != last_bold {
                    let attr = if c.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = c.bold;
                    // attribute resets can clobber colors on some terminals
                    last_fg = None;
                    last_bg = None;
                }
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}
