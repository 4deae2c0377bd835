/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state. No game logic is performed; this module only translates the
/// frame's draw commands into terminal cells. World pixels are scaled down
/// onto the character grid and every silhouette pixel marks the cell it
/// lands in.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use geometry_cometry::collision::Silhouette;
use geometry_cometry::compute::draw_commands;
use geometry_cometry::entities::{DrawCommand, GameState, GameStatus, Shape, Special};
use geometry_cometry::geometry::Rgb;
use geometry_cometry::tuning::{self, powerup};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_CARGO: Color = Color::Green;
const C_POWERUP_ACTIVE: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

fn rgb(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── Cell buffer ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Cell {
    glyph: char,
    fg: Color,
    bg: Option<Color>,
}

/// The play field as a grid of cells, mapped onto a window of the terminal.
struct Canvas {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
    world_w: f64,
    world_h: f64,
    cells: Vec<Option<Cell>>,
}

impl Canvas {
    fn new(left: u16, top: u16, cols: u16, rows: u16, state: &GameState) -> Canvas {
        Canvas {
            left,
            top,
            cols,
            rows,
            world_w: state.width,
            world_h: state.play_height,
            cells: vec![None; usize::from(cols) * usize::from(rows)],
        }
    }

    fn cell_of(&self, x: f64, y: f64) -> Option<usize> {
        if self.cols == 0 || self.rows == 0 || x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / self.world_w * f64::from(self.cols)) as usize;
        let row = (y / self.world_h * f64::from(self.rows)) as usize;
        if col >= usize::from(self.cols) || row >= usize::from(self.rows) {
            return None;
        }
        Some(row * usize::from(self.cols) + col)
    }

    fn plot(&mut self, x: f64, y: f64, cell: Cell) {
        if let Some(i) = self.cell_of(x, y) {
            self.cells[i] = Some(cell);
        }
    }

    fn paint(&mut self, cmd: &DrawCommand) {
        let half = extent(&cmd.shape).ceil();
        let side = (half * 2.0) as i32;
        let mask = Silhouette::rasterise(&cmd.shape, cmd.outline, side);
        let cell = Cell {
            glyph: glyph(&cmd.shape, cmd.outline),
            fg: rgb(cmd.color.faded(cmd.alpha)),
            bg: None,
        };
        let origin_x = cmd.x.round() - f64::from(mask.side()) / 2.0;
        let origin_y = cmd.y.round() - f64::from(mask.side()) / 2.0;
        for row in 0..mask.side() {
            for col in 0..mask.side() {
                if mask.get(col, row) {
                    self.plot(origin_x + f64::from(col), origin_y + f64::from(row), cell);
                }
            }
        }
        if let Some(label) = cmd.label {
            let stamp = Cell {
                glyph: label,
                fg: Color::Black,
                bg: Some(rgb(cmd.color)),
            };
            self.plot(cmd.x, cmd.y, stamp);
        }
    }

    fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let Some(cell) = self.cells[usize::from(row) * usize::from(self.cols) + usize::from(col)]
                else {
                    continue;
                };
                out.queue(cursor::MoveTo(self.left + col, self.top + row))?;
                out.queue(style::SetForegroundColor(cell.fg))?;
                if let Some(bg) = cell.bg {
                    out.queue(style::SetBackgroundColor(bg))?;
                }
                out.queue(Print(cell.glyph))?;
                if cell.bg.is_some() {
                    out.queue(style::ResetColor)?;
                }
            }
        }
        Ok(())
    }
}

/// Distance from the centre to the farthest drawn point.
fn extent(shape: &Shape) -> f64 {
    match shape {
        Shape::Polygon(points) => points
            .iter()
            .map(|p| p.x.abs().max(p.y.abs()))
            .fold(1.0, f64::max)
            + 2.0,
        Shape::Circle { radius } | Shape::Ring { radius, .. } => *radius,
        Shape::Line { from, to } => from
            .x
            .abs()
            .max(from.y.abs())
            .max(to.x.abs())
            .max(to.y.abs())
            + 1.0,
    }
}

fn glyph(shape: &Shape, outline: u32) -> char {
    match shape {
        Shape::Circle { radius } if *radius <= 3.0 => '·',
        Shape::Circle { radius } if *radius <= 4.0 => '•',
        Shape::Line { .. } => '.',
        Shape::Ring { .. } => '░',
        Shape::Polygon(_) if outline > 0 => '▓',
        _ => '█',
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    fullscreen: bool,
    best: u32,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    // Fullscreen drops the frame and the hint line.
    let (left, top, cols, rows) = if fullscreen {
        (0, 1, width, height.saturating_sub(1))
    } else {
        draw_border(out, width, height)?;
        (1, 2, width.saturating_sub(2), height.saturating_sub(4))
    };

    let mut canvas = Canvas::new(left, top, cols, rows, state);
    for star in &state.stars {
        canvas.plot(
            star.x,
            star.y,
            Cell {
                glyph: '.',
                fg: rgb(star.color.faded(0x55)),
                bg: None,
            },
        );
    }
    for cmd in draw_commands(state) {
        canvas.paint(&cmd);
    }
    canvas.flush(out)?;

    draw_hud(out, state, width)?;
    if !fullscreen {
        draw_controls_hint(out, state, height)?;
    }

    if state.status == GameStatus::GameOver {
        draw_game_over(out, state, width, height, best)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = usize::from(width);

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    // Score and stage: left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>7}  Stage:{:>2}",
        state.score, state.stage
    )))?;

    // Cargo bay: centre
    let cargo = match state.cargo_bay {
        Some(kind) => powerup::name(kind),
        None => "Empty",
    };
    let cargo_str = format!("[ Cargo bay: {} ]", cargo);
    let cx = (width / 2).saturating_sub(cargo_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(cx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_CARGO))?;
    out.queue(Print(&cargo_str))?;

    // Active special + lives: right side
    let power_tag = match state.special {
        Special::None => String::new(),
        special => format!("[{}] ", tuning::special_name(special)),
    };
    let lives_str = format!("Lives:{}", "♥".repeat(state.lives as usize));
    let right_str = format!("{}{}", power_tag, lives_str);

    let rx = width.saturating_sub(right_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;

    if !power_tag.is_empty() {
        out.queue(style::SetForegroundColor(C_POWERUP_ACTIVE))?;
        out.queue(Print(&power_tag))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

pub const CONTROLS: &str =
    "↑↓←→ / WASD : Fly   SPACE : Shoot   X : Special   TAB : Fullscreen   ESC : Give up   Q : Quit";

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(format!(
        "{}   You've killed {} baddies in {} deaths",
        CONTROLS, state.kills, state.deaths
    )))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
    best: u32,
) -> std::io::Result<()> {
    let new_best = state.score > 0 && state.score >= best;
    let score_line = format!("Final Score: {:>7}", state.score);
    let best_line = if new_best {
        format!("★ NEW BEST: {:>7} ★", state.score)
    } else {
        format!("Best Score:  {:>7}", best)
    };

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let best_color = if new_best {
        Color::Yellow
    } else {
        Color::DarkGrey
    };

    let cx = width / 2;
    let total_rows = lines.len() + 3; // 3 box lines + score + best + hint
    let start_row = (height / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let best_row = score_row + 1;
    let col = cx.saturating_sub(best_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, best_row))?;
    out.queue(style::SetForegroundColor(best_color))?;
    out.queue(Print(&best_line))?;

    let hint = "R - Back to Menu  Q - Quit";
    let hint_row = best_row + 1;
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, hint_row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
