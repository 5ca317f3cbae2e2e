/// Rendering layer: all terminal output lives here.
///
/// Each function receives a writer and the `RenderableState` the simulation
/// produced for this frame. World pixels are scaled down to terminal cells;
/// nothing here changes game state.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use pizza_dash::compute::{timer_clock, HostileView, PlayerView, ProgressView, RenderableState, StructureView};
use pizza_dash::entities::{GameState, HostileKind, StructureKind, Tint};
use pizza_dash::geometry::{HitboxRole, Rect};

/// World pixels per terminal column and row.
const PX_PER_COL: i32 = 8;
const PX_PER_ROW: i32 = 18;

/// Rows above the play field taken by the HUD and the progress strip.
const HUD_ROWS: u16 = 2;

/// Widest the progress strip gets, in columns.
const PROGRESS_MAX_COLS: u16 = 50;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_TIMER: Color = Color::Cyan;
const C_HUD_LIVES: Color = Color::Red;
const C_GROUND: Color = Color::DarkGreen;
const C_WALL: Color = Color::DarkGrey;
const C_ROOF: Color = Color::Grey;
const C_LADDER: Color = Color::DarkYellow;
const C_DOOR_OPEN: Color = Color::Green;
const C_DOOR_DONE: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_HIT: Color = Color::Red;
const C_SHAMBLER: Color = Color::Green;
const C_CRAWLER: Color = Color::Magenta;
const C_ATTACK: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_STRIP: Color = Color::DarkGrey;

/// Terminal area available to the renderer.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(HUD_ROWS + 1)
    }
}

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &RenderableState, view: Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match state.state {
        GameState::Menu => draw_menu(out, view)?,
        GameState::Loading => draw_loading(out, state, view)?,
        GameState::Playing | GameState::GameOver => {
            draw_hud(out, state, view)?;
            draw_ground(out, view)?;
            for structure in &state.structures {
                draw_structure(out, structure, state.camera_x, view)?;
            }
            for hostile in &state.hostiles {
                draw_hostile(out, hostile, state.camera_x, view)?;
            }
            draw_player(out, &state.player, state.camera_x, view)?;
            draw_controls_hint(out, view)?;

            if state.state == GameState::GameOver {
                draw_game_over(out, state, view)?;
            } else if state.is_paused {
                draw_centered(out, view, &[("‖  PAUSED  ‖", Color::Yellow), ("ENTER - Resume", Color::White)])?;
            }
        }
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Coordinate mapping ────────────────────────────────────────────────────────

/// Screen cell of a world point, or `None` when it falls outside the field.
fn to_cell(x: i32, y: i32, camera_x: i32, view: Viewport) -> Option<(u16, u16)> {
    let col = (x - camera_x).div_euclid(PX_PER_COL);
    let row = y.div_euclid(PX_PER_ROW);
    if col < 0 || row < 0 || col >= i32::from(view.cols) || row >= i32::from(view.field_rows()) {
        return None;
    }
    Some((col as u16, row as u16 + HUD_ROWS))
}

fn fill_rect<W: Write>(
    out: &mut W,
    rect: Rect,
    glyph: &str,
    color: Color,
    camera_x: i32,
    view: Viewport,
) -> std::io::Result<()> {
    if rect.is_empty() {
        return Ok(());
    }
    out.queue(style::SetForegroundColor(color))?;
    let mut y = rect.y;
    while y < rect.bottom() {
        let mut x = rect.x;
        while x < rect.right() {
            if let Some((col, row)) = to_cell(x, y, camera_x, view) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print(glyph))?;
            }
            x += PX_PER_COL;
        }
        y += PX_PER_ROW;
    }
    Ok(())
}

// ── HUD (rows 0-1) ────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &RenderableState, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", state.score)))?;

    let level_str = format!("[ LEVEL {}-{} ]", state.loop_count, state.current_level);
    let lx = (view.cols / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIMER))?;
    out.queue(Print(&level_str))?;
    let (minutes, seconds) = timer_clock(state.timer);
    out.queue(Print(format!("  Time {minutes}:{seconds:02}")))?;

    let hearts: String = "♥".repeat(state.player.health as usize);
    let right_str = format!("HP:{:<3} Lives:{}", hearts, state.lives);
    let rx = view.cols.saturating_sub(right_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&right_str))?;

    draw_progress(out, &state.progress, view)
}

/// Row 1: the level squeezed into one strip, doors and player on it.
fn draw_progress<W: Write>(out: &mut W, progress: &ProgressView, view: Viewport) -> std::io::Result<()> {
    let width = view.cols.saturating_sub(4).min(PROGRESS_MAX_COLS);
    if width < 2 {
        return Ok(());
    }
    let left = (view.cols - width) / 2;
    let col_of = |fraction: f32| left + ((fraction * f32::from(width - 1)).round() as u16).min(width - 1);

    out.queue(style::SetForegroundColor(C_STRIP))?;
    out.queue(cursor::MoveTo(left - 1, 1))?;
    out.queue(Print(format!("[{}]", "─".repeat(width as usize))))?;

    for door in &progress.doors {
        let color = if door.delivered { C_DOOR_DONE } else { C_DOOR_OPEN };
        out.queue(cursor::MoveTo(col_of(door.position), 1))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print("▲"))?;
    }

    out.queue(cursor::MoveTo(col_of(progress.player), 1))?;
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(Print("☻"))?;
    Ok(())
}

fn draw_ground<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, view.field_rows() + HUD_ROWS - 1))?;
    out.queue(style::SetForegroundColor(C_GROUND))?;
    out.queue(Print("▀".repeat(view.cols as usize)))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_structure<W: Write>(
    out: &mut W,
    structure: &StructureView,
    camera_x: i32,
    view: Viewport,
) -> std::io::Result<()> {
    let wall = match structure.kind {
        StructureKind::Walkup | StructureKind::Bodega => "░",
        StructureKind::Tenement | StructureKind::Warehouse => "▒",
    };
    fill_rect(out, structure.rect, wall, C_WALL, camera_x, view)?;

    for hitbox in &structure.hitboxes {
        let (glyph, color) = match hitbox.role {
            HitboxRole::Roof | HitboxRole::Platform => ("▄", C_ROOF),
            HitboxRole::Ladder => ("H", C_LADDER),
            HitboxRole::Door if structure.has_delivered => ("▓", C_DOOR_DONE),
            HitboxRole::Door => ("█", C_DOOR_OPEN),
        };
        fill_rect(out, hitbox.rect, glyph, color, camera_x, view)?;
    }
    Ok(())
}

fn draw_hostile<W: Write>(out: &mut W, hostile: &HostileView, camera_x: i32, view: Viewport) -> std::io::Result<()> {
    let Some((col, row)) = to_cell(hostile.rect.x, hostile.rect.y, camera_x, view) else {
        return Ok(());
    };
    let (head, legs, color) = match hostile.kind {
        HostileKind::Shambler => ("(ō)", if hostile.frame % 2 == 0 { "/ \\" } else { "| |" }, C_SHAMBLER),
        HostileKind::Crawler => ("<ö>", if hostile.frame % 2 == 0 { "╰─╯" } else { "╭─╮" }, C_CRAWLER),
    };
    let color = if hostile.tint == Tint::Highlighted { C_HIT } else { color };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(head))?;
    if row + 1 < view.field_rows() + HUD_ROWS {
        out.queue(cursor::MoveTo(col, row + 1))?;
        out.queue(Print(legs))?;
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, player: &PlayerView, camera_x: i32, view: Viewport) -> std::io::Result<()> {
    if !player.visible {
        return Ok(());
    }
    fill_rect(out, player.attack_box, "═", C_ATTACK, camera_x, view)?;

    let Some((col, row)) = to_cell(player.rect.x, player.rect.y, camera_x, view) else {
        return Ok(());
    };
    let color = if player.tint == Tint::Highlighted { C_HIT } else { C_PLAYER };
    let head = if player.facing.is_left() { "◄☻" } else { "☻►" };
    let legs = if player.frame % 2 == 0 { "/\\" } else { "||" };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(head))?;
    if row + 1 < view.field_rows() + HUD_ROWS {
        out.queue(cursor::MoveTo(col, row + 1))?;
        out.queue(Print(legs))?;
    }
    Ok(())
}

// ── Full-screen states ────────────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "A D : Move  K : Jump  J : Attack  W S : Climb/Deliver  ENTER : Pause  Q : Quit",
    ))?;
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    draw_centered(
        out,
        view,
        &[
            ("★  PIZZA  DASH  ★", Color::Cyan),
            ("", Color::White),
            ("Deliver to every door before the clock runs out.", Color::White),
            ("Climb ladders, dodge the locals, bop the rest.", Color::DarkGrey),
            ("", Color::White),
            ("ENTER - Start   Q - Quit", Color::Yellow),
        ],
    )
}

fn draw_loading<W: Write>(out: &mut W, state: &RenderableState, view: Viewport) -> std::io::Result<()> {
    let spinner = ["|", "/", "-", "\\"];
    let glyph = spinner[state.loading_frame as usize % spinner.len()];
    let done = format!("LEVEL {} CLEAR", state.current_level);
    let score = format!("Score: {:>6}", state.score);
    let next = format!("Loading next level {}", glyph);
    draw_centered(
        out,
        view,
        &[(done.as_str(), Color::Green), (score.as_str(), Color::Yellow), (next.as_str(), Color::DarkGrey)],
    )
}

fn draw_game_over<W: Write>(out: &mut W, state: &RenderableState, view: Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", state.score);
    draw_centered(
        out,
        view,
        &[
            ("╔════════════════════╗", Color::Red),
            ("║    GAME  OVER      ║", Color::Red),
            ("╚════════════════════╝", Color::Red),
            (score_line.as_str(), Color::Yellow),
            ("ENTER - Menu  Q - Quit", Color::White),
        ],
    )
}

fn draw_centered<W: Write>(out: &mut W, view: Viewport, lines: &[(&str, Color)]) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
