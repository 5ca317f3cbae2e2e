mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pizza_dash::compute::{simulate_frame, GameError, GameSession, RenderableState};
use pizza_dash::config::{ConfigError, GameConfig};
use pizza_dash::input::{Control, HeldKeys, InputSnapshot};
use pizza_dash::level::{BuiltinLevels, LevelDirectory, LevelSource};

use display::Viewport;

const LEVELS_ENV_VAR: &str = "PIZZA_DASH_LEVELS";
const LOG_ENV_VAR: &str = "PIZZA_DASH_LOG";

/// Simulation step: 60 Hz.
const STEP: Duration = Duration::from_nanos(16_666_667);
/// Longest wall-clock gap fed into the accumulator in one go.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);
const MAX_STEPS_PER_FRAME: u32 = 5;

/// A key counts as held if its last press/repeat event arrived within this
/// many frames. Terminals without key-release events keep a key alive through
/// OS key repeat, which fires well inside this window.
const HOLD_WINDOW: u64 = 8;

#[derive(Debug, Error)]
enum AppError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Game(#[from] GameError),
}

// ── Input ─────────────────────────────────────────────────────────────────────

fn control_keys(control: Control) -> &'static [KeyCode] {
    match control {
        Control::MoveLeft => &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
        Control::MoveRight => &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
        Control::Jump => &[KeyCode::Char(' '), KeyCode::Char('k'), KeyCode::Char('K')],
        Control::Attack => &[KeyCode::Char('j'), KeyCode::Char('J')],
        Control::ClimbUp => &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
        Control::ClimbDown => &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
        Control::Confirm => &[KeyCode::Enter],
    }
}

/// Drain pending terminal events into `keys`. Returns true on quit.
fn drain_events(rx: &mpsc::Receiver<Event>, keys: &mut HeldKeys<KeyCode>, frame: u64) -> bool {
    while let Ok(ev) = rx.try_recv() {
        let Event::Key(KeyEvent {
            code, kind, modifiers, ..
        }) = ev
        else {
            continue;
        };
        match kind {
            KeyEventKind::Press => {
                keys.press(code, frame);
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
                    _ => {}
                }
            }
            KeyEventKind::Repeat => keys.repeat(code, frame),
            KeyEventKind::Release => keys.release(code),
        }
    }
    false
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Fixed-timestep loop: wall-clock time accumulates and is consumed in
/// `STEP` slices, at most `MAX_STEPS_PER_FRAME` per rendered frame.
fn game_loop<W: Write>(out: &mut W, session: &mut GameSession, rx: &mpsc::Receiver<Event>) -> Result<(), AppError> {
    let mut keys: HeldKeys<KeyCode> = HeldKeys::new(HOLD_WINDOW);
    let mut frame: u64 = 0;
    let mut accumulator = Duration::ZERO;
    let mut last = Instant::now();
    let mut latest: RenderableState = session.renderable(Vec::new());

    loop {
        let frame_start = Instant::now();
        frame += 1;

        if drain_events(rx, &mut keys, frame) {
            info!(score = session.score, "quit_requested");
            return Ok(());
        }

        let now = Instant::now();
        let mut delta = now - last;
        last = now;
        if delta > MAX_FRAME_DELTA {
            warn!(delta_ms = delta.as_millis() as u64, "sim_clamp_triggered");
            delta = MAX_FRAME_DELTA;
        }
        accumulator += delta;

        // Taken only when a step will consume it, so a tap is never dropped.
        let input = if accumulator >= STEP {
            keys.snapshot(frame, control_keys)
        } else {
            InputSnapshot::empty()
        };
        let mut steps = 0;
        while accumulator >= STEP && steps < MAX_STEPS_PER_FRAME {
            latest = simulate_frame(input, STEP, session)?;
            accumulator -= STEP;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME && accumulator >= STEP {
            warn!(dropped_ms = accumulator.as_millis() as u64, "sim_clamp_triggered");
            accumulator = Duration::ZERO;
        }

        let (cols, rows) = terminal::size()?;
        display::render(out, &latest, Viewport { cols, rows })?;

        let elapsed = frame_start.elapsed();
        if elapsed < STEP {
            thread::sleep(STEP - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing() -> std::io::Result<()> {
    let path = std::env::var_os(LOG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("pizza_dash.log"));
    let file = File::create(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}

fn level_source() -> Box<dyn LevelSource> {
    match std::env::var_os(LEVELS_ENV_VAR) {
        Some(dir) => {
            info!(dir = %PathBuf::from(&dir).display(), "using_level_directory");
            Box::new(LevelDirectory::new(dir))
        }
        None => Box::new(BuiltinLevels),
    }
}

fn main() -> ExitCode {
    if let Err(err) = init_tracing() {
        eprintln!("pizza_dash: cannot open log file: {err}");
        return ExitCode::FAILURE;
    }
    info!("=== Pizza Dash Startup ===");

    let config = match GameConfig::load_from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "config_load_failed");
            eprintln!("pizza_dash: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "fatal_error");
            eprintln!("pizza_dash: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: GameConfig) -> Result<(), AppError> {
    let mut session = GameSession::new(config, level_source());

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events where the terminal supports them.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

    // Blocking reads live on their own thread so the loop never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut session, &rx);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
