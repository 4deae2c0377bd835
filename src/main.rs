mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use log::{error, info};
use rand::thread_rng;

use geometry_cometry::compute::{init_state, tick};
use geometry_cometry::config::{self, Config};
use geometry_cometry::entities::{EnemyKind, GameState, GameStatus, InputEvent, InputSnapshot};
use geometry_cometry::logging;
use geometry_cometry::sound::{AudioSink, SoundCue, TerminalBell};

/// Physics constants are tuned per frame at this rate.
const FRAME: Duration = Duration::from_micros(1_000_000 / 60);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so 8 frames (≈133 ms) is always
/// refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Command-line options. Flags only ever switch things on for this run;
/// whatever is saved in the config file stays as it is.
#[derive(Parser, Debug)]
#[command(author, version, about = "Asteroids-style shooter for the terminal")]
struct Args {
    /// Debug mode: no random spawns, keys 1-7/Z/P spawn things
    #[arg(long)]
    debug: bool,

    /// Skip explosions and exhaust trails
    #[arg(long)]
    no_effects: bool,

    /// Never ring the terminal bell
    #[arg(long)]
    no_sound: bool,

    /// Hide the border and the controls line
    #[arg(long)]
    fullscreen: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Settings file [default: ~/.geocom.json]
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &mut Config,
    audio: &mut dyn AudioSink,
) -> std::io::Result<MenuResult> {
    if config.sound {
        audio.play(SoundCue::Title);
    }
    loop {
        draw_menu(out, config)?;

        // Block until the user makes a choice
        let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.recv() else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
            KeyCode::Char('e') | KeyCode::Char('E') => config.effects = !config.effects,
            KeyCode::Char('s') | KeyCode::Char('S') => config.sound = !config.sound,
            KeyCode::Char('f') | KeyCode::Char('F') => config.fullscreen = !config.fullscreen,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(MenuResult::Quit);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(MenuResult::Quit);
            }
            _ => {}
        }
    }
}

fn draw_menu<W: Write>(out: &mut W, config: &Config) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let top = (height / 2).saturating_sub(10);
    let left = cx.saturating_sub(16);

    let title = "◆  GEOMETRY  COMETRY  ◆";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        top,
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(left, top + 2))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("High scores:"))?;
    if config.highscores.is_empty() {
        out.queue(cursor::MoveTo(left + 2, top + 3))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print("nobody yet"))?;
    }
    for (i, (name, score)) in config.highscores.iter().enumerate() {
        out.queue(cursor::MoveTo(left + 2, top + 3 + i as u16))?;
        out.queue(style::SetForegroundColor(if i == 0 {
            Color::Yellow
        } else {
            Color::Grey
        }))?;
        out.queue(Print(format!("{:>2}. {:<25} {:>7}", i + 1, name, score)))?;
    }

    let toggles_row = top + 4 + config::HIGHSCORES_AMOUNT as u16;
    let on_off = |on: bool| if on { "on " } else { "off" };
    let toggles: &[(&str, &str, bool)] = &[
        ("E", "Effects   ", config.effects),
        ("S", "Sound     ", config.sound),
        ("F", "Fullscreen", config.fullscreen),
    ];
    for (i, (key, label, on)) in toggles.iter().enumerate() {
        out.queue(cursor::MoveTo(left, toggles_row + i as u16))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(label))?;
        out.queue(style::SetForegroundColor(if *on { Color::Green } else { Color::Red }))?;
        out.queue(Print(format!(" {}", on_off(*on))))?;
    }
    if config.debug {
        out.queue(cursor::MoveTo(left, toggles_row + 3))?;
        out.queue(style::SetForegroundColor(Color::Magenta))?;
        out.queue(Print("debug: 1-7 enemies, Z powerup, P ship"))?;
    }

    out.queue(cursor::MoveTo(left, toggles_row + 5))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print("ENTER : Start   Q : Quit"))?;

    out.queue(cursor::MoveTo(
        cx.saturating_sub(display::CONTROLS.chars().count() as u16 / 2),
        toggles_row + 6,
    ))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(display::CONTROLS))?;

    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// One-shot actions bound to a key press.
fn press_event(code: KeyCode, modifiers: KeyModifiers) -> Option<InputEvent> {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputEvent::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(InputEvent::Quit),
        KeyCode::Esc => Some(InputEvent::Abandon),
        KeyCode::Char(c @ '1'..='7') => {
            let index = c as usize - '1' as usize;
            EnemyKind::ALL.get(index).copied().map(InputEvent::SpawnEnemy)
        }
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(InputEvent::SpawnPowerup),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(InputEvent::RespawnShip),
        _ => None,
    }
}

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Held keys (flying, shooting) go through the `key_frame` map: the frame
/// number of the last press/repeat event for every key, so several can be
/// held at once. Everything else is a one-shot event handed to `tick`.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    config: &mut Config,
    audio: &mut dyn AudioSink,
    clock: Instant,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let best = config.best();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        let mut events: Vec<InputEvent> = Vec::new();
        let mut special = false;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.status == GameStatus::GameOver =>
                        {
                            return Ok(false);
                        }
                        KeyCode::Tab => config.fullscreen = !config.fullscreen,
                        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Enter => special = true,
                        _ => events.extend(press_event(code, modifiers)),
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if state.status == GameStatus::GameOver && events.contains(&InputEvent::Quit) {
            return Ok(true);
        }

        if state.status == GameStatus::Playing {
            let input = InputSnapshot {
                forward: is_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
                reverse: is_held(&key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
                left: is_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
                right: is_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
                fire: is_held(&key_frame, &[KeyCode::Char(' ')], frame),
                special,
            };
            let now_ms = clock.elapsed().as_millis() as u64;
            *state = tick(state, &input, &events, now_ms, &mut rng);

            if config.sound {
                for cue in &state.sounds {
                    audio.play(*cue);
                }
            }
            if state.status == GameStatus::Quit {
                return Ok(true);
            }
        }

        display::render(out, state, config.fullscreen, best)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, Some(&config::log_path()));

    let config_path = args.config.clone().unwrap_or_else(config::default_path);
    let mut config = Config::load_or_default(&config_path);
    let saved_fullscreen = config.fullscreen;

    // Command-line switches only apply to this run.
    let mut session = config.clone();
    session.debug |= args.debug;
    session.effects &= !args.no_effects;
    session.sound &= !args.no_sound;
    session.fullscreen |= args.fullscreen;

    let mut out = BufWriter::new(stdout());
    let screen = Screen::enter(&mut out)?;
    let rx = spawn_input_reader();
    let result = run(&mut out, &rx, &mut session);
    screen.leave(&mut out);

    // Keep menu toggles and scores; drop the one-run flags.
    config.highscores = session.highscores;
    config.effects = if args.no_effects { config.effects } else { session.effects };
    config.sound = if args.no_sound { config.sound } else { session.sound };
    config.fullscreen = if args.fullscreen { saved_fullscreen } else { session.fullscreen };
    persist(&config, &config_path);

    result
}

/// Raw mode plus the alternate screen, for as long as a game is up.
struct Screen {
    keyboard_enhanced: bool,
}

impl Screen {
    fn enter<W: Write>(out: &mut W) -> std::io::Result<Screen> {
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        // Key-release events where the terminal supports them (kitty
        // protocol); elsewhere the hold window covers held keys.
        let keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(Screen { keyboard_enhanced })
    }

    /// Best effort: the process is exiting either way.
    fn leave<W: Write>(self, out: &mut W) {
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking key reads on their own thread so the frame loop never waits.
fn spawn_input_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // game gone
            }
        }
    });
    rx
}

fn persist(config: &Config, path: &Path) {
    match config.save(path) {
        Ok(()) => info!("settings saved to {}", path.display()),
        Err(err) => error!("could not save settings: {err}"),
    }
}

fn player_name() -> String {
    std::env::var("USER")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "player".to_string())
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &mut Config,
) -> std::io::Result<()> {
    // Sound can be toggled from the menu, so the sink is always there and
    // every cue is gated on the setting.
    let mut audio = TerminalBell::new(stdout());
    let clock = Instant::now();
    let mut rng = thread_rng();

    loop {
        match show_menu(out, rx, config, &mut audio)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let now_ms = clock.elapsed().as_millis() as u64;
                let mut state = init_state(config.settings(), now_ms, &mut rng);
                if config.sound {
                    audio.play(SoundCue::Music);
                }
                let quit = game_loop(out, &mut state, rx, config, &mut audio, clock)?;

                if state.score > 0 && config.is_highscore(state.score) {
                    config.register_highscore(&player_name(), state.score);
                    info!("new high score {}", state.score);
                }

                if quit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
