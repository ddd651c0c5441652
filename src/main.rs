use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use bounce_blaster::assets::Assets;
use bounce_blaster::compute::{init_state, tick};
use bounce_blaster::config::GameConfig;
use bounce_blaster::display::{render, RenderContext, Viewport};
use bounce_blaster::entities::GameState;
use bounce_blaster::error::GameError;
use bounce_blaster::input::KeyTracker;

const TITLE: &str = "Bounce Blaster";

#[derive(Parser)]
#[command(name = "bounce_blaster")]
#[command(about = "Dodge the bouncing balls, shoot them down")]
struct Args {
    /// JSON file overriding the default game constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for obstacle placement (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> Result<(), GameError> {
    let mut builder = match log_file {
        Some(path) => {
            let mut builder =
                env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
            builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
            builder
        }
        // stderr shares the screen with the game, so keep it quiet by default
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")),
    };
    builder.init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Run one session until it ends.  The loop drains pending input, advances
/// the simulation by one tick, renders, then sleeps out the rest of the tick.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    config: &GameConfig,
    assets: &Assets,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let session_start = Instant::now();
    let budget = config.tick_duration();
    let mut keys = KeyTracker::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        loop {
            match rx.try_recv() {
                Ok(ev) => keys.handle_event(&ev, frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    keys.request_close();
                    break;
                }
            }
        }

        let input = keys.take_input(frame);
        let now_ms = u64::try_from(session_start.elapsed().as_millis()).unwrap_or(u64::MAX);
        *state = tick(state, &input, config, now_ms);

        if state.is_over() {
            return Ok(());
        }

        let (cols, rows) = terminal::size()?;
        let viewport = Viewport::fit(cols, rows, state.width, state.height);
        let mut ctx = RenderContext::new(out, viewport, assets);
        render(&mut ctx, state, now_ms)?;

        let elapsed = frame_start.elapsed();
        if elapsed < budget {
            thread::sleep(budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("starting with seed {seed}: {config:?}");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = init_state(&config, &mut rng);
    let assets = Assets::load();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::SetTitle(TITLE))?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(err) => {
                log::warn!("input thread stopped: {err}");
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut state, &config, &assets, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result?;

    log::info!(
        "session over ({:?}) after {} frames, score {}",
        state.status,
        state.frame,
        state.score.destroyed
    );
    println!("score:{}", state.score.destroyed);
    Ok(())
}
